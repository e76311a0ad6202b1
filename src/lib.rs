//! Client-side core of the content desk: maps backend content records into
//! view models, encodes writes, gates features on user permissions, and runs
//! the action loop that turns user intents into REST calls and store
//! updates.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
