//! Core data models for the content desk.
//!
//! Wire records mirror the backend's JSON; view models are what the store
//! holds and what the pipeline passes around.

pub mod action;
pub mod content;
pub mod filters;
pub mod metadata;
pub mod user;
