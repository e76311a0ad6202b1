//! Action routing.

pub mod dispatcher;
