//! Effect handlers, one per intent action.

pub mod content_handlers;
pub mod session_handlers;
