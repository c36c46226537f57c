//! API endpoint handlers.

pub mod symptoms;
