//! HTTP layer.
//!
//! Thin plumbing over the parsing core: validates input, calls the
//! generative backend once, hands the raw text to `analysis::assemble`, and
//! serializes the result. The router is composable — `app_router()` returns
//! a `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::app_router;
pub use types::ApiContext;
