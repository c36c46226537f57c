//! Generative-backend client.
//!
//! The backend is an opaque text-in/text-out service: one prompt, one
//! generated string. Single attempt only — transport failures surface to the
//! HTTP layer, which converts them to a service error. No retry, no backoff.

pub mod client;
pub mod prompt;

pub use client::{GenerationParams, HfClient, MockTextGeneration, TextGeneration};
pub use prompt::PromptSpec;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Inference API unreachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Inference API returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}
