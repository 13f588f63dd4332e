// AI module for post sentiment classification
//
// This module provides:
// - Gemini generateContent client
// - Per-session API credentials
// - The fixed classification prompt
// - The classify boundary that turns backend failures into typed errors

pub mod classifier;
pub mod credentials;
pub mod gemini_client;
pub mod prompt;

use std::future::Future;

use thiserror::Error;

// Re-export commonly used types
pub use classifier::{classify, ClassifyError};
pub use credentials::Credential;
pub use gemini_client::GeminiClient;
pub use prompt::build_sentiment_prompt;

/// Why a single text-generation call failed.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("failed to parse response: {0}")]
    Decode(String),
}

/// A backend that turns one prompt into one completion.
///
/// The credential is passed on every call rather than held by the backend, so
/// one client can serve submissions made with different keys.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> impl Future<Output = Result<String, GenerateError>> + Send;
}
