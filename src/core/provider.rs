//! Upstream image generation abstraction
//!
//! The generate endpoint only needs "send this payload with this key, give me
//! back the JSON". Keeping that behind a trait lets the handler be exercised
//! without a live provider.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures talking to the upstream provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to connect to image generation API: {0}")]
    Transport(String),

    #[error("Invalid JSON response from image generation API")]
    Decode(String),
}

/// A provider that turns a chat-completion payload into generated images
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Forward `payload` verbatim and return the provider's JSON reply
    async fn generate(&self, api_key: &str, payload: &Value) -> Result<Value, UpstreamError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = UpstreamError::Status {
            status: 402,
            message: "Insufficient credits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 402: Insufficient credits"
        );

        let err = UpstreamError::Transport("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to connect to image generation API: connection refused"
        );

        let err = UpstreamError::Decode("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid JSON response from image generation API"
        );
    }
}
