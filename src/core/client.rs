//! OpenRouter chat-completions client
//!
//! Sends image generation payloads to `{base_url}/chat/completions` with the
//! server-held key attached. One `reqwest::Client` is shared by all requests;
//! each call is bounded by the configured timeout and is never retried.

use crate::core::config::UpstreamConfig;
use crate::core::provider::{ImageGenerator, UpstreamError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
    site_url: Option<String>,
    app_name: Option<String>,
}

impl OpenRouterClient {
    /// Create a new client from the upstream settings
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout,
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Pull a readable message out of an upstream error body
    ///
    /// Prefers `error.message`, then a top-level `message`, then the raw text.
    fn extract_error_detail(body: &str) -> String {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let detail = parsed.as_ref().and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        match detail {
            Some(d) if !d.is_empty() => d,
            _ if body.trim().is_empty() => "Unknown error".to_string(),
            _ => body.trim().to_string(),
        }
    }

    /// Replace provider wording with actionable hints for well-known statuses
    fn classify_error(status: StatusCode, detail: String) -> String {
        match status.as_u16() {
            401 => format!("Invalid API key. Please check the server configuration. ({detail})"),
            402 => format!("Insufficient credits on the provider account. ({detail})"),
            429 => format!("Rate limit exceeded. Please wait and try again. ({detail})"),
            _ => detail,
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenRouterClient {
    async fn generate(&self, api_key: &str, payload: &Value) -> Result<Value, UpstreamError> {
        let url = self.endpoint();

        // Log outgoing request details
        let model = payload
            .get("model")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("-");
        let message_count = payload
            .get("messages")
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len);
        info!(
            "Sending request to OpenRouter: model={}, messages={}",
            model, message_count
        );

        // Build request with auth and attribution headers
        let mut req_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key);

        if let Some(ref site_url) = self.site_url {
            req_builder = req_builder.header("HTTP-Referer", site_url);
        }
        if let Some(ref app_name) = self.app_name {
            req_builder = req_builder.header("X-Title", app_name);
        }

        let response = req_builder.json(payload).send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("OpenRouter request timed out after {}s", self.timeout_secs);
                UpstreamError::Transport(format!(
                    "request timed out after {} seconds",
                    self.timeout_secs
                ))
            } else {
                error!("OpenRouter transport error: {}", e);
                UpstreamError::Transport(e.to_string())
            }
        })?;

        // Anything but 200 is reported as a failure
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            let detail = Self::classify_error(status, Self::extract_error_detail(&body));
            warn!("OpenRouter returned status {}: {}", status.as_u16(), detail);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: detail,
            });
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse OpenRouter response: {}", e);
            UpstreamError::Decode(e.to_string())
        })?;

        info!("OpenRouter response received ({} bytes)", body.len());
        Ok(data)
    }

    fn provider_name(&self) -> &str {
        "OpenRouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: u64) -> OpenRouterClient {
        let config = UpstreamConfig {
            base_url: format!("{}/api/v1/", server.uri()),
            request_timeout: timeout,
            app_name: Some("WOKMASGO".to_string()),
            ..UpstreamConfig::default()
        };
        OpenRouterClient::new(&config).unwrap()
    }

    fn payload() -> Value {
        json!({
            "model": "google/gemini-2.5-flash-image",
            "messages": [{"role": "user", "content": [{"type": "text", "text": "A red fox"}]}],
            "modalities": ["image", "text"],
            "image_config": {"aspect_ratio": "1:1"}
        })
    }

    #[tokio::test]
    async fn test_forwards_payload_with_key() {
        let server = MockServer::start().await;
        let reply = json!({"id": "gen-1", "choices": []});
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-or-test"))
            .and(header("x-title", "WOKMASGO"))
            .and(body_json(payload()))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 5);
        let data = client.generate("sk-or-test", &payload()).await.unwrap();
        assert_eq!(data, reply);
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "Invalid aspect ratio"}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .generate("k", &payload())
            .await
            .unwrap_err();
        match err {
            UpstreamError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid aspect ratio");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_success_codes_are_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"queued": true})))
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .generate("k", &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 202, .. }));
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .generate("k", &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 1)
            .generate("k", &payload())
            .await
            .unwrap_err();
        match err {
            UpstreamError::Transport(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_error_detail() {
        assert_eq!(
            OpenRouterClient::extract_error_detail(r#"{"error":{"message":"No credits"}}"#),
            "No credits"
        );
        assert_eq!(
            OpenRouterClient::extract_error_detail(r#"{"message":"Bad gateway"}"#),
            "Bad gateway"
        );
        assert_eq!(
            OpenRouterClient::extract_error_detail("upstream exploded"),
            "upstream exploded"
        );
        assert_eq!(OpenRouterClient::extract_error_detail(""), "Unknown error");
    }

    #[test]
    fn test_classify_error() {
        let msg = OpenRouterClient::classify_error(StatusCode::PAYMENT_REQUIRED, "x".into());
        assert!(msg.contains("Insufficient credits"));
        let msg = OpenRouterClient::classify_error(StatusCode::BAD_GATEWAY, "x".into());
        assert_eq!(msg, "x");
    }
}
