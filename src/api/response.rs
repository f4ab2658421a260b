//! Response envelope for the generate endpoint

use crate::core::provider::UpstreamError;
use crate::models::generation::PayloadError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Every failure the generate endpoint can report
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("The action you requested is not allowed.")]
    CsrfRejected,

    #[error("API key not configured on server")]
    MissingApiKey,

    #[error("Request body is empty")]
    EmptyBody,

    #[error("Invalid JSON payload")]
    InvalidJson,

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::CsrfRejected => StatusCode::FORBIDDEN,
            ProxyError::MissingApiKey
            | ProxyError::EmptyBody
            | ProxyError::InvalidJson
            | ProxyError::Payload(_)
            | ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{success, data?, error?, csrf_token}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub csrf_token: String,
}

impl GenerateResponse {
    pub fn success(data: Value, csrf_token: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            csrf_token,
        }
    }

    pub fn failure(error: &ProxyError, csrf_token: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            csrf_token,
        }
    }

    /// Pair the envelope with the status code for its outcome
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProxyError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ProxyError::CsrfRejected.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ProxyError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::from(PayloadError::NoMessages).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::from(UpstreamError::Transport("reset".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(GenerateResponse::success(json!({"id": 1}), "t1".into()))
            .unwrap();
        assert_eq!(ok, json!({"success": true, "data": {"id": 1}, "csrf_token": "t1"}));

        let err = serde_json::to_value(GenerateResponse::failure(
            &ProxyError::EmptyBody,
            "t2".into(),
        ))
        .unwrap();
        assert_eq!(
            err,
            json!({"success": false, "error": "Request body is empty", "csrf_token": "t2"})
        );
    }
}
