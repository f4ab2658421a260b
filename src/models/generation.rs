//! Image generation payloads
//!
//! The browser posts a chat-completion body in the provider's own schema.
//! It is forwarded as JSON, not re-serialized from these types. The typed
//! view below only exists to check the body before any key is spent on it.

use crate::core::config::Config;
use crate::core::constants::{ASPECT_RATIOS, IMAGE_MIME_TYPES, content, modality};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons a payload is refused before it reaches the provider
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Request must include at least one message")]
    NoMessages,

    #[error("Invalid request structure: {0}")]
    Structure(String),

    #[error("Unsupported content part type: {0}")]
    UnsupportedPart(String),

    #[error("Model '{0}' is not allowed")]
    ModelNotAllowed(String),

    #[error("Unsupported aspect ratio: {0}")]
    AspectRatio(String),

    #[error("Unsupported image format: {0}")]
    ImageFormat(String),

    #[error("Image data is not valid base64")]
    ImageEncoding,

    #[error("Image {index} exceeds the {limit} size limit")]
    ImageTooLarge { index: usize, limit: String },

    #[error("Too many images: {count} (maximum {max})")]
    TooManyImages { count: usize, max: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a multi-part message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Typed view of a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationRequest {
    /// All image URLs in message order
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter_map(|m| match &m.content {
                MessageContent::Parts(parts) => Some(parts.iter()),
                MessageContent::Text(_) => None,
            })
            .flatten()
            .filter_map(|p| match p {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            })
    }
}

/// Decoded size of an image reference after format checks
///
/// Only `data:` URLs are inspected. Remote URLs are left to the provider and
/// count as zero bytes.
fn image_size(url: &str) -> Result<usize, PayloadError> {
    let Some(rest) = url.strip_prefix("data:") else {
        return Ok(0);
    };

    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| PayloadError::ImageFormat("malformed data URL".into()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| PayloadError::ImageFormat("data URL must be base64 encoded".into()))?
        .to_ascii_lowercase();

    if !IMAGE_MIME_TYPES.contains(&mime.as_str()) {
        return Err(PayloadError::ImageFormat(mime));
    }

    let decoded = STANDARD
        .decode(data.trim())
        .map_err(|_| PayloadError::ImageEncoding)?;
    Ok(decoded.len())
}

/// Human-readable size limit, e.g. `5MB`, `512KB` or `1000 bytes`
fn format_limit(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    match bytes {
        b if b >= MIB && b % MIB == 0 => format!("{}MB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{b} bytes"),
    }
}

/// Check a posted body and fill in defaults
///
/// `body` must already have the anti-forgery field removed. Returns the
/// JSON to forward: the original object with `model` and `modalities`
/// added when they were missing.
pub fn prepare_payload(mut body: Map<String, Value>, config: &Config) -> Result<Value, PayloadError> {
    if !body.contains_key("model") {
        body.insert(
            "model".to_string(),
            Value::String(config.upstream.default_model.clone()),
        );
    }
    if !body.contains_key("modalities") {
        body.insert(
            "modalities".to_string(),
            Value::Array(vec![
                Value::String(modality::IMAGE.to_string()),
                Value::String(modality::TEXT.to_string()),
            ]),
        );
    }

    let payload = Value::Object(body);
    let request: GenerationRequest = serde_json::from_value(payload.clone()).map_err(|e| {
        let msg = e.to_string();
        if msg.contains("unknown variant") {
            PayloadError::UnsupportedPart(msg)
        } else {
            PayloadError::Structure(msg)
        }
    })?;

    if request.messages.is_empty() {
        return Err(PayloadError::NoMessages);
    }

    let model = request.model.as_deref().unwrap_or_default();
    if !config.is_model_allowed(model) {
        return Err(PayloadError::ModelNotAllowed(model.to_string()));
    }

    if let Some(ratio) = request
        .image_config
        .as_ref()
        .and_then(|c| c.aspect_ratio.as_deref())
    {
        if !ASPECT_RATIOS.contains(&ratio) {
            return Err(PayloadError::AspectRatio(ratio.to_string()));
        }
    }

    let limits = &config.images;
    let count = request.image_urls().count();
    if count > limits.max_images {
        return Err(PayloadError::TooManyImages {
            count,
            max: limits.max_images,
        });
    }

    for (index, url) in request.image_urls().enumerate() {
        if image_size(url)? > limits.max_image_bytes {
            return Err(PayloadError::ImageTooLarge {
                index: index + 1,
                limit: format_limit(limits.max_image_bytes),
            });
        }
    }

    Ok(payload)
}

/// Count of text and image parts, for logging
pub fn summarize(payload: &Value) -> (usize, usize) {
    let parts = payload
        .get("messages")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|m| m.get("content").and_then(Value::as_array))
        .flatten();

    parts.fold((0, 0), |(text, images), part| {
        match part.get("type").and_then(Value::as_str) {
            Some(content::TEXT) => (text + 1, images),
            Some(content::IMAGE_URL) => (text, images + 1),
            _ => (text, images),
        }
    })
}
