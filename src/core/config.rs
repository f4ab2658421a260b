//! Application configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! Every value has a default, so a missing `config.toml` yields a usable
//! configuration. The upstream API key is never stored here; only the name of
//! the environment variable that holds it.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default server port
const DEFAULT_PORT: u16 = 8080;

/// Default request body ceiling (base64 images inflate payloads)
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Default upstream request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 120;

/// Default anti-forgery token lifetime in seconds
const DEFAULT_CSRF_EXPIRE_SECS: i64 = 7200;

/// Default number of outstanding anti-forgery tokens kept in memory
const DEFAULT_CSRF_MAX_TOKENS: usize = 10_000;

/// Default per-image size limit (5 MiB)
const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Default number of images allowed in a single request
const DEFAULT_MAX_IMAGES: usize = 10;

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-image";

/// Longest accepted anti-forgery token lifetime (30 days)
pub const MAX_CSRF_EXPIRE_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable read on every request for the provider key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Models the proxy will forward. Empty means any model.
    #[serde(default)]
    pub allowed_models: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout: default_request_timeout(),
            site_url: None,
            app_name: None,
            default_model: default_model(),
            allowed_models: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsrfConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_token_name")]
    pub token_name: String,
    #[serde(default = "default_header_name")]
    pub header_name: String,
    #[serde(default = "default_csrf_expire_secs")]
    pub expire_secs: i64,
    /// Consume a token once it has been accepted
    #[serde(default = "default_true")]
    pub regenerate: bool,
    #[serde(default = "default_csrf_max_tokens")]
    pub max_tokens: usize,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token_name: default_token_name(),
            header_name: default_header_name(),
            expire_secs: default_csrf_expire_secs(),
            regenerate: true,
            max_tokens: default_csrf_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageLimits {
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_images: default_max_images(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_token_name() -> String {
    "csrf_test_name".to_string()
}

fn default_header_name() -> String {
    "X-CSRF-TOKEN".to_string()
}

fn default_csrf_expire_secs() -> i64 {
    DEFAULT_CSRF_EXPIRE_SECS
}

fn default_csrf_max_tokens() -> usize {
    DEFAULT_CSRF_MAX_TOKENS
}

fn default_max_image_bytes() -> usize {
    DEFAULT_MAX_IMAGE_BYTES
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}

/// Application configuration loaded from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub csrf: CsrfConfig,
    #[serde(default)]
    pub images: ImageLimits,
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `CONFIG_PATH` or `./config.toml`
    ///
    /// An explicitly named file must exist. When `CONFIG_PATH` is unset and
    /// `config.toml` is absent, built-in defaults are used.
    pub fn from_env() -> Result<Self> {
        match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path)),
            Err(_) => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.max_body_bytes == 0 {
            bail!("server.max_body_bytes must be non-zero");
        }
        if self.upstream.request_timeout == 0 {
            bail!("upstream.request_timeout must be at least one second");
        }
        if !(self.upstream.base_url.starts_with("https://")
            || self.upstream.base_url.starts_with("http://"))
        {
            bail!(
                "upstream.base_url must be an http(s) URL, got {}",
                self.upstream.base_url
            );
        }
        if self.upstream.api_key_env.trim().is_empty() {
            bail!("upstream.api_key_env must name an environment variable");
        }
        if self.csrf.token_name.trim().is_empty() {
            bail!("csrf.token_name must not be empty");
        }
        if self.csrf.expire_secs <= 0 || self.csrf.expire_secs > MAX_CSRF_EXPIRE_SECS {
            bail!(
                "csrf.expire_secs must be between 1 and {}, got {}",
                MAX_CSRF_EXPIRE_SECS,
                self.csrf.expire_secs
            );
        }
        if self.csrf.max_tokens == 0 {
            bail!("csrf.max_tokens must be non-zero");
        }
        Ok(())
    }

    /// Whether the given model may be forwarded upstream
    pub fn is_model_allowed(&self, model: &str) -> bool {
        self.upstream.allowed_models.is_empty()
            || self.upstream.allowed_models.iter().any(|m| m == model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            log_level = "debug"

            [upstream]
            base_url = "https://example.test/api/v1"
            api_key_env = "TEST_IMAGE_KEY"
            request_timeout = 30
            app_name = "WOKMASGO"
            allowed_models = ["google/gemini-2.5-flash-image"]

            [csrf]
            token_name = "csrf_token"
            regenerate = false

            [images]
            max_image_bytes = 1024
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.upstream.api_key_env, "TEST_IMAGE_KEY");
        assert_eq!(config.upstream.app_name.as_deref(), Some("WOKMASGO"));
        assert_eq!(config.csrf.token_name, "csrf_token");
        assert!(!config.csrf.regenerate);
        assert_eq!(config.images.max_image_bytes, 1024);
        assert_eq!(config.images.max_images, DEFAULT_MAX_IMAGES);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.upstream.request_timeout, 120);
        assert_eq!(config.upstream.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.upstream.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(config.csrf.token_name, "csrf_test_name");
        assert!(config.csrf.enabled);
        assert_eq!(config.images.max_image_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_model_allow_list() {
        // Any model is forwarded unless a list is configured
        let open = Config::default();
        assert!(open.is_model_allowed(DEFAULT_MODEL));
        assert!(open.is_model_allowed("openai/gpt-4o"));

        let file = create_test_config();
        let restricted = Config::from_file(file.path()).unwrap();
        assert!(restricted.is_model_allowed(DEFAULT_MODEL));
        assert!(!restricted.is_model_allowed("openai/gpt-4o"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_toml_str("[upstream]\nrequest_timeout = 0").is_err());
        assert!(Config::from_toml_str("[upstream]\nbase_url = \"ftp://x\"").is_err());
        assert!(Config::from_toml_str("[csrf]\ntoken_name = \"\"").is_err());
        assert!(Config::from_toml_str("[server]\nport = 0").is_err());
    }

    #[test]
    fn test_rejects_unbounded_csrf_lifetime() {
        assert!(Config::from_toml_str("[csrf]\nexpire_secs = 0").is_err());
        assert!(Config::from_toml_str("[csrf]\nexpire_secs = 10000000000000").is_err());

        let config = Config::from_toml_str(&format!("[csrf]\nexpire_secs = {MAX_CSRF_EXPIRE_SECS}"))
            .unwrap();
        assert_eq!(config.csrf.expire_secs, MAX_CSRF_EXPIRE_SECS);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Config::from_file("/nonexistent/wokmasgo.toml").is_err());
    }
}
