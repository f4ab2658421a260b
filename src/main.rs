//! WOKMASGO web app
//!
//! Serves the landing page, the Markdown viewer and the image creator, and
//! proxies image generation requests to OpenRouter with a server-held key.

mod api;
mod core;
mod models;
mod pages;

use crate::api::endpoints::{AppState, create_router};
use crate::core::client::OpenRouterClient;
use crate::core::config::Config;
use crate::core::csrf::CsrfStore;
use crate::core::logging::init_logging;
use crate::core::provider::ImageGenerator;
use crate::core::secrets::{EnvSecret, SecretSource};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    // A .env file may carry the provider key
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.server.log_level);

    let secrets: Arc<dyn SecretSource> = Arc::new(EnvSecret::new(&config.upstream.api_key_env));

    print_startup_banner(&config, secrets.as_ref());

    if secrets.api_key().is_none() {
        warn!(
            "{} is not set; generation requests will fail until it is",
            config.upstream.api_key_env
        );
    }

    let generator: Arc<dyn ImageGenerator> = match OpenRouterClient::new(&config.upstream) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to initialize upstream client: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Using provider: {}", generator.provider_name());

    let app_state = AppState {
        csrf: Arc::new(CsrfStore::new(&config.csrf)),
        config: config.clone(),
        secrets,
        generator,
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config, secrets: &dyn SecretSource) {
    println!("🚀 WOKMASGO v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!("   Upstream: {}", config.upstream.base_url);
    println!("   Default Model: {}", config.upstream.default_model);
    if config.upstream.allowed_models.is_empty() {
        println!("   Allowed Models: any");
    } else {
        println!(
            "   Allowed Models: {}",
            config.upstream.allowed_models.join(", ")
        );
    }
    println!("   API Key Source: {}", secrets.describe());
    println!("   Request Timeout: {}s", config.upstream.request_timeout);
    println!(
        "   CSRF Protection: {}",
        if config.csrf.enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!(
        "   Image Limits: {} images, {} bytes each",
        config.images.max_images, config.images.max_image_bytes
    );
    println!("   Server: {}:{}", config.server.host, config.server.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("WOKMASGO v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: wokmasgo [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  OPENROUTER_API_KEY - Provider API key, read on every request");
    println!("                       (variable name set by upstream.api_key_env)");
    println!("  CONFIG_PATH        - TOML configuration file (default: ./config.toml)");
    println!("  RUST_LOG           - Overrides server.log_level");
    println!();
    println!("Routes:");
    println!("  GET  /                          Landing page");
    println!("  GET  /markdown-viewer           Markdown previewer");
    println!("  GET  /image-creator[/{{kind}}[/{{mode}}]]  Logo and flyer generator");
    println!("  POST /image-creator/generate    Image generation proxy");
    println!("  GET  /health                    Health check");
}
