//! API endpoint handlers
//!
//! This module wires the page routes, the static client scripts, the health
//! check and the image generation proxy into one router.

use crate::api::response::{GenerateResponse, ProxyError};
use crate::core::config::Config;
use crate::core::csrf::CsrfStore;
use crate::core::provider::ImageGenerator;
use crate::core::secrets::SecretSource;
use crate::models::generation::{prepare_payload, summarize};
use crate::pages::image_creator::{self, GenerationMode, ImageKind};
use crate::pages::layout::{self, Page};
use crate::pages::{landing, markdown_viewer};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

const IMAGE_CREATOR_JS: &str = include_str!("../../assets/image-creator.js");
const MARKDOWN_VIEWER_JS: &str = include_str!("../../assets/markdown-viewer.js");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub csrf: Arc<CsrfStore>,
    pub secrets: Arc<dyn SecretSource>,
    pub generator: Arc<dyn ImageGenerator>,
}

/// Create the router with all pages and endpoints
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/", get(landing_page))
        .route("/markdown-viewer", get(markdown_viewer_page))
        .route("/image-creator", get(image_creator_page))
        .route(
            "/image-creator/generate",
            post(generate).fallback(method_not_allowed),
        )
        .route("/image-creator/{kind}", get(mode_chooser_page))
        .route("/image-creator/{kind}/{mode}", get(generator_page))
        .route("/assets/{file}", get(asset))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn html(page: &Page) -> Html<String> {
    Html(layout::render(page))
}

/// GET / - Landing page
async fn landing_page() -> Html<String> {
    html(&landing::render())
}

/// GET /markdown-viewer
async fn markdown_viewer_page() -> Html<String> {
    html(&markdown_viewer::render())
}

/// GET /image-creator
async fn image_creator_page() -> Html<String> {
    html(&image_creator::render_index())
}

/// GET /image-creator/{kind}
async fn mode_chooser_page(Path(kind): Path<String>) -> Response {
    match kind.parse::<ImageKind>() {
        Ok(kind) => html(&image_creator::render_mode_chooser(kind)).into_response(),
        Err(()) => not_found().await,
    }
}

/// GET /image-creator/{kind}/{mode}
async fn generator_page(
    State(state): State<AppState>,
    Path((kind, mode)): Path<(String, String)>,
) -> Response {
    let (Ok(kind), Ok(mode)) = (kind.parse::<ImageKind>(), mode.parse::<GenerationMode>()) else {
        return not_found().await;
    };

    let token = state.csrf.issue().await;
    let page = image_creator::render_generator(kind, mode, &state.config.csrf.token_name, &token);
    html(&page).into_response()
}

/// GET /assets/{file} - Embedded client scripts
async fn asset(Path(file): Path<String>) -> Response {
    let body = match file.as_str() {
        "image-creator.js" => IMAGE_CREATOR_JS,
        "markdown-viewer.js" => MARKDOWN_VIEWER_JS,
        _ => return not_found().await,
    };

    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

async fn not_found() -> Response {
    let page = Page::new(
        "Page Not Found - WOKMASGO",
        r#"<section class="py-5 text-center"><div class="container">
    <h1>404</h1>
    <p>The page you requested does not exist.</p>
    <a href="/" class="btn btn-primary">Back to Home</a>
</div></section>"#
            .to_string(),
    );
    (StatusCode::NOT_FOUND, html(&page)).into_response()
}

/// Any non-POST method on the generate route
///
/// No token is issued here, so anonymous callers cannot churn the store.
async fn method_not_allowed() -> Response {
    warn!("Rejected non-POST request to generate endpoint");
    let error = ProxyError::MethodNotAllowed;
    GenerateResponse::failure(&error, String::new()).into_response_with(error.status())
}

/// POST /image-creator/generate - Forward a generation request upstream
///
/// Once the anti-forgery check has passed, the reply carries a replacement
/// token so the page can keep submitting after a failure. Rejected requests
/// get an empty token, as do replies when tokens are reusable or protection
/// is disabled; the page then keeps the token it already has.
async fn generate(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let result = process_generation(&state, &headers, &body).await;

    let token = match &result {
        Err(ProxyError::CsrfRejected) => String::new(),
        _ if !state.config.csrf.enabled || !state.config.csrf.regenerate => String::new(),
        _ => state.csrf.issue().await,
    };

    match result {
        Ok(data) => GenerateResponse::success(data, token).into_response_with(StatusCode::OK),
        Err(e) => {
            match &e {
                ProxyError::Upstream(_) | ProxyError::MissingApiKey => {
                    error!("Image generation failed: {}", e)
                }
                _ => warn!("Image generation request rejected: {}", e),
            }
            GenerateResponse::failure(&e, token).into_response_with(e.status())
        }
    }
}

async fn process_generation(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Value, ProxyError> {
    // Parse leniently; body errors are reported after the CSRF and key checks
    let is_blank = body.iter().all(u8::is_ascii_whitespace);
    let mut object = if is_blank {
        None
    } else {
        serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
    };

    // The token field is never forwarded upstream
    let csrf = &state.config.csrf;
    let body_token = object
        .as_mut()
        .and_then(|map| map.remove(&csrf.token_name))
        .and_then(|v| v.as_str().map(str::to_string));

    // Verify anti-forgery token, header first
    if csrf.enabled {
        let header_token = headers
            .get(csrf.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let valid = match header_token.or(body_token) {
            Some(token) => state.csrf.verify(&token).await,
            None => false,
        };
        if !valid {
            return Err(ProxyError::CsrfRejected);
        }
    }

    // Validate API key
    let api_key = state.secrets.api_key().ok_or(ProxyError::MissingApiKey)?;

    if is_blank {
        return Err(ProxyError::EmptyBody);
    }
    let object = object.ok_or(ProxyError::InvalidJson)?;

    let payload = prepare_payload(object, &state.config)?;

    // Log incoming request details
    let model = payload
        .get("model")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("-");
    let (texts, images) = summarize(&payload);
    info!(
        "📥 Generation request: model={}, text_parts={}, images={}",
        model, texts, images
    );
    debug!("Forwarding {} byte request body", body.len());

    let data = state.generator.generate(&api_key, &payload).await?;
    Ok(data)
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.generator.provider_name(),
        "api_key_configured": state.secrets.api_key().is_some(),
        "csrf_protection": state.config.csrf.enabled,
    }))
}
