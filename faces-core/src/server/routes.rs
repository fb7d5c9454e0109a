//! Axum route handlers.
//!
//! # Routes
//!
//! - `GET /`          — Static gallery page
//! - `GET /face.svg`  — Face for `?seed=` (defaults to `"default"`)
//! - `GET /random`    — Page showing a face for a fresh random seed
//! - `GET /health`    — Liveness probe with catalog fingerprint

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::escape::escape;
use crate::generator::{FaceGenerator, DEFAULT_SEED, SVG_CONTENT_TYPE};

const GALLERY_HTML: &str = include_str!("../../assets/gallery.html");
const RANDOM_SEED_LEN: usize = 12;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub generator: FaceGenerator,
    /// Fingerprint of the catalog behind `generator`, computed once at startup.
    pub catalog_fingerprint: String,
}

impl AppState {
    pub fn new(generator: FaceGenerator) -> Result<Self, serde_json::Error> {
        let catalog_fingerprint = generator.catalog().fingerprint()?;
        Ok(Self { generator, catalog_fingerprint })
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(gallery_handler))
        .route("/face.svg", get(face_handler))
        .route("/random", get(random_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn gallery_handler() -> Html<&'static str> {
    Html(GALLERY_HTML)
}

/// GET /face.svg — an empty `seed=` is a valid seed, distinct from a missing one.
/// A repeated `seed` takes its first value.
async fn face_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let seed = first_seed(&params).unwrap_or(DEFAULT_SEED);
    let svg = state.generator.generate(seed);
    ([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg)
}

async fn random_handler(headers: HeaderMap) -> Html<String> {
    let seed = random_seed();
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    debug!(%seed, "random face");
    Html(random_page(&seed, host))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::ENGINE_VERSION,
        "catalog": state.catalog_fingerprint,
    }))
}

fn first_seed(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "seed")
        .map(|(_, value)| value.as_str())
}

fn random_seed() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SEED_LEN)
        .map(char::from)
        .collect()
}

fn random_page(seed: &str, host: &str) -> String {
    let seed = escape(seed);
    let host = escape(host);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Random Face</title>
    <style>
        body {{ display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f5f5f5; font-family: Arial, sans-serif; }}
        .container {{ text-align: center; }}
        img {{ max-width: 400px; border: 2px solid #333; border-radius: 8px; }}
        .info {{ margin-top: 20px; background: white; padding: 15px; border-radius: 8px; }}
        code {{ background: #f0f0f0; padding: 4px 8px; border-radius: 4px; }}
    </style>
</head>
<body>
    <div class="container">
        <img src="/face.svg?seed={seed}" alt="Random Face">
        <div class="info">
            <p><strong>Seed:</strong> <code>{seed}</code></p>
            <p><strong>URL:</strong><br><code>http://{host}/face.svg?seed={seed}</code></p>
            <p><a href="/random">Generate Another Random Face</a> | <a href="/">Back to Gallery</a></p>
        </div>
    </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_seed_shape() {
        let seed = random_seed();
        assert_eq!(seed.len(), RANDOM_SEED_LEN);
        assert!(seed.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_first_seed_wins() {
        let params = vec![
            ("size".to_string(), "big".to_string()),
            ("seed".to_string(), "a".to_string()),
            ("seed".to_string(), "b".to_string()),
        ];
        assert_eq!(first_seed(&params), Some("a"));
        assert_eq!(first_seed(&[]), None);
    }

    #[test]
    fn test_random_page_escapes_host() {
        let page = random_page("abc123", "evil\"><script>");
        assert!(page.contains("/face.svg?seed=abc123"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("evil&quot;&gt;&lt;script&gt;"));
    }
}
