use crate::constants::{DEFAULT_POINT_LIMIT, MAX_POINT_LIMIT};
use crate::registry::DatasetRegistry;
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DatasetRegistry>,
    pub default_dataset: String,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mobility-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Deserialize)]
struct PointsQuery {
    #[serde(default, deserialize_with = "lenient_limit")]
    limit: Option<usize>,
}

// The dashboard sends the limit as free text; a value that does not parse
// as an integer reads as absent rather than rejecting the request
fn lenient_limit<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

// A zero or absent limit falls back to the default; the cap protects the
// frontend from oversized payloads
fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_POINT_LIMIT)
        .min(MAX_POINT_LIMIT)
}

fn not_found(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("dataset '{}' not found", name) })),
    )
        .into_response()
}

fn points_response(registry: &DatasetRegistry, name: &str, limit: Option<usize>) -> Response {
    match registry.points(name) {
        Some(points) => {
            let limit = clamp_limit(limit).min(points.len());
            Json(&points[..limit]).into_response()
        }
        None => not_found(name),
    }
}

fn summary_response(registry: &DatasetRegistry, name: &str) -> Response {
    match registry.summary(name) {
        Some(summary) => Json(summary).into_response(),
        None => not_found(name),
    }
}

async fn list_datasets(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.names())
}

async fn dataset_points(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<PointsQuery>,
) -> Response {
    points_response(&state.registry, &name, query.limit)
}

async fn dataset_summary(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    summary_response(&state.registry, &name)
}

async fn default_points(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> Response {
    points_response(&state.registry, &state.default_dataset, query.limit)
}

async fn default_summary(State(state): State<AppState>) -> Response {
    summary_response(&state.registry, &state.default_dataset)
}

/// Create the HTTP API with all routes. The unnamed `/api/v1/points` and
/// `/api/v1/summary` routes are kept for the original dashboard client and
/// serve the configured default dataset.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/datasets", get(list_datasets))
        .route("/api/v1/datasets/:name/points", get(dataset_points))
        .route("/api/v1/datasets/:name/summary", get(dataset_summary))
        .route("/api/v1/points", get(default_points))
        .route("/api/v1/summary", get(default_summary))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("HTTP server listening on {}", bind_addr);
    println!("🚀 Mobility API running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("📊 Datasets:     http://localhost:{port}/api/v1/datasets");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::constants::configured_datasets;
    use crate::sources::SourceDir;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(clamp_limit(None), DEFAULT_POINT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), DEFAULT_POINT_LIMIT);
        assert_eq!(clamp_limit(Some(42)), 42);
        assert_eq!(clamp_limit(Some(100_000)), MAX_POINT_LIMIT);
    }

    /// Router over a registry whose source files are absent, so every
    /// configured dataset is present but empty.
    fn empty_data_router() -> Router {
        let dir = tempfile::tempdir().unwrap();
        let registry = DatasetRegistry::build(&SourceDir::new(dir.path()), &Config::default());
        create_router(AppState {
            registry: Arc::new(registry),
            default_dataset: "simulado".to_string(),
        })
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unknown_dataset_names_yield_404_with_an_error_body() {
        let router = empty_data_router();

        let (status, body) = fetch(router.clone(), "/api/v1/datasets/nope/points").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));

        let (status, body) = fetch(router, "/api/v1/datasets/nope/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn configured_but_empty_datasets_yield_200_with_an_empty_array() {
        let router = empty_data_router();
        for name in configured_datasets() {
            let uri = format!("/api/v1/datasets/{name}/points");
            let (status, body) = fetch(router.clone(), &uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!([]));
        }
    }

    #[tokio::test]
    async fn default_routes_serve_the_configured_default_dataset() {
        let router = empty_data_router();

        let (status, body) = fetch(router.clone(), "/api/v1/points").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = fetch(router, "/api/v1/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
        assert!(body["correlation"].is_null());
    }

    #[tokio::test]
    async fn unparseable_limit_values_fall_back_to_the_default() {
        let router = empty_data_router();
        for uri in [
            "/api/v1/points?limit=abc",
            "/api/v1/points?limit=",
            "/api/v1/datasets/simulado/points?limit=-5",
        ] {
            let (status, body) = fetch(router.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!([]));
        }
    }
}
