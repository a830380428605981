//! Persimmon REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/options` - Option sets for the state, age group and elective choosers
//! - `GET /api/v1/dashboard` - Full view for `?state=&age_group=&elective=`
//!
//! ## Datasets
//! - `GET /api/v1/datasets/:state` - Shape, columns and first rows of a dataset
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! Query values are form-encoded, so `65+` must be sent as `65%2B`.
//!
//! # Example
//!
//! ```rust,ignore
//! use persimmon::api::{serve, ApiConfig, AppState};
//! use persimmon::dataset::{DatasetConfig, DatasetLoader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = Arc::new(DatasetLoader::new(DatasetConfig::new("./data")));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(loader, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/options", get(routes::dashboard::get_options))
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/datasets/:state", get(routes::datasets::get_dataset));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the dashboard origin(s); no configured origins allows any
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Persimmon API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Persimmon API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetConfig, DatasetLoader};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    const CA_CSV: &str = ",state,age,elective,week,patients,physicians,claims
0,CA,50-64,CATARACT,2021-01-01,10,2,5
1,CA,50-64,COVID,2021-01-01,100,20,50
2,CA,65+,CABG,2021-01-01,4,1,2
";

    fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("dataset_CA.csv"), CA_CSV).unwrap();

        let loader = Arc::new(DatasetLoader::new(DatasetConfig::new(dir.path())));
        let state = AppState::new(loader, ApiConfig::default());
        let router = build_router(state);

        (router, dir)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app();
        let (status, _) = get_json(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _dir) = create_test_app();
        let (status, _) = get_json(app, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["cached_states"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_options() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(app, "/api/v1/options").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["age_groups"].as_array().map(Vec::len), Some(5));
        assert_eq!(json["electives"].as_array().map(Vec::len), Some(11));
        assert_eq!(json["default"]["elective"], "CYSTOSCOPY");
    }

    #[tokio::test]
    async fn test_dashboard_renders() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(
            app,
            "/api/v1/dashboard?state=CA&age_group=50-64&elective=CATARACT",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "Loaded CA data! [(3, 6) matrix]");
        assert_eq!(json["comparative_rows"], 1);
        assert_eq!(json["comparative_preview"][0]["covid_patients"], 100);
        assert_eq!(json["comparative_preview"][0]["week"], "2021-01-01");
        assert_eq!(json["correlation"]["status"], "error");
    }

    #[tokio::test]
    async fn test_dashboard_encoded_age_group() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(
            app,
            "/api/v1/dashboard?state=CA&age_group=65%2B&elective=CABG",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["elective_rows"], 1);
        assert_eq!(json["success"], "Visualizing patient approach for CABG (age 65+)");
    }

    #[tokio::test]
    async fn test_dashboard_unknown_state() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(app, "/api/v1/dashboard?state=ZZ").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "DATASET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dataset_preview() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(app, "/api/v1/datasets/CA?limit=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["shape"], serde_json::json!([3, 6]));
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_dataset_preview_limit_validation() {
        let (app, _dir) = create_test_app();
        let (status, json) = get_json(app, "/api/v1/datasets/CA?limit=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }
}
