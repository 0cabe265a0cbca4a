//! HTTP server shell
//!
//! Thin axum wiring around the lookup pipeline: three routes, open CORS for
//! arbitrary frontends, and a single place where the error taxonomy maps to
//! status codes.

pub mod health;
pub mod rut;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::fetch::headless::HeadlessRenderer;
use crate::fetch::{PageRenderer, Resolver};

/// Shared application state, cloned into every handler
pub struct AppState<R> {
    pub config: Arc<Config>,
    pub resolver: Arc<Resolver<R>>,
}

// Manual impl: Arc fields clone regardless of whether R does
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<R: PageRenderer> AppState<R> {
    pub fn new(config: Config, renderer: R) -> Self {
        let config = Arc::new(config);
        let resolver = Arc::new(Resolver::new(config.clone(), renderer));
        Self { config, resolver }
    }
}

/// Builds the application router over any renderer implementation
pub fn router<R: PageRenderer>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/rut/:rut", get(rut::lookup::<R>))
        .route("/rut/:rut/raw", get(rut::raw::<R>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds and serves until the process is terminated
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let state = AppState::new(config, HeadlessRenderer);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("📡 servidor HTTP escuchando en {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Boundary wrapper mapping [`AppError`] kinds onto HTTP responses
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::InvalidRut | AppError::ExtractionEmpty => StatusCode::BAD_REQUEST,
            AppError::EngineUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Browser(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(json!({ "detail": self.0.to_string() }));
        (status, body).into_response()
    }
}
