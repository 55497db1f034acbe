// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    http::Method,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::detect::detect_handler;
use super::health::HealthResponse;
use crate::vision::{DetectionModelManager, MAX_UPLOAD_SIZE};

/// Headroom over the decoder's size guard so multipart framing does not
/// push an at-limit file over the transport body limit
const BODY_LIMIT_OVERHEAD: usize = 4 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub model_manager: Arc<DetectionModelManager>,
}

/// Build the application router
///
/// Separate from `start_server` so integration tests can drive the router
/// without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Detection endpoint
        .route("/detect", post(detect_handler))
        // Health check
        .route("/health", get(health_handler))
        // axum defaults to a 2MB body cap, well under the upload maximum
        // the decoder enforces; lift it so the pipeline sees the payload
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + BODY_LIMIT_OVERHEAD))
        .layer(
            // Mobile clients call cross-origin; only POST/OPTIONS are exposed
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    model_manager: Arc<DetectionModelManager>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState { model_manager };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::response::Json(HealthResponse::from_manager(&state.model_manager))
}
