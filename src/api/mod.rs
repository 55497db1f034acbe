// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP API for the detection service
//!
//! Two routes: POST /detect (multipart image upload) and GET /health.

pub mod detect;
pub mod health;
pub mod http_server;

pub use detect::{detect_handler, DetectResponse};
pub use health::HealthResponse;
pub use http_server::{build_router, start_server, AppState};
