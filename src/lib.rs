// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{build_router, start_server, AppState};
pub use vision::{
    run_detection, DetectError, Detection, DetectionModelManager, DetectorConfig, YoloModel,
};
