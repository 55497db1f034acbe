// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection model manager
//!
//! Attempts the model load exactly once at process startup. A failed load
//! is recorded, not fatal: the service keeps running and every detection
//! request reports the model as unavailable. There is no retry and no
//! reload endpoint; the handle is immutable for the process lifetime.

use std::sync::Arc;

use crate::vision::yolo::YoloModel;

/// Configuration for loading the detection model
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the ONNX model file
    pub model_path: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: "./models/general.onnx".to_string(),
        }
    }
}

/// Holder for the once-loaded detection model
pub struct DetectionModelManager {
    model: Option<Arc<YoloModel>>,
}

impl DetectionModelManager {
    /// Create a new manager, attempting the model load once
    ///
    /// A missing or unloadable model is handled gracefully; the manager
    /// reports `is_loaded() == false` and the service degrades.
    pub async fn new(config: DetectorConfig) -> anyhow::Result<Self> {
        let model = match YoloModel::load(&config.model_path) {
            Ok(model) => {
                tracing::info!("✅ Detection model loaded from {}", config.model_path);
                Some(Arc::new(model))
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Failed to load detection model from {}: {}",
                    config.model_path,
                    e
                );
                None
            }
        };

        Ok(Self { model })
    }

    /// Get the detection model if available
    pub fn get_model(&self) -> Option<Arc<YoloModel>> {
        self.model.clone()
    }

    /// Check if the model loaded successfully
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}
