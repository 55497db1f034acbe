// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health endpoint types

use serde::{Deserialize, Serialize};

use crate::vision::DetectionModelManager;

/// Response from GET /health
///
/// Derived purely from whether the model load succeeded at startup; there
/// is no other state to report and the check itself never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "model_not_loaded"
    pub status: String,
    /// Whether the detection model is loaded
    pub model_loaded: bool,
}

impl HealthResponse {
    /// Read health from the process-wide model manager
    pub fn from_manager(manager: &DetectionModelManager) -> Self {
        let model_loaded = manager.is_loaded();
        Self {
            status: if model_loaded {
                "healthy".to_string()
            } else {
                "model_not_loaded".to_string()
            },
            model_loaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::DetectorConfig;
    use serde_json::json;

    #[tokio::test]
    async fn test_health_model_not_loaded() {
        let manager = DetectionModelManager::new(DetectorConfig {
            model_path: "./does-not-exist/general.onnx".to_string(),
        })
        .await
        .unwrap();

        let health = HealthResponse::from_manager(&manager);
        assert_eq!(health.status, "model_not_loaded");
        assert!(!health.model_loaded);

        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(
            value,
            json!({"status": "model_not_loaded", "model_loaded": false})
        );
    }

    #[test]
    fn test_healthy_serialization_shape() {
        let health = HealthResponse {
            status: "healthy".to_string(),
            model_loaded: true,
        };
        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value, json!({"status": "healthy", "model_loaded": true}));
    }
}
