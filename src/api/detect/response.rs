// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response types
//!
//! The JSON shape is a preserved contract with the mobile client: success
//! bodies are `{"count", "detections", "success": true}`, failure bodies
//! are `{"error", "count": 0}`. The two shapes never mix, which is why the
//! optional fields skip serialization when unset.

use serde::{Deserialize, Serialize};

use crate::vision::{DetectError, Detection};

/// Response from the detection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    /// Number of detected objects (0 on any failure)
    pub count: usize,
    /// Class labels in model output order, one per detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<Vec<String>>,
    /// Present and true only on full success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Classified error message, present only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectResponse {
    /// Build a success response from aggregated labels
    pub fn ok(labels: Vec<String>) -> Self {
        Self {
            count: labels.len(),
            detections: Some(labels),
            success: Some(true),
            error: None,
        }
    }

    /// Build a failure response carrying the classified error string
    pub fn failure(err: &DetectError) -> Self {
        Self {
            count: 0,
            detections: None,
            success: None,
            error: Some(err.to_string()),
        }
    }

    /// Shape a pipeline outcome into the wire response
    pub fn from_outcome(outcome: Result<Vec<Detection>, DetectError>) -> Self {
        match outcome {
            Ok(detections) => {
                Self::ok(detections.into_iter().map(|d| d.label).collect())
            }
            Err(err) => Self::failure(&err),
        }
    }
}
