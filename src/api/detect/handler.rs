// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handler

use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, info, warn};

use super::response::DetectResponse;
use crate::api::http_server::AppState;
use crate::vision::{run_detection, DetectError};

/// POST /detect - Count objects in an uploaded image
///
/// Accepts a multipart form with one file field and returns the object
/// count plus detected class labels.
///
/// # Request
/// - multipart form field `file` carrying the image (JPEG or PNG)
///
/// # Response
/// Always HTTP 200; errors ride the JSON body per the client contract:
/// - success: `{"count": int, "detections": [string...], "success": true}`
/// - failure: `{"error": string, "count": 0}`
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Json<DetectResponse> {
    debug!("Detection request received");

    let (bytes, content_type) = match read_file_part(multipart).await {
        Ok(Some(part)) => part,
        Ok(None) => {
            // No file part at all is treated as an empty upload
            warn!("Multipart request carried no file part");
            return Json(DetectResponse::failure(&DetectError::EmptyFile));
        }
        Err(e) => {
            warn!("Failed to read multipart upload: {}", e);
            return Json(DetectResponse::failure(&DetectError::Processing(e)));
        }
    };

    // Inference is CPU-bound and synchronous; keep it off the reactor
    let manager = state.model_manager.clone();
    let outcome = match tokio::task::spawn_blocking(move || {
        run_detection(&manager, &bytes, &content_type)
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => Err(DetectError::Processing(e.to_string())),
    };

    match &outcome {
        Ok(detections) => {
            info!("Detection completed: {} objects found", detections.len());
            if !detections.is_empty() {
                debug!(
                    "Detected classes: {:?}",
                    detections.iter().map(|d| d.label.as_str()).collect::<Vec<_>>()
                );
            }
        }
        Err(e) => warn!("Detection failed: {}", e),
    }

    Json(DetectResponse::from_outcome(outcome))
}

/// Pull the uploaded file out of the multipart stream
///
/// Takes the part named `file` (the field name the mobile client posts) or,
/// failing that, any part carrying a filename. Returns the raw bytes and
/// the content type declared in the part headers.
async fn read_file_part(mut multipart: Multipart) -> Result<Option<(Bytes, String)>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        // Absent content type fails the allow-list check downstream
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| e.to_string())?;
        return Ok(Some((bytes, content_type)));
    }

    Ok(None)
}
