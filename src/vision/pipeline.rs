// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection request pipeline
//!
//! Orchestrates the request-to-result flow: model availability check,
//! upload decode, inference, aggregation. Every failure is classified into
//! `DetectError`; nothing escapes to the transport layer as a fault. The
//! error display strings are the wire contract the mobile client matches on
//! and must not be reworded.

use thiserror::Error;
use tracing::debug;

use crate::vision::image_utils::{decode_upload, ImageError};
use crate::vision::model_manager::DetectionModelManager;
use crate::vision::yolo::Detection;

/// Failure taxonomy for a detection request
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Invalid file type. Please upload JPEG or PNG")]
    InvalidFileType,

    #[error("Empty file")]
    EmptyFile,

    #[error("Invalid or corrupted image file")]
    CorruptImage,

    #[error("Processing error: {0}")]
    Processing(String),
}

impl From<ImageError> for DetectError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidFileType(_) => DetectError::InvalidFileType,
            ImageError::EmptyData => DetectError::EmptyFile,
            ImageError::DecodeFailed(_) => DetectError::CorruptImage,
            // Size guard is a supplement to the client contract; it rides
            // the generic processing arm
            ImageError::TooLarge(..) => DetectError::Processing(err.to_string()),
        }
    }
}

/// Run the full detection pipeline over one uploaded payload
///
/// Checks the model handle first (fail fast, no decode for a dead model),
/// then decodes, then infers. Synchronous and CPU-bound during inference;
/// the HTTP handler runs this on a blocking thread.
///
/// # Arguments
/// * `manager` - Process-wide model holder
/// * `bytes` - Raw upload bytes
/// * `content_type` - MIME type declared for the upload
pub fn run_detection(
    manager: &DetectionModelManager,
    bytes: &[u8],
    content_type: &str,
) -> Result<Vec<Detection>, DetectError> {
    let model = manager.get_model().ok_or(DetectError::ModelUnavailable)?;

    let image = decode_upload(bytes, content_type)?;
    debug!("Image loaded: {}x{} pixels", image.width(), image.height());

    let detections = model
        .detect(&image)
        .map_err(|e| DetectError::Processing(e.to_string()))?;

    debug!("Detection completed: {} objects found", detections.len());

    Ok(detections)
}
