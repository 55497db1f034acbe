// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload decoding and validation for the detection endpoint

use image::RgbImage;
use thiserror::Error;

/// Maximum upload size (10MB)
///
/// Shared with the HTTP layer, which raises axum's default body limit to
/// match; this decoder-side check stays authoritative for the file bytes.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Content types the mobile client may declare for an upload
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Custom error types for upload processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported content type: {0}")]
    InvalidFileType(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Decode an uploaded payload into a canonical RGB8 buffer
///
/// Validation short-circuits in contract order: declared content type first,
/// then emptiness, then the actual decode. The decoded image is always
/// converted to 3-channel RGB (paletted and grayscale sources up-convert),
/// so the detector always receives a uniform tensor shape.
///
/// # Arguments
/// * `bytes` - Raw upload bytes from the multipart form
/// * `content_type` - MIME type declared in the part headers
///
/// # Returns
/// * `Ok(RgbImage)` - The decoded, normalized image
/// * `Err(ImageError)` - If validation or decoding fails
pub fn decode_upload(bytes: &[u8], content_type: &str) -> Result<RgbImage, ImageError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(ImageError::InvalidFileType(content_type.to_string()));
    }

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_UPLOAD_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_UPLOAD_SIZE));
    }

    let img = image::load_from_memory(bytes).map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    Ok(img.to_rgb8())
}
