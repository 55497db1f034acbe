// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the YOLO detection model

use image::{imageops::FilterType, RgbImage};
use ndarray::Array4;

/// Expected square input size for the detection model (640x640)
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Convert a decoded RGB image into the model input tensor
///
/// Resizes to 640x640 (bilinear) and packs into NCHW layout with pixel
/// values scaled to [0, 1]. The aspect ratio is not preserved; the
/// postprocessing step rescales boxes per-axis to undo this.
///
/// # Arguments
/// * `image` - Decoded RGB8 image at source resolution
///
/// # Returns
/// Tensor of shape [1, 3, 640, 640]
pub fn preprocess(image: &RgbImage) -> Array4<f32> {
    let size = YOLO_INPUT_SIZE;
    let resized = image::imageops::resize(image, size, size, FilterType::Triangle);

    let mut input = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
    for (x, y, pixel) in resized.enumerate_pixels() {
        input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
        input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
        input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
    }

    input
}
