// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of raw YOLO output into detections
//!
//! YOLOv8 exports emit a single tensor of shape [1, 4+C, N]: per candidate
//! a center-format box (cx, cy, w, h) followed by C per-class scores. This
//! module filters candidates at the confidence threshold, applies greedy
//! non-maximum suppression, and rescales boxes to source image coordinates.

use anyhow::{Context, Result};
use ndarray::{s, ArrayViewD, Axis, Ix3};

use super::preprocessing::YOLO_INPUT_SIZE;
use crate::vision::labels::class_label;

/// Minimum score for a candidate to count as a detection
pub const CONFIDENCE_THRESHOLD: f32 = 0.4;

/// IoU above which two same-class boxes are considered duplicates
pub const NMS_IOU_THRESHOLD: f32 = 0.45;

/// One detected object instance
#[derive(Debug, Clone)]
pub struct Detection {
    /// Class id into the model vocabulary
    pub class_id: usize,
    /// Resolved class label
    pub label: String,
    /// Best class score (>= threshold)
    pub confidence: f32,
    /// Box corners in source image coordinates
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Detection {
    /// Box area in source pixels
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }
}

/// Intersection-over-union of two boxes
fn iou(a: &Detection, b: &Detection) -> f32 {
    let ix = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let iy = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);
    let intersection = ix * iy;
    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Decode a raw model output tensor into detections
///
/// # Arguments
/// * `output` - Raw output tensor, expected shape [1, 4+C, N]
/// * `src_width` / `src_height` - Source image dimensions for box rescaling
/// * `confidence_threshold` - Minimum class score to keep a candidate
///
/// # Returns
/// Detections ordered by descending confidence, duplicates suppressed.
/// Returns an error for output shapes the decoder does not understand
/// (malformed model output is reported, never panics).
pub fn decode_predictions(
    output: ArrayViewD<'_, f32>,
    src_width: u32,
    src_height: u32,
    confidence_threshold: f32,
) -> Result<Vec<Detection>> {
    let output = output
        .into_dimensionality::<Ix3>()
        .context("unexpected output rank, expected [1, 4+C, N]")?;

    let shape = output.shape();
    if shape[0] != 1 || shape[1] < 5 {
        anyhow::bail!("unexpected output shape: {:?}, expected [1, 4+C, N]", shape);
    }

    let view = output.index_axis(Axis(0), 0);
    let num_candidates = view.shape()[1];

    // Per-axis rescale back to source coordinates (preprocessing squashes
    // the image to a square)
    let sx = src_width as f32 / YOLO_INPUT_SIZE as f32;
    let sy = src_height as f32 / YOLO_INPUT_SIZE as f32;

    let mut candidates = Vec::new();

    for i in 0..num_candidates {
        let scores = view.slice(s![4.., i]);
        let (class_id, &max_score) = scores
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .context("model output carries no class scores")?;

        if max_score < confidence_threshold {
            continue;
        }

        let cx = view[[0, i]];
        let cy = view[[1, i]];
        let w = view[[2, i]];
        let h = view[[3, i]];

        candidates.push(Detection {
            class_id,
            label: class_label(class_id).to_string(),
            confidence: max_score,
            x1: (cx - w / 2.0) * sx,
            y1: (cy - h / 2.0) * sy,
            x2: (cx + w / 2.0) * sx,
            y2: (cy + h / 2.0) * sy,
        });
    }

    candidates.sort_unstable_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(non_max_suppression(candidates))
}

/// Greedy class-aware NMS over confidence-sorted candidates
fn non_max_suppression(candidates: Vec<Detection>) -> Vec<Detection> {
    let mut kept: Vec<Detection> = Vec::new();

    for candidate in candidates {
        let duplicate = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && iou(k, &candidate) > NMS_IOU_THRESHOLD);
        if !duplicate {
            kept.push(candidate);
        }
    }

    kept
}
