// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based object detection
//!
//! This module provides:
//! - Upload decoding and validation via the `image` crate
//! - YOLO object detection via ONNX Runtime
//!
//! Inference runs on CPU only; the service is deployed next to an LLM node
//! and must not compete for GPU VRAM.

pub mod image_utils;
pub mod labels;
pub mod model_manager;
pub mod pipeline;
pub mod yolo;

pub use image_utils::{decode_upload, ImageError, ALLOWED_CONTENT_TYPES, MAX_UPLOAD_SIZE};
pub use model_manager::{DetectionModelManager, DetectorConfig};
pub use pipeline::{run_detection, DetectError};
pub use yolo::{Detection, YoloModel, CONFIDENCE_THRESHOLD};
