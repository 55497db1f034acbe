// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO detection model
//!
//! This module wraps a YOLOv8-family ONNX export: preprocessing into the
//! fixed 640x640 NCHW input tensor, the ONNX Runtime session, and the
//! candidate decode / non-maximum suppression on the output.

pub mod model;
pub mod postprocessing;
pub mod preprocessing;

pub use model::YoloModel;
pub use postprocessing::{Detection, CONFIDENCE_THRESHOLD, NMS_IOU_THRESHOLD};
pub use preprocessing::{preprocess, YOLO_INPUT_SIZE};
