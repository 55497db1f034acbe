// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO detection model session
//!
//! Wraps the ONNX Runtime session for the detection model. Runs on CPU
//! only to avoid GPU VRAM competition with the LLM engine.

use anyhow::{Context, Result};
use image::RgbImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::postprocessing::{decode_predictions, Detection, CONFIDENCE_THRESHOLD};
use super::preprocessing::preprocess;

/// YOLO object detection model
///
/// The session sits behind a mutex: ONNX Runtime inference takes `&mut`
/// access, and the mutex also serializes concurrent requests against the
/// single loaded session.
#[derive(Clone)]
pub struct YoloModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Confidence threshold for detections
    confidence_threshold: f32,
}

impl std::fmt::Debug for YoloModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloModel")
            .field("input_name", &self.input_name)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish_non_exhaustive()
    }
}

impl YoloModel {
    /// Load the detection model from an ONNX file
    ///
    /// # Arguments
    /// - `model_path`: Path to the ONNX model file (general.onnx)
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading detection model from {}", model_path.display());

        // CPU-only execution (no GPU for vision)
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        if let Some(input) = session.inputs.first() {
            debug!("Detection model input shape: {:?}", input.input_type);
        }

        info!("✅ Detection model loaded successfully (CPU-only)");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            confidence_threshold: CONFIDENCE_THRESHOLD,
        })
    }

    /// Get current confidence threshold
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Run object detection on a decoded image
    ///
    /// Synchronous and CPU-bound; callers on an async runtime should move
    /// this onto a blocking thread.
    ///
    /// # Arguments
    /// - `image`: Decoded RGB image at source resolution
    ///
    /// # Returns
    /// - `Result<Vec<Detection>>`: Detections above the confidence threshold
    pub fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        let input = preprocess(image);

        let mut session = self.session.lock().unwrap();

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Detection output shape: {:?}", output_tensor.shape());

        let detections = decode_predictions(
            output_tensor.view(),
            image.width(),
            image.height(),
            self.confidence_threshold,
        )?;

        debug!("Detected {} objects", detections.len());

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model_fails() {
        let result = YoloModel::load("./does-not-exist/general.onnx");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Detection model not found"));
    }

    #[test]
    fn test_default_threshold() {
        assert!((CONFIDENCE_THRESHOLD - 0.4).abs() < f32::EPSILON);
    }
}
