// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_vision_node::{
    api,
    vision::{DetectionModelManager, DetectorConfig},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Vision Node...\n");
    println!("📦 BUILD VERSION: {}", fabstir_vision_node::version::VERSION);
    println!("📅 Build Date: {}", fabstir_vision_node::version::BUILD_DATE);
    println!();

    // Parse environment variables for configuration
    let api_port = env::var("API_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or(8000);
    let model_path =
        env::var("MODEL_PATH").unwrap_or_else(|_| "./models/general.onnx".to_string());

    // Load the detection model once; a failed load degrades the service
    // instead of aborting startup
    println!("🧠 Initializing detection model...");
    let config = DetectorConfig { model_path };
    let model_manager = Arc::new(DetectionModelManager::new(config).await?);

    if model_manager.is_loaded() {
        println!("✅ Detection model ready");
    } else {
        eprintln!("⚠️ Detection model unavailable - requests will report it as not loaded");
    }

    println!("🌐 Starting API server on port {}...", api_port);
    api::start_server(model_manager, api_port)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {}", e))?;

    Ok(())
}
