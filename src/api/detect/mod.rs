// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection API endpoint module
//!
//! Provides POST /detect for counting objects in an uploaded image.

pub mod handler;
pub mod response;

pub use handler::detect_handler;
pub use response::DetectResponse;
