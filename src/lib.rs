//! Post-processing for YOLO-style vertebra detectors.
//!
//! An image is letterboxed into a square model input, the model's raw output
//! is decoded into candidates, filtered by confidence, de-duplicated with
//! greedy NMS and mapped back to image (or display) coordinates.

mod utils;
pub mod common;
pub mod data;
pub mod detection_processing;
pub mod detection_runners;
pub mod detectors;
pub mod error;
#[cfg(feature = "overlay")]
pub mod overlay;

use std::time::Instant;

pub use crate::common::{ClassLabel, ClassLabelTable, OutputLayout, PipelineConfig, SkBox, SkDetection, SkImage};
pub use crate::data::{DetectionReport, DetectionResult, Tensor};
pub use crate::detection_runners::{InferenceSession, Pipeline};
pub use crate::detectors::{spawn_detector, DetectorHandle};
pub use crate::error::{DetectError, Result};

/// Builds a pipeline and runs one warm-up pass on a blank frame so the first
/// real request does not pay for session initialisation.
pub fn init_pipeline<S: InferenceSession>(session: S, config: PipelineConfig) -> Result<Pipeline<S>> {
    let pipeline = Pipeline::new(session, config)?;
    let size = pipeline.config().input_size;
    let warmup = SkImage::new(image::RgbImage::new(size, size));
    match pipeline.detect(&warmup) {
        Ok(result) => log::debug!("Warm-up produced {} detections", result.len()),
        Err(err) => log::warn!("Warm-up run failed: {}", err),
    }
    Ok(pipeline)
}

pub fn run_detection<S: InferenceSession>(pipeline: &Pipeline<S>, image: &SkImage) -> Result<DetectionResult> {
    let now = Instant::now();
    let result = pipeline.detect(image)?;
    log::info!("Processing time: {:?} | {} detections", now.elapsed(), result.len());
    Ok(result)
}
