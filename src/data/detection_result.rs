use serde::Serialize;

use crate::common::SkDetection;
use crate::data::StageTimings;
use crate::detection_processing::{CoordinateMapper, LetterboxInfo};

/// Outcome of running the pipeline on one image.
///
/// Detections are stored in model-input space, ordered by descending
/// confidence; the accessors map them to the space the caller draws in.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    detections: Vec<SkDetection>,
    letterbox: LetterboxInfo,
    candidates: usize,
    filtered: usize,
    timings: StageTimings,
}

/// Serializable summary in image space.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub detections: Vec<SkDetection>,
    pub image: ImageInfo,
    pub candidates: usize,
    pub filtered: usize,
    pub timings: StageTimings,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl DetectionResult {
    pub fn new(detections: Vec<SkDetection>, letterbox: LetterboxInfo) -> Self {
        let n = detections.len();
        Self {
            detections,
            letterbox,
            candidates: n,
            filtered: n,
            timings: StageTimings::default(),
        }
    }

    /// Records how many candidates were decoded and how many passed the confidence filter.
    pub fn with_counts(mut self, candidates: usize, filtered: usize) -> Self {
        self.candidates = candidates;
        self.filtered = filtered;
        self
    }

    pub fn with_timings(mut self, timings: StageTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn model_space(&self) -> &[SkDetection] {
        &self.detections
    }

    pub fn image_space(&self) -> Vec<SkDetection> {
        let mapper = self.mapper();
        self.detections.iter().map(|d| mapper.model_to_image(d)).collect()
    }

    /// Boxes for a surface of `target_width` x `target_height` showing the whole image.
    pub fn target_space(&self, target_width: f32, target_height: f32) -> Vec<SkDetection> {
        let mapper = self.mapper();
        self.detections
            .iter()
            .map(|d| mapper.model_to_target(d, target_width, target_height))
            .collect()
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.letterbox)
    }

    pub fn letterbox(&self) -> &LetterboxInfo {
        &self.letterbox
    }

    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn filtered(&self) -> usize {
        self.filtered
    }

    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    pub fn report(&self) -> DetectionReport {
        DetectionReport {
            detections: self.image_space(),
            image: ImageInfo {
                width: self.letterbox.image_width,
                height: self.letterbox.image_height,
            },
            candidates: self.candidates,
            filtered: self.filtered,
            timings: self.timings,
        }
    }

    pub fn into_detections(self) -> Vec<SkDetection> {
        self.detections
    }
}
