use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::common::{PipelineConfig, SkImage};
use crate::data::{DetectionResult, StageTimings, Tensor};
use crate::detection_processing::{apply_nms, filter_by_confidence, letterbox, LetterboxInfo, OutputDecoder};
use crate::detection_runners::InferenceSession;
use crate::error::{DetectError, Result};
use crate::utils;

/// Letterbox → inference → decode → confidence filter → NMS.
///
/// Holds its own session handle and an immutable config; every call allocates
/// its own buffers, so one pipeline can serve concurrent callers.
#[derive(Debug)]
pub struct Pipeline<S> {
    session: S,
    config: PipelineConfig,
    decoder: OutputDecoder,
}

impl<S: InferenceSession> Pipeline<S> {
    pub fn new(session: S, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let decoder = OutputDecoder::from_config(&config);
        log::info!("Detection pipeline ready\n{}", config);
        Ok(Self {
            session,
            config,
            decoder,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn preprocess(&self, image: &SkImage) -> Result<(Tensor, LetterboxInfo)> {
        letterbox(image, self.config.input_size, self.config.fill_value)
    }

    /// Runs the session once. Failures are surfaced, never retried.
    pub fn inference(&self, input: &Tensor) -> Result<Tensor> {
        self.session.infer(input).map_err(DetectError::Inference)
    }

    /// Decodes, filters and deduplicates a raw head output.
    pub fn postprocess(&self, output: &Tensor, letterbox: &LetterboxInfo) -> Result<DetectionResult> {
        let candidates = self.decoder.decode(output)?;
        let decoded = candidates.len();
        log::debug!("Found {} candidates before filtering", decoded);

        let filtered = filter_by_confidence(candidates, self.config.confidence_threshold);
        let kept = filtered.len();
        log::debug!(
            "{} candidates at or above confidence {}",
            kept,
            self.config.confidence_threshold
        );

        let detections = apply_nms(filtered, self.config.iou_threshold);
        log::debug!("{} detections after NMS (IoU {})", detections.len(), self.config.iou_threshold);

        Ok(DetectionResult::new(detections, *letterbox).with_counts(decoded, kept))
    }

    pub fn detect(&self, image: &SkImage) -> Result<DetectionResult> {
        let detect_time = Instant::now();
        let mut elapsed = Duration::ZERO;

        let (input, letterbox) = self.preprocess(image)?;
        let t_pre = detect_time.elapsed() - elapsed;
        elapsed = utils::trace("Preprocessing input", detect_time, elapsed);

        let output = self.inference(&input)?;
        let t_exe = detect_time.elapsed() - elapsed;
        elapsed = utils::trace("Inference", detect_time, elapsed);

        let result = self.postprocess(&output, &letterbox)?;
        let t_post = detect_time.elapsed() - elapsed;
        utils::trace("Postprocessing", detect_time, elapsed);

        let timings = StageTimings {
            preprocess: t_pre,
            inference: t_exe,
            postprocess: t_post,
        };
        if self.config.profile {
            log::info!("> Preprocess: {t_pre:?} | Inference: {t_exe:?} | Postprocess: {t_post:?}");
        }

        Ok(result.with_timings(timings))
    }

    /// Runs independent images in parallel; results keep the input order.
    pub fn detect_batch(&self, images: &[SkImage]) -> Vec<Result<DetectionResult>> {
        images.par_iter().map(|image| self.detect(image)).collect()
    }
}
