//! Decodes the raw detection-head tensor into unfiltered candidates.
//!
//! Layout contract for the default [`OutputLayout::ChannelMajor`] head: the
//! tensor is `[1, C, N]` with `C = 4 + classes`. Channel `c` of candidate `i`
//! sits at flat index `c * N + i`, *not* interleaved per candidate. Channels
//! 0..4 are `cx, cy, w, h` already in input pixels (no extra scaling by `S`);
//! the remaining channels are per-class scores. Supporting a new head means a
//! new [`OutputLayout`] variant that yields the same `(C, N)` view.

use ndarray::{s, ArrayView2, Axis, Ix3};

use crate::common::{ClassLabelTable, OutputLayout, PipelineConfig, SkBox, SkDetection};
use crate::data::Tensor;
use crate::error::{DetectError, Result};

const BOX_CHANNELS: usize = 4;

#[derive(Debug, Clone)]
pub struct OutputDecoder {
    layout: OutputLayout,
    labels: ClassLabelTable,
    degraded_labels: bool,
    expected_candidates: Option<usize>,
    expected_classes: Option<usize>,
}

impl OutputDecoder {
    pub fn new(layout: OutputLayout, labels: ClassLabelTable) -> Self {
        Self {
            layout,
            labels,
            degraded_labels: false,
            expected_candidates: None,
            expected_classes: None,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            layout: config.layout,
            labels: config.class_labels.clone(),
            degraded_labels: config.degraded_labels,
            expected_candidates: config.expected_candidates,
            expected_classes: config.expected_classes,
        }
    }

    pub fn with_degraded_labels(mut self, x: bool) -> Self {
        self.degraded_labels = x;
        self
    }

    pub fn with_expected_candidates(mut self, n: usize) -> Self {
        self.expected_candidates = Some(n);
        self
    }

    /// Declares more (or fewer) class channels than the label table holds.
    pub fn with_expected_classes(mut self, n: usize) -> Self {
        self.expected_classes = Some(n);
        self
    }

    pub fn class_count(&self) -> usize {
        self.expected_classes.unwrap_or(self.labels.len())
    }

    pub fn labels(&self) -> &ClassLabelTable {
        &self.labels
    }

    /// Emits one candidate per slot, in slot order, with no thresholding.
    pub fn decode(&self, output: &Tensor) -> Result<Vec<SkDetection>> {
        let preds = self.channel_view(output)?;
        let (channels, candidates) = preds.dim();

        let mut detections = Vec::with_capacity(candidates);
        let mut synthesized = 0usize;
        for i in 0..candidates {
            let slot = preds.column(i);
            let (cx, cy, w, h) = (slot[0], slot[1], slot[2], slot[3]);

            let scores = slot.slice(s![BOX_CHANNELS..channels]);
            let (class_id, confidence) = best_class(scores.iter().copied());

            let label = self.labels.label(class_id, self.degraded_labels)?;
            if label.is_synthesized() {
                synthesized += 1;
            }

            detections.push(SkDetection::new(
                SkBox::from_cxcy_wh(cx, cy, w, h),
                confidence,
                class_id,
                label,
            ));
        }

        if synthesized > 0 {
            log::warn!(
                "{} candidates carry synthesized labels; the class table holds {} names",
                synthesized,
                self.labels.len()
            );
        }

        Ok(detections)
    }

    /// Validates the shape against the declared layout and returns a `(C, N)` view.
    fn channel_view<'a>(&self, output: &'a Tensor) -> Result<ArrayView2<'a, f32>> {
        let shape = output.dims();
        let shape_error = |reason: &str| DetectError::DecodeShape {
            expected: format!("{} ({})", self.layout.describe(), reason),
            actual: shape.to_vec(),
        };

        let (channels, candidates) = self
            .layout
            .channels_and_candidates(shape)
            .ok_or_else(|| shape_error("rank 3, batch 1"))?;
        if channels <= BOX_CHANNELS {
            return Err(shape_error("at least one class channel"));
        }
        let classes = self.class_count();
        if channels != BOX_CHANNELS + classes {
            return Err(shape_error(&format!("{} channels for {} classes", BOX_CHANNELS + classes, classes)));
        }
        if let Some(n) = self.expected_candidates {
            if n != candidates {
                return Err(shape_error(&format!("{} candidates", n)));
            }
        }

        let batch = output.view().into_dimensionality::<Ix3>()?;
        let preds = batch.index_axis_move(Axis(0), 0);
        Ok(match self.layout {
            OutputLayout::ChannelMajor => preds,
            OutputLayout::CandidateMajor => preds.reversed_axes(),
        })
    }
}

/// Highest score and its class offset; ties keep the lowest index.
fn best_class(scores: impl Iterator<Item = f32>) -> (usize, f32) {
    let mut best = (0usize, f32::NAN);
    for (idx, score) in scores.enumerate() {
        if best.1.is_nan() || score > best.1 {
            best = (idx, score);
        }
    }
    best
}
