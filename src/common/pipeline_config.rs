use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{ClassLabelTable, OutputLayout};
use crate::error::{DetectError, Result};

/// Settings fixed at pipeline construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Side length `S` of the square model input.
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub class_labels: ClassLabelTable,
    /// Letterbox padding value for every channel.
    pub fill_value: u8,
    pub layout: OutputLayout,
    /// Synthesize `Class_<n>` labels instead of failing on unknown class indices.
    pub degraded_labels: bool,
    /// Pins the candidate count `N` when set.
    pub expected_candidates: Option<usize>,
    /// Class channels the model emits; the label table length when unset.
    pub expected_classes: Option<usize>,
    pub profile: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_size: 640,
            confidence_threshold: 0.5,
            iou_threshold: 0.4,
            class_labels: ClassLabelTable::vertebrae(),
            fill_value: 128,
            layout: OutputLayout::ChannelMajor,
            degraded_labels: false,
            expected_candidates: None,
            expected_classes: None,
            profile: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DetectError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&json)?)
    }

    pub fn with_input_size(mut self, n: u32) -> Self {
        self.input_size = n;
        self
    }

    pub fn with_confidence_threshold(mut self, x: f32) -> Self {
        self.confidence_threshold = x;
        self
    }

    pub fn with_iou_threshold(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_class_labels(mut self, labels: ClassLabelTable) -> Self {
        self.class_labels = labels;
        self
    }

    pub fn with_fill_value(mut self, x: u8) -> Self {
        self.fill_value = x;
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_degraded_labels(mut self, x: bool) -> Self {
        self.degraded_labels = x;
        self
    }

    pub fn with_expected_candidates(mut self, n: usize) -> Self {
        self.expected_candidates = Some(n);
        self
    }

    /// Declares a head with `n` class channels, which may exceed the label table.
    pub fn with_expected_classes(mut self, n: usize) -> Self {
        self.expected_classes = Some(n);
        self
    }

    /// Number of class channels the decoder requires, so `C = 4 + class_count()`.
    pub fn class_count(&self) -> usize {
        self.expected_classes.unwrap_or(self.class_labels.len())
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(DetectError::InvalidConfig("input size must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DetectError::InvalidConfig(format!(
                "confidence threshold {} outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DetectError::InvalidConfig(format!(
                "IoU threshold {} outside [0, 1]",
                self.iou_threshold
            )));
        }
        if self.class_labels.is_empty() {
            return Err(DetectError::InvalidConfig("class label table is empty".into()));
        }
        if self.expected_classes == Some(0) {
            return Err(DetectError::InvalidConfig("expected class count must be positive".into()));
        }
        Ok(())
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model Input Resolution: {0}x{0}\n\
        Output Layout: {1:?} {2}\n\
        Confidence Threshold: {3}\n\
        IoU Threshold: {4}\n\
        Class Labels: {5:?}\n\
        Degraded Labels: {6}",
               self.input_size, self.layout, self.layout.describe(),
               self.confidence_threshold, self.iou_threshold,
               self.class_labels.names(), self.degraded_labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_vertebra_model() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_size, 640);
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.iou_threshold, 0.4);
        assert_eq!(config.class_labels.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "confidence_threshold": 0.25, "class_labels": ["L1", "L2"], "layout": "candidate_major" }"#,
        )
        .unwrap();
        assert_eq!(config.confidence_threshold, 0.25);
        assert_eq!(config.iou_threshold, 0.4);
        assert_eq!(config.class_labels.names(), &["L1", "L2"]);
        assert_eq!(config.layout, OutputLayout::CandidateMajor);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(PipelineConfig::new().with_iou_threshold(1.5).validate().is_err());
        assert!(PipelineConfig::new().with_confidence_threshold(-0.1).validate().is_err());
        assert!(PipelineConfig::new().with_input_size(0).validate().is_err());
        assert!(PipelineConfig::from_json_str(r#"{ "class_labels": [] }"#).is_err());
        assert!(PipelineConfig::new().with_expected_classes(0).validate().is_err());
    }

    #[test]
    fn class_count_follows_label_table_unless_declared() {
        assert_eq!(PipelineConfig::default().class_count(), 5);
        let labels = ClassLabelTable::from_names(&["L1", "L2", "L3"]);
        assert_eq!(PipelineConfig::default().with_class_labels(labels).class_count(), 3);
        assert_eq!(PipelineConfig::default().with_expected_classes(6).class_count(), 6);
    }
}
