use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::common::{ClassLabel, SkBox};
use crate::detection_processing::nms::Nms;

/// A box with its winning class and confidence.
///
/// Serializes as `{bbox, confidence, class, synthesized}`; `synthesized` is set
/// when `class` is a `Class_<n>` placeholder rather than a table label.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SkDetection {
    pub bbox: SkBox,
    pub confidence: f32,
    pub class_id: usize,
    pub label: ClassLabel,
}

impl Serialize for SkDetection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SkDetection", 4)?;
        state.serialize_field("bbox", &self.bbox)?;
        state.serialize_field("confidence", &self.confidence)?;
        state.serialize_field("class", &self.label)?;
        state.serialize_field("synthesized", &self.label.is_synthesized())?;
        state.end()
    }
}

impl Nms for SkDetection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl SkDetection {
    pub fn new(bbox: SkBox, confidence: f32, class_id: usize, label: ClassLabel) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
            label,
        }
    }

    /// Sets the box from `(x, y, w, h)`.
    pub fn with_xy_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = SkBox::new(x, y, w, h);
        self
    }

    pub fn with_bbox(mut self, bbox: SkBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class(mut self, class_id: usize, label: ClassLabel) -> Self {
        self.class_id = class_id;
        self.label = label;
        self
    }

    /// Human readable caption, e.g. `L1 (94.0%)`.
    pub fn caption(&self) -> String {
        format!("{} ({:.1}%)", self.label, self.confidence * 100.)
    }
}
