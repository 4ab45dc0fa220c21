//! Maps boxes from model-input space to image space and on to any display space.
//!
//! The two stages stay separate: model→image undoes the letterbox (offset, then
//! `1 / scale`), image→target is a plain per-axis scale. Using `S / W, S / H`
//! directly would ignore the padding and misplace boxes on non-square images.

use crate::common::{SkBox, SkDetection};
use crate::detection_processing::letterbox::LetterboxInfo;
use crate::error::{DetectError, Result};

/// Per-axis scale factors between two coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub sx: f32,
    pub sy: f32,
}

impl ScaleTransform {
    pub fn new(sx: f32, sy: f32) -> Self {
        Self { sx, sy }
    }

    pub fn identity() -> Self {
        Self::new(1., 1.)
    }

    /// Applies `self` first, then `next`.
    pub fn then(&self, next: &ScaleTransform) -> Self {
        Self::new(self.sx * next.sx, self.sy * next.sy)
    }

    /// Scales the box and clamps its corner at zero.
    pub fn apply(&self, bbox: &SkBox) -> SkBox {
        bbox.scaled(self.sx, self.sy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    letterbox: LetterboxInfo,
}

impl CoordinateMapper {
    pub fn new(letterbox: LetterboxInfo) -> Self {
        Self { letterbox }
    }

    pub fn for_image(input_size: u32, image_width: u32, image_height: u32) -> Result<Self> {
        Ok(Self::new(LetterboxInfo::new(input_size, image_width, image_height)?))
    }

    pub fn letterbox(&self) -> &LetterboxInfo {
        &self.letterbox
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.letterbox.image_width, self.letterbox.image_height)
    }

    /// Scale part of model→image, applied after removing the padding offset.
    pub fn model_to_image_scale(&self) -> ScaleTransform {
        let inv = 1. / self.letterbox.scale;
        ScaleTransform::new(inv, inv)
    }

    pub fn image_to_target_scale(&self, target_width: f32, target_height: f32) -> ScaleTransform {
        let (w, h) = self.image_size();
        ScaleTransform::new(target_width / w as f32, target_height / h as f32)
    }

    pub fn model_to_image_box(&self, bbox: &SkBox) -> SkBox {
        let lb = &self.letterbox;
        SkBox {
            x: ((bbox.x - lb.off_x) / lb.scale).max(0.),
            y: ((bbox.y - lb.off_y) / lb.scale).max(0.),
            w: bbox.w / lb.scale,
            h: bbox.h / lb.scale,
        }
    }

    pub fn image_to_target_box(&self, bbox: &SkBox, target_width: f32, target_height: f32) -> SkBox {
        self.image_to_target_scale(target_width, target_height).apply(bbox)
    }

    /// Full model→target mapping: offset once, then the product of both scales.
    pub fn model_to_target_box(&self, bbox: &SkBox, target_width: f32, target_height: f32) -> SkBox {
        let lb = &self.letterbox;
        let unpadded = SkBox::new(bbox.x - lb.off_x, bbox.y - lb.off_y, bbox.w, bbox.h);
        self.model_to_image_scale()
            .then(&self.image_to_target_scale(target_width, target_height))
            .apply(&unpadded)
    }

    pub fn model_to_image(&self, det: &SkDetection) -> SkDetection {
        det.clone().with_bbox(self.model_to_image_box(&det.bbox))
    }

    pub fn image_to_target(&self, det: &SkDetection, target_width: f32, target_height: f32) -> SkDetection {
        det.clone()
            .with_bbox(self.image_to_target_box(&det.bbox, target_width, target_height))
    }

    pub fn model_to_target(&self, det: &SkDetection, target_width: f32, target_height: f32) -> SkDetection {
        det.clone()
            .with_bbox(self.model_to_target_box(&det.bbox, target_width, target_height))
    }
}

/// Display size for an image shown at `container_width`, capped at `max_height`
/// with the aspect ratio preserved. Zero-area images are rejected.
pub fn fit_display_size(
    image_width: u32,
    image_height: u32,
    container_width: f32,
    max_height: f32,
) -> Result<(f32, f32)> {
    if image_width == 0 || image_height == 0 {
        return Err(DetectError::InvalidImage {
            width: image_width,
            height: image_height,
        });
    }
    let aspect = image_width as f32 / image_height as f32;
    let (width, height) = (container_width, container_width / aspect);
    if height > max_height {
        Ok((max_height * aspect, max_height))
    } else {
        Ok((width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &SkBox, b: &SkBox) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3 && (a.w - b.w).abs() < 1e-3 && (a.h - b.h).abs() < 1e-3
    }

    #[test]
    fn inverts_letterbox_for_wide_image() {
        let mapper = CoordinateMapper::for_image(640, 1280, 640).unwrap();
        let model = SkBox::new(100., 100., 50., 50.);
        // (100 - 160) / 0.5 = -120 before the corner clamp.
        assert_eq!(mapper.model_to_image_box(&model), SkBox::new(200., 0., 100., 100.));
    }

    #[test]
    fn square_image_has_no_offset() {
        let mapper = CoordinateMapper::for_image(640, 1280, 1280).unwrap();
        let model = SkBox::new(320., 64., 32., 16.);
        assert_eq!(mapper.model_to_image_box(&model), SkBox::new(640., 128., 64., 32.));
    }

    #[test]
    fn image_to_target_is_independent_per_axis() {
        let mapper = CoordinateMapper::for_image(640, 1000, 500).unwrap();
        let image_box = SkBox::new(100., 100., 200., 50.);
        assert!(close(
            &mapper.image_to_target_box(&image_box, 500., 400.),
            &SkBox::new(50., 80., 100., 40.)
        ));
    }

    #[test]
    fn composed_mapping_matches_two_stages() {
        let mapper = CoordinateMapper::for_image(640, 1200, 900).unwrap();
        let model = SkBox::new(210., 140., 75., 40.);
        let staged = mapper.image_to_target_box(&mapper.model_to_image_box(&model), 533., 400.);
        let composed = mapper.model_to_target_box(&model, 533., 400.);
        assert!(close(&staged, &composed), "{staged:?} vs {composed:?}");
    }

    #[test]
    fn scale_transforms_compose_by_multiplication() {
        let t = ScaleTransform::new(2., 0.5).then(&ScaleTransform::new(3., 4.));
        assert_eq!(t, ScaleTransform::new(6., 2.));
        assert_eq!(ScaleTransform::identity().apply(&SkBox::new(1., 2., 3., 4.)), SkBox::new(1., 2., 3., 4.));
    }

    #[test]
    fn display_size_respects_max_height() {
        assert_eq!(fit_display_size(1000, 500, 500., 400.).unwrap(), (500., 250.));
        assert_eq!(fit_display_size(500, 1000, 500., 400.).unwrap(), (200., 400.));
    }

    #[test]
    fn display_size_rejects_zero_area_images() {
        assert!(matches!(
            fit_display_size(640, 0, 500., 400.),
            Err(DetectError::InvalidImage { width: 640, height: 0 })
        ));
        assert!(matches!(
            fit_display_size(0, 480, 500., 400.),
            Err(DetectError::InvalidImage { width: 0, height: 480 })
        ));
    }
}
