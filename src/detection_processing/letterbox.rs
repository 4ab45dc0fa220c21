//! Letterbox preprocessing: fit an image into the square model input without
//! distorting it, then pack it as a normalized planar tensor.

use fast_image_resize::{
    images::{CroppedImageMut, Image as FirImage},
    pixels::PixelType,
    FilterType, ResizeAlg, ResizeOptions, Resizer,
};
use serde::Serialize;

use crate::common::SkImage;
use crate::data::Tensor;
use crate::error::{DetectError, Result};

/// Geometry of one letterbox operation.
///
/// `scale` and the offsets are the exact real-valued placement of the image
/// inside the `input_size` square; the coordinate mapper inverts them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LetterboxInfo {
    pub input_size: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub scale: f32,
    pub off_x: f32,
    pub off_y: f32,
}

impl LetterboxInfo {
    pub fn new(input_size: u32, image_width: u32, image_height: u32) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(DetectError::InvalidImage {
                width: image_width,
                height: image_height,
            });
        }
        if input_size == 0 {
            return Err(DetectError::InvalidConfig("input size must be positive".into()));
        }
        let s = input_size as f32;
        let (w, h) = (image_width as f32, image_height as f32);
        let scale = (s / w).min(s / h);
        Ok(Self {
            input_size,
            image_width,
            image_height,
            scale,
            off_x: (s - w * scale) / 2.,
            off_y: (s - h * scale) / 2.,
        })
    }

    /// Size of the drawn image inside the square, before rounding to pixels.
    pub fn scaled_size(&self) -> (f32, f32) {
        (
            self.image_width as f32 * self.scale,
            self.image_height as f32 * self.scale,
        )
    }

    /// Pixel rectangle `(left, top, width, height)` the resized image is drawn into.
    pub fn raster_region(&self) -> (u32, u32, u32, u32) {
        let (sw, sh) = self.scaled_size();
        let new_w = (sw.round() as u32).clamp(1, self.input_size);
        let new_h = (sh.round() as u32).clamp(1, self.input_size);
        (
            (self.input_size - new_w) / 2,
            (self.input_size - new_h) / 2,
            new_w,
            new_h,
        )
    }

    /// Maps an image-space point into model-input space.
    pub fn image_to_model(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.off_x, y * self.scale + self.off_y)
    }

    /// Maps a model-input point back into image space (no clamping).
    pub fn model_to_image(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.off_x) / self.scale, (y - self.off_y) / self.scale)
    }
}

/// Letterboxes `image` into an `input_size` square filled with `fill` and returns
/// the `[1, 3, S, S]` tensor with samples in `[0, 1]`.
pub fn letterbox(image: &SkImage, input_size: u32, fill: u8) -> Result<(Tensor, LetterboxInfo)> {
    let (width, height) = image.checked_dimensions()?;
    let info = LetterboxInfo::new(input_size, width, height)?;

    let src = image.to_fir_image()?;
    let padded = letterbox_image(&src, &info, fill)?;
    let planar = nchw_normalize_flat(padded.buffer(), input_size as usize)?;

    let s = input_size as usize;
    let tensor = Tensor::from_shape_vec(&[1, 3, s, s], planar)?;
    Ok((tensor, info))
}

fn letterbox_image<'a>(img: &FirImage, info: &LetterboxInfo, bg: u8) -> Result<FirImage<'a>> {
    let size = info.input_size;
    let (left, top, new_w, new_h) = info.raster_region();

    let mut padded = FirImage::from_vec_u8(
        size,
        size,
        vec![bg; (size as usize) * (size as usize) * 3],
        PixelType::U8x3,
    )
    .map_err(|e| DetectError::Resize(e.to_string()))?;

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let mut resizer = Resizer::new();
    let mut cropped = CroppedImageMut::new(&mut padded, left, top, new_w, new_h)
        .map_err(|e| DetectError::Resize(e.to_string()))?;
    resizer
        .resize(img, &mut cropped, &options)
        .map_err(|e| DetectError::Resize(e.to_string()))?;

    Ok(padded)
}

/// Interleaved RGB bytes to three contiguous normalized planes.
fn nchw_normalize_flat(buf: &[u8], side: usize) -> Result<Vec<f32>> {
    let hw = side * side;
    if buf.len() != hw * 3 {
        return Err(DetectError::Resize(format!(
            "unexpected buffer size: got {}, expected {}",
            buf.len(),
            hw * 3
        )));
    }

    let mut out = vec![0.0f32; buf.len()];
    for (i, px) in buf.chunks_exact(3).enumerate() {
        out[i] = px[0] as f32 / 255.0;
        out[i + hw] = px[1] as f32 / 255.0;
        out[i + 2 * hw] = px[2] as f32 / 255.0;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage};

    fn plane_value(t: &Tensor, c: usize, x: usize, y: usize) -> f32 {
        t[[0, c, y, x]]
    }

    #[test]
    fn geometry_for_wide_image() {
        let info = LetterboxInfo::new(640, 1280, 640).unwrap();
        assert_eq!(info.scale, 0.5);
        assert_eq!(info.off_x, 0.);
        assert_eq!(info.off_y, 160.);
        assert_eq!(info.raster_region(), (0, 160, 640, 320));
    }

    #[test]
    fn pads_with_fill_and_keeps_image_centered() {
        let img = SkImage::from(RgbImage::from_pixel(128, 64, Rgb([255, 0, 0])));
        let (tensor, info) = letterbox(&img, 64, 128).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, 64, 64]);
        assert_eq!(info.raster_region(), (0, 16, 64, 32));

        let gray = 128. / 255.;
        for c in 0..3 {
            assert!((plane_value(&tensor, c, 10, 0) - gray).abs() < 1e-6);
            assert!((plane_value(&tensor, c, 10, 63) - gray).abs() < 1e-6);
        }
        assert!((plane_value(&tensor, 0, 32, 32) - 1.).abs() < 1e-2);
        assert!(plane_value(&tensor, 1, 32, 32).abs() < 1e-2);
        assert!(plane_value(&tensor, 2, 32, 32).abs() < 1e-2);
    }

    #[test]
    fn drops_alpha_channel() {
        let img = SkImage::from(RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 255, 10])));
        let (tensor, _) = letterbox(&img, 8, 128).unwrap();
        assert_eq!(tensor.dims()[1], 3);
        assert!((plane_value(&tensor, 2, 4, 4) - 1.).abs() < 1e-2);
    }

    #[test]
    fn extreme_aspect_ratio_keeps_proportions() {
        let info = LetterboxInfo::new(64, 1000, 10).unwrap();
        let (left, top, w, h) = info.raster_region();
        assert_eq!((left, w), (0, 64));
        assert_eq!(h, 1);
        assert_eq!(top, 31);

        let img = SkImage::from(RgbImage::from_pixel(1000, 10, Rgb([0, 255, 0])));
        let (tensor, _) = letterbox(&img, 64, 128).unwrap();
        assert!((plane_value(&tensor, 1, 5, 31) - 1.).abs() < 1e-2);
        assert!((plane_value(&tensor, 1, 5, 30) - 128. / 255.).abs() < 1e-6);
    }

    #[test]
    fn zero_area_image_is_rejected() {
        let img = SkImage::from(RgbImage::new(0, 10));
        assert!(matches!(
            letterbox(&img, 64, 128),
            Err(DetectError::InvalidImage { width: 0, height: 10 })
        ));
    }
}
