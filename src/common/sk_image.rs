use fast_image_resize::images::Image as FirImage;
use fast_image_resize::PixelType;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::error::{DetectError, Result};

/// Input image for the pipeline. Alpha is dropped on conversion.
#[derive(Debug, Clone, Default)]
pub struct SkImage {
    pub image: RgbImage,
}

impl std::ops::Deref for SkImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<DynamicImage> for SkImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }
}

impl From<GrayImage> for SkImage {
    fn from(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<RgbImage> for SkImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for SkImage {
    fn from(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<SkImage> for RgbImage {
    fn from(image: SkImage) -> Self {
        image.image
    }
}

impl SkImage {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Decodes an encoded image (PNG, JPEG, ...) from memory.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(Self::from(image::load_from_memory(bytes)?))
    }

    pub fn open<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self::from(image::open(path)?))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Returns `(width, height)`, rejecting zero-area images.
    pub fn checked_dimensions(&self) -> Result<(u32, u32)> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidImage { width, height });
        }
        Ok((width, height))
    }

    /// Copies the pixels into a resizer source image.
    pub fn to_fir_image(&self) -> Result<FirImage<'static>> {
        let (width, height) = self.checked_dimensions()?;
        FirImage::from_vec_u8(width, height, self.image.as_raw().clone(), PixelType::U8x3)
            .map_err(|e| DetectError::Resize(e.to_string()))
    }

    pub fn into_rgb8(self) -> RgbImage {
        self.image
    }
}
