//! Resizing, transparency flattening and normalization of input views.

use crate::CaptureError;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::Array3;

/// Side length of the square images the network was trained on.
pub const DEFAULT_IMAGE_SIZE: u32 = 127;

/// Parameters for turning decoded images into network input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessConfig {
    /// Output width and height in pixels.
    pub size: u32,
    /// Pixels with alpha strictly below this value become `background`.
    pub alpha_threshold: u8,
    /// Colour substituted for transparent pixels.
    pub background: [u8; 3],
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.size == 0 {
            return Err(CaptureError::InvalidConfig(
                "image size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_IMAGE_SIZE,
            alpha_threshold: 10,
            background: [255, 255, 255],
        }
    }
}

/// Resize to `size x size` with an antialiasing filter and convert to RGB.
///
/// Aspect ratio is not preserved. Transparent pixels are replaced after
/// resizing so the filter sees the original colours.
pub fn preprocess(image: &DynamicImage, config: &PreprocessConfig) -> RgbImage {
    let resized = image.resize_exact(config.size, config.size, FilterType::Lanczos3);
    if resized.color().has_alpha() {
        flatten_alpha(&resized.to_rgba8(), config)
    } else {
        resized.to_rgb8()
    }
}

/// Drop the alpha channel, painting nearly transparent pixels with the background.
pub(crate) fn flatten_alpha(image: &RgbaImage, config: &PreprocessConfig) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        if a < config.alpha_threshold {
            Rgb(config.background)
        } else {
            Rgb([r, g, b])
        }
    })
}

/// Channel-first `(3, height, width)` array with values scaled to `[0, 1]`.
pub fn to_chw(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((3, height as usize, width as usize), |(c, y, x)| {
        image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
}
