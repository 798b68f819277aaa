use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

use crate::config::{ScanConfig, kernel_sigma};

/// Unsharp mask: `(1 + amount) * img - amount * blur(img, sigma)`,
/// rounded and clamped to `0..=255`.
pub fn sharpen(img: &GrayImage, sigma: f32, amount: f32) -> GrayImage {
    let blurred = gaussian_blur_f32(img, sigma);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let original = img.get_pixel(x, y)[0] as f32;
        let soft = blurred.get_pixel(x, y)[0] as f32;
        let value = (1.0 + amount) * original - amount * soft;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Local binarization against a Gaussian-weighted neighbourhood mean.
///
/// A pixel becomes white when it is brighter than the mean of its
/// `window` x `window` neighbourhood minus `offset`, black otherwise.
pub fn adaptive_threshold_gaussian(img: &GrayImage, window: u32, offset: i32) -> GrayImage {
    let local_mean = gaussian_blur_f32(img, kernel_sigma(window));
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let value = img.get_pixel(x, y)[0] as i32;
        let threshold = local_mean.get_pixel(x, y)[0] as i32 - offset;
        Luma([if value > threshold { 255u8 } else { 0u8 }])
    })
}

/// Grayscale, sharpen and binarize into black ink on white paper.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn binarize(image: &DynamicImage, config: &ScanConfig) -> GrayImage {
    let gray = image.to_luma8();
    let sharpened = sharpen(&gray, config.sharpen_sigma, config.sharpen_amount);
    let binary = adaptive_threshold_gaussian(
        &sharpened,
        config.threshold_window,
        config.threshold_offset,
    );
    debug!(
        window = config.threshold_window,
        offset = config.threshold_offset,
        "Binarization complete"
    );
    binary
}
