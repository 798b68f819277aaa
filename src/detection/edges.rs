use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{Mask, dilate, grayscale_close, grayscale_dilate};

use crate::config::{EdgeDilation, ScanConfig, kernel_sigma};

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Gaussian blur with the sigma a `ksize` x `ksize` kernel implies
pub fn apply_blur(img: &GrayImage, ksize: u32) -> GrayImage {
    gaussian_blur_f32(img, kernel_sigma(ksize))
}

/// Grayscale closing with a square structuring element of side `ksize`.
///
/// Fills thin dark gaps (text, creases) inside the bright page so the
/// edge detector only sees the page border.
pub fn close(img: &GrayImage, ksize: u32) -> GrayImage {
    grayscale_close(img, &Mask::square((ksize / 2) as u8))
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Thicken edges so small breaks in the page border reconnect
pub fn dilate_edges(edges: &GrayImage, dilation: EdgeDilation) -> GrayImage {
    match dilation {
        EdgeDilation::Square { radius } => dilate(edges, Norm::LInf, radius),
        EdgeDilation::Vertical => grayscale_dilate(edges, &vertical_mask(edges.height() / 100)),
    }
}

/// 1 px wide mask of height `len`, centred on its middle row.
fn vertical_mask(len: u32) -> Mask {
    let len = len.clamp(1, 511);
    let column = GrayImage::from_pixel(1, len, Luma([255u8]));
    Mask::from_image(&column, 0, (len / 2) as u8)
}

/// Binary edge map of `img`, same size as the input.
pub fn build_edge_map(img: &DynamicImage, config: &ScanConfig) -> GrayImage {
    let gray = to_grayscale(img);
    let blurred = apply_blur(&gray, config.blur_kernel);
    let closed = close(&blurred, config.close_kernel);
    let edges = detect_edges(&closed, config.canny_low, config.canny_high);
    dilate_edges(&edges, config.dilation)
}
