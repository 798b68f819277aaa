use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;

/// Corners of the synthetic page, clockwise from top-left.
pub const PAGE_CORNERS: [(f32, f32); 4] = [(50.0, 50.0), (450.0, 60.0), (440.0, 600.0), (40.0, 590.0)];

/// Black 500x650 photo with a white, slightly skewed page.
pub fn synthetic_page() -> DynamicImage {
    page_photo(500, 650, &PAGE_CORNERS, 1.0)
}

/// Black `width` x `height` photo with a white quadrilateral through
/// `corners` multiplied by `scale`.
pub fn page_photo(width: u32, height: u32, corners: &[(f32, f32); 4], scale: f32) -> DynamicImage {
    let mut img = RgbImage::new(width, height);
    let poly: Vec<PixelPoint<i32>> = corners
        .iter()
        .map(|&(x, y)| PixelPoint::new((x * scale).round() as i32, (y * scale).round() as i32))
        .collect();
    draw_polygon_mut(&mut img, &poly, Rgb([255, 255, 255]));
    DynamicImage::ImageRgb8(img)
}

/// Uniform gray photo with nothing to detect.
pub fn blank_photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([128, 128, 128])))
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Largest distance between matching corners.
pub fn max_corner_error(found: [docscan::Point; 4], expected: &[(f32, f32); 4]) -> f32 {
    found
        .iter()
        .zip(expected.iter())
        .map(|(p, &e)| distance((p.x, p.y), e))
        .fold(0.0, f32::max)
}
