use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument};

use crate::detection::order::OrderedQuad;
use crate::error::{Result, ScanError};
use crate::models::Quadrilateral;

/// Output size implied by the quad's edge lengths: the longer of the top and
/// bottom edges by the longer of the left and right edges, each truncated.
pub fn output_size(quad: &OrderedQuad) -> (u32, u32) {
    let width = (quad.top_width() as u32).max(quad.bottom_width() as u32);
    let height = (quad.left_height() as u32).max(quad.right_height() as u32);
    (width, height)
}

/// Projective transform taking the quad's corners onto a `width` x `height`
/// upright rectangle anchored at the origin.
pub fn perspective_transform(quad: &OrderedQuad, width: u32, height: u32) -> Result<Projection> {
    if width < 2 || height < 2 {
        return Err(ScanError::degenerate(format!(
            "rectified size {width}x{height} is too small"
        )));
    }

    if Quadrilateral::from(*quad).area() < 1.0 {
        return Err(ScanError::degenerate("document corners enclose no area"));
    }

    let (right, bottom) = ((width - 1) as f32, (height - 1) as f32);
    let dest = [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)];
    let src = quad.corners().map(|p| (p.x, p.y));

    Projection::from_control_points(src, dest)
        .ok_or_else(|| ScanError::degenerate("corner correspondences give a singular transform"))
}

/// Warp the document quad of `image` into an upright rectangle.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn rectify(image: &RgbImage, quad: &OrderedQuad) -> Result<RgbImage> {
    let (width, height) = output_size(quad);
    let projection = perspective_transform(quad, width, height)?;

    let mut output = RgbImage::new(width, height);
    warp_into(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut output);

    debug!(out_w = width, out_h = height, "Perspective correction applied");
    Ok(output)
}
