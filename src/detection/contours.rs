use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

use crate::models::{Contour, Point};

/// Outermost closed borders in a binary edge map, largest enclosed area
/// first, at most `max_candidates` of them.
///
/// Borders nested inside another border (holes and anything within them)
/// are ignored.
pub fn find_document_contours(edges: &GrayImage, max_candidates: usize) -> Vec<Contour> {
    let mut contours: Vec<Contour> = find_contours::<u32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point::new(p.x as f32, p.y as f32))
                    .collect(),
            )
        })
        .collect();

    rank_by_area(&mut contours, max_candidates);
    contours
}

/// Sort descending by area and keep the first `max_candidates`.
pub fn rank_by_area(contours: &mut Vec<Contour>, max_candidates: usize) {
    contours.sort_by(|a, b| b.area().total_cmp(&a.area()));
    contours.truncate(max_candidates);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn draw_ring(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for x in x0..=x1 {
            img.put_pixel(x, y0, Luma([255]));
            img.put_pixel(x, y1, Luma([255]));
        }
        for y in y0..=y1 {
            img.put_pixel(x0, y, Luma([255]));
            img.put_pixel(x1, y, Luma([255]));
        }
    }

    #[test]
    fn empty_edge_map_has_no_contours() {
        let edges = GrayImage::new(50, 50);
        assert!(find_document_contours(&edges, 5).is_empty());
    }

    #[test]
    fn contours_are_ranked_largest_first() {
        let mut edges = GrayImage::new(200, 200);
        draw_ring(&mut edges, 5, 5, 25, 25);
        draw_ring(&mut edges, 40, 40, 190, 190);
        draw_ring(&mut edges, 5, 100, 30, 180);

        let contours = find_document_contours(&edges, 5);
        assert_eq!(contours.len(), 3);
        assert!(contours[0].area() > contours[1].area());
        assert!(contours[1].area() > contours[2].area());
        assert!((contours[0].area() - 150.0 * 150.0).abs() < 1.0);
    }

    #[test]
    fn nested_borders_are_ignored() {
        let mut edges = GrayImage::new(100, 100);
        draw_ring(&mut edges, 10, 10, 90, 90);
        draw_ring(&mut edges, 30, 30, 60, 60);

        let contours = find_document_contours(&edges, 5);
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 80.0 * 80.0).abs() < 1.0);
    }

    #[test]
    fn only_top_candidates_are_kept() {
        let mut edges = GrayImage::new(300, 40);
        for i in 0..8u32 {
            let x0 = 5 + i * 36;
            draw_ring(&mut edges, x0, 5, x0 + 10 + i * 2, 30);
        }
        let contours = find_document_contours(&edges, 5);
        assert_eq!(contours.len(), 5);
        // Widest ring drawn last
        assert!((contours[0].area() - (24.0 * 25.0)).abs() < 1.0);
    }
}
