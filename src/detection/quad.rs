use tracing::debug;

use crate::config::{AcceptancePolicy, FallbackPolicy, ScanConfig};
use crate::detection::order::extreme_corners;
use crate::models::{Contour, Quadrilateral};

/// Outcome of boundary detection on the working image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    /// A contour passed the selector.
    Detected(Quadrilateral),
    /// Nothing passed; the whole frame stands in for the document.
    FullFrame(Quadrilateral),
    /// Nothing passed; rectification should be skipped.
    NotDetected,
}

impl Detection {
    /// Quadrilateral to rectify, if any.
    pub fn quadrilateral(&self) -> Option<Quadrilateral> {
        match self {
            Detection::Detected(quad) | Detection::FullFrame(quad) => Some(*quad),
            Detection::NotDetected => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Detection::Detected(_))
    }
}

/// Picks the document boundary out of area-ranked contours.
#[derive(Debug, Clone, Copy)]
pub struct QuadSelector {
    pub epsilon_ratio: f64,
    pub min_area_ratio: f64,
    pub acceptance: AcceptancePolicy,
    pub fallback: FallbackPolicy,
}

impl QuadSelector {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            epsilon_ratio: config.approx_epsilon_ratio,
            min_area_ratio: config.min_area_ratio,
            acceptance: config.acceptance,
            fallback: config.fallback,
        }
    }

    /// Scan `contours` in order and return the first acceptable polygon,
    /// falling back per [`FallbackPolicy`] when none passes.
    ///
    /// `contours` must already be sorted by area, largest first.
    pub fn select(&self, contours: &[Contour], width: u32, height: u32) -> Detection {
        let min_area = width as f64 * height as f64 * self.min_area_ratio;

        for (rank, contour) in contours.iter().enumerate() {
            if let Some(quad) = self.candidate(contour, min_area) {
                debug!(rank, area = quad.area(), min_area, "Document contour accepted");
                return Detection::Detected(quad);
            }
        }

        debug!(candidates = contours.len(), "No contour passed the selector");
        match self.fallback {
            FallbackPolicy::PassThrough => Detection::NotDetected,
            FallbackPolicy::FullImage => Detection::FullFrame(Quadrilateral::full_frame(width, height)),
        }
    }

    /// Approximate one contour and check it against the vertex and area
    /// rules. The area comparison is exclusive.
    pub fn candidate(&self, contour: &Contour, min_area: f64) -> Option<Quadrilateral> {
        let perimeter = contour.perimeter();
        if perimeter <= 0.0 {
            return None;
        }
        let polygon = contour.approximate(self.epsilon_ratio * perimeter);

        let vertices_ok = match self.acceptance {
            AcceptancePolicy::FourVertices => polygon.len() == 4,
            AcceptancePolicy::AnyPolygon => polygon.len() >= 4,
        };
        if !vertices_ok || polygon.area() <= min_area {
            return None;
        }

        match polygon.points() {
            [a, b, c, d] => Some(Quadrilateral::new([*a, *b, *c, *d])),
            points => Some(extreme_corners(points).into()),
        }
    }
}
