use crate::models::{Point, Quadrilateral, distance};

/// Corners in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedQuad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl OrderedQuad {
    /// `[top_left, top_right, bottom_right, bottom_left]`
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn top_width(&self) -> f32 {
        distance(self.top_left, self.top_right)
    }

    pub fn bottom_width(&self) -> f32 {
        distance(self.bottom_left, self.bottom_right)
    }

    pub fn left_height(&self) -> f32 {
        distance(self.top_left, self.bottom_left)
    }

    pub fn right_height(&self) -> f32 {
        distance(self.top_right, self.bottom_right)
    }
}

impl From<OrderedQuad> for Quadrilateral {
    fn from(quad: OrderedQuad) -> Self {
        Quadrilateral::new(quad.corners())
    }
}

/// Order four corners as top-left, top-right, bottom-right, bottom-left.
///
/// Top-left has the smallest `x + y`, bottom-right the largest. Top-right
/// has the smallest `y - x`, bottom-left the largest. Ties go to the
/// earlier point.
pub fn order_points(quad: &Quadrilateral) -> OrderedQuad {
    extreme_corners(&quad.points)
}

/// Sum/difference extremes of an arbitrary vertex set. Panics on an empty
/// slice.
pub(crate) fn extreme_corners(points: &[Point]) -> OrderedQuad {
    let sum = |p: &Point| p.x + p.y;
    let diff = |p: &Point| p.y - p.x;
    OrderedQuad {
        top_left: points[arg_extreme(points, sum, false)],
        top_right: points[arg_extreme(points, diff, false)],
        bottom_right: points[arg_extreme(points, sum, true)],
        bottom_left: points[arg_extreme(points, diff, true)],
    }
}

fn arg_extreme(points: &[Point], key: impl Fn(&Point) -> f32, largest: bool) -> usize {
    let mut best = 0;
    for i in 1..points.len() {
        let (candidate, current) = (key(&points[i]), key(&points[best]));
        let better = if largest {
            candidate > current
        } else {
            candidate < current
        };
        if better {
            best = i;
        }
    }
    best
}
