use imageproc::geometry::{approximate_polygon_dp, arc_length};

/// 2D image coordinate.
pub type Point = imageproc::point::Point<f32>;

/// Closed boundary traced from an edge map.
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<Point>,
    area: f64,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        let area = polygon_area(&points);
        Self { points, area }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (shoelace formula).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }

    /// Simplify the closed contour with Douglas-Peucker.
    ///
    /// The curve is split at two mutually distant points so that the start
    /// of the traced border (which is arbitrary) never survives as a vertex
    /// on its own.
    pub fn approximate(&self, epsilon: f64) -> Contour {
        Contour::new(approximate_closed(&self.points, epsilon))
    }
}

fn approximate_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, points[a]);
    if distance(points[a], points[b]) == 0.0 {
        return vec![points[a]];
    }
    let (i, j) = (a.min(b), a.max(b));

    // i..=j and j..=i (wrapping) share their end points.
    let first = &points[i..=j];
    let second: Vec<Point> = points[j..]
        .iter()
        .chain(points[..=i].iter())
        .copied()
        .collect();

    let mut polygon = approximate_polygon_dp(first, epsilon, false);
    polygon.pop();
    let mut rest = approximate_polygon_dp(&second, epsilon, false);
    rest.pop();
    polygon.append(&mut rest);
    polygon
}

fn farthest_from(points: &[Point], origin: Point) -> usize {
    let mut best = 0;
    let mut best_dist = -1.0;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(origin, p);
        if d > best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

pub(crate) fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as f64 * points[j].y as f64;
        twice_area -= points[j].x as f64 * points[i].y as f64;
    }
    twice_area.abs() / 2.0
}

/// Four document corners, in no particular order until passed through
/// [`order_points`](crate::detection::order::order_points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    pub points: [Point; 4],
}

impl Quadrilateral {
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// The frame of a `width` x `height` image.
    pub fn full_frame(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self::new([
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
            Point::new(0.0, 0.0),
        ])
    }

    pub fn scaled(&self, factor: ScaleFactor) -> Self {
        Self::new(self.points.map(|p| Point::new(p.x * factor.0, p.y * factor.0)))
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }
}

/// Ratio between the full-resolution photo and the working image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(pub f32);

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    pub fn between(original: u32, working: u32) -> Self {
        if working == 0 {
            return Self::IDENTITY;
        }
        Self(original as f32 / working as f32)
    }
}
