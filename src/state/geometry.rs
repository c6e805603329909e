// Point math shared by the contact tracker and the transform engine

use serde::{Deserialize, Serialize};

/// A position in the gesture surface's local pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Direction of the segment `a -> b` in degrees, in `(-180, 180]`.
pub fn angle_deg(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Like `f64::clamp` but never panics on a reversed range; `lo` wins.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(Point::new(1.0, 1.0), Point::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn angle_follows_screen_axes() {
        let o = Point::ZERO;
        assert_eq!(angle_deg(o, Point::new(10.0, 0.0)), 0.0);
        assert!((angle_deg(o, Point::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((angle_deg(o, Point::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((angle_deg(o, Point::new(0.0, -10.0)) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn midpoint_averages() {
        let m = midpoint(Point::new(0.0, 0.0), Point::new(100.0, -20.0));
        assert_eq!(m, Point::new(50.0, -10.0));
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(20.0, 0.1, 10.0), 10.0);
        assert_eq!(clamp(0.0, 0.1, 10.0), 0.1);
        assert_eq!(clamp(2.5, 0.1, 10.0), 2.5);
    }
}
