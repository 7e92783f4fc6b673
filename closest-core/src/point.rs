//! The 2D point type and ordering helpers

use serde::{Deserialize, Serialize};

/// A point in the plane. Points have no identity beyond their coordinates;
/// duplicates are permitted and meaningful (their pairwise distance is 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Sort points ascending by x coordinate.
///
/// The whole algorithm assumes this ordering as a precondition; it is
/// established once before any recursion and never re-established
/// mid-computation.
pub fn sort_by_x(points: &mut [Point]) {
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_sort_by_x() {
        let mut points = vec![
            Point::new(3.0, 4.0),
            Point::new(0.0, 2.0),
            Point::new(-1.5, 0.0),
            Point::new(0.0, 1.0),
        ];
        sort_by_x(&mut points);

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-1.5, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let point = Point::new(1.25, -7.5);
        let json = serde_json::to_string(&point).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(point, back);
    }
}
