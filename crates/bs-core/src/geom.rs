use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dist_sq(self, other: Point2f) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Both coordinates equal within `delta` (euclidean).
    pub fn approx_eq(self, other: Point2f, delta: f32) -> bool {
        self.dist_sq(other) < delta * delta
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm_sq(self) -> f32 {
        self.dot(self)
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Vec2f> for Point2f {
    type Output = Point2f;

    fn sub(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point2f, Vec2f};

    #[test]
    fn point_distance_and_tolerance() {
        let a = Point2f::new(1.0, 2.0);
        let b = Point2f::new(4.0, 6.0);

        assert!((a.dist_sq(b) - 25.0).abs() < 1e-6);
        assert!(a.approx_eq(Point2f::new(1.0005, 2.0), 1e-3));
        assert!(!a.approx_eq(Point2f::new(1.01, 2.0), 1e-3));
    }

    #[test]
    fn point_vec_ops() {
        let p = Point2f::new(2.0, 3.0);
        let v = Vec2f::new(0.5, -1.0);

        assert_eq!(p + v, Point2f::new(2.5, 2.0));
        assert_eq!(p - v, Point2f::new(1.5, 4.0));
        assert_eq!(p - Point2f::new(1.0, 1.0), Vec2f::new(1.0, 2.0));
        assert!((Vec2f::new(3.0, 4.0).norm_sq() - 25.0).abs() < 1e-6);
        assert_eq!(v * 2.0, Vec2f::new(1.0, -2.0));
    }
}
