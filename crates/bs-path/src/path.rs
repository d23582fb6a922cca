use core::fmt::Write;

use bs_core::{Point2f, Rect};
use serde::{Deserialize, Serialize};

use crate::{bspline, simplify};

/// Ordered outline points. Closed paths wrap around on indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPath {
    points: Vec<Point2f>,
    closed: bool,
}

impl Default for PointPath {
    fn default() -> Self {
        Self::closed(Vec::new())
    }
}

impl PointPath {
    pub fn new(points: Vec<Point2f>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn closed(points: Vec<Point2f>) -> Self {
        Self::new(points, true)
    }

    pub fn open(points: Vec<Point2f>) -> Self {
        Self::new(points, false)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2f] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2f> {
        self.points
    }

    /// Closed paths wrap `index` modulo the length; open paths clamp it to
    /// the first or last point. Panics on an empty path.
    pub fn get(&self, index: isize) -> Point2f {
        let len = self.points.len() as isize;
        assert!(len > 0, "indexing an empty path");
        let i = if self.closed {
            index.rem_euclid(len)
        } else {
            index.clamp(0, len - 1)
        };
        self.points[i as usize]
    }

    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        let start = Rect::new(first.x, first.y, 0.0, 0.0);
        Some(rest.iter().fold(start, |r, &p| r.union_point(p)))
    }

    /// SVG path data, `M x,y L x,y ... Z`.
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(out, "{cmd}{},{} ", p.x, p.y);
        }
        if self.closed && !self.points.is_empty() {
            out.push('Z');
        }
        out.trim_end().to_string()
    }

    /// Applies the optional simplify/smooth stages selected by `cfg`.
    pub fn post_process(&self, cfg: &PathConfig) -> PointPath {
        let simplified = match cfg.simplify_tolerance {
            Some(tolerance) => simplify(self, tolerance),
            None => self.clone(),
        };
        match cfg.smooth_granularity {
            Some(granularity) => bspline(&simplified, granularity),
            None => simplified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub simplify_tolerance: Option<f32>,
    pub smooth_granularity: Option<usize>,
}
