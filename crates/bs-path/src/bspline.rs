use bs_core::Point2f;

use crate::path::PointPath;

const ORDER: isize = 3;
const START_INDEX: isize = ORDER - 1;
const REL_END: isize = 1;
const REL_START: isize = REL_END - ORDER;

/// Uniform cubic B-spline weights for the four control points around `t`.
fn basis(t: f32) -> [f32; 4] {
    [
        (((-t + 3.0) * t - 3.0) * t + 1.0) / 6.0,
        ((3.0 * t - 6.0) * t * t + 4.0) / 6.0,
        (((-3.0 * t + 3.0) * t + 3.0) * t + 1.0) / 6.0,
        t * t * t / 6.0,
    ]
}

fn eval(path: &PointPath, i: isize, t: f32) -> Point2f {
    let w = basis(t);
    let mut out = Point2f::default();
    for (k, j) in (REL_START..=REL_END).enumerate() {
        let p = path.get(i + j);
        out.x += w[k] * p.x;
        out.y += w[k] * p.y;
    }
    out
}

/// Smooths `path` with a uniform cubic B-spline.
///
/// A closed path of `n` control points yields `1 + n * granularity` samples:
/// the curve start plus `granularity` samples per span. Open paths clamp
/// their end points and run two extra spans on each side. Paths with fewer
/// than three points are returned unchanged.
pub fn bspline(path: &PointPath, granularity: usize) -> PointPath {
    if path.len() < 3 || granularity == 0 {
        return path.clone();
    }

    let count = path.len() as isize + ORDER - 1;
    let (first, last) = if path.is_closed() {
        (START_INDEX, count)
    } else {
        (START_INDEX - 2, count + 2)
    };

    let g = granularity as f32;
    let mut out = Vec::with_capacity(1 + (last - first) as usize * granularity);
    out.push(eval(path, first, 0.0));
    for ix in first..last {
        for k in 1..=granularity {
            out.push(eval(path, ix, k as f32 / g));
        }
    }
    PointPath::new(out, path.is_closed())
}
