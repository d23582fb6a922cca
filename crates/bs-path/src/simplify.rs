use bs_core::Segment;

use crate::path::PointPath;

/// Greedy line simplification, repeated until a pass removes nothing.
///
/// From each start point the candidate segment is extended while every
/// intermediate point stays within `tolerance` of it; the start point is kept
/// and the scan restarts at the end of the longest accepted segment. A pass
/// can expose new collinear runs, so passes repeat until the point count is
/// stable and the result is a fixed point. Paths with fewer than three
/// points, or a negative tolerance, come back unchanged.
pub fn simplify(path: &PointPath, tolerance: f32) -> PointPath {
    if tolerance < 0.0 || path.len() < 3 {
        return path.clone();
    }

    let tol_sq = tolerance * tolerance;
    let mut current = simplify_pass(path, tol_sq);
    loop {
        let next = simplify_pass(&current, tol_sq);
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

fn simplify_pass(path: &PointPath, tol_sq: f32) -> PointPath {
    let mut out = Vec::with_capacity(path.len());
    let mut start = 0usize;
    while start < path.len() {
        let mut end = start + 1;
        while can_extend(path, start, end, tol_sq) {
            end += 1;
        }
        out.push(path.get(start as isize));
        start = end;
    }
    PointPath::new(out, path.is_closed())
}

fn can_extend(path: &PointPath, start: usize, end: usize, tol_sq: f32) -> bool {
    let valid = if path.is_closed() {
        end < path.len()
    } else {
        end + 1 < path.len()
    };
    if !valid {
        return false;
    }

    let next = end + 1;
    let seg = Segment::new(path.get(start as isize), path.get(next as isize));
    (start + 1..next).all(|ix| seg.dist_sq(path.get(ix as isize)) <= tol_sq)
}
