use bs_core::Point2f;

/// Effective `(stride, count)` for sampling `len` points every `skip`.
///
/// The stride is reduced one step at a time while fewer than three samples
/// would remain, never below 1.
pub fn sample_stride(len: usize, skip: usize) -> (usize, usize) {
    let mut stride = skip.max(1);
    let mut count = len / stride;
    while count < 3 && stride > 1 {
        stride -= 1;
        count = len / stride;
    }
    (stride, count)
}

/// Every `stride`-th point of `points`, starting with the first.
pub fn sample_closed(points: &[Point2f], skip: usize) -> Vec<Point2f> {
    let (stride, count) = sample_stride(points.len(), skip);
    points.iter().step_by(stride).take(count).copied().collect()
}

#[cfg(test)]
mod tests {
    use bs_core::Point2f;

    use super::{sample_closed, sample_stride};

    #[test]
    fn stride_shrinks_to_keep_three_points() {
        assert_eq!(sample_stride(80, 8), (8, 10));
        assert_eq!(sample_stride(20, 8), (6, 3));
        assert_eq!(sample_stride(2, 8), (1, 2));
        assert_eq!(sample_stride(0, 8), (1, 0));
        assert_eq!(sample_stride(10, 0), (1, 10));
    }

    #[test]
    fn sampling_walks_from_the_first_point() {
        let pts: Vec<Point2f> = (0..10).map(|i| Point2f::new(i as f32, 0.0)).collect();
        let out = sample_closed(&pts, 3);
        let xs: Vec<f32> = out.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 6.0]);
    }
}
