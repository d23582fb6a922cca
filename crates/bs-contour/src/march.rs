use std::collections::HashSet;

use bs_core::Point2f;
use bs_field::{FieldLayout, PotentialField};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    fn step(self, x: isize, y: isize) -> (isize, isize) {
        match self {
            Direction::North => (x, y - 1),
            Direction::East => (x + 1, y),
            Direction::South => (x, y + 1),
            Direction::West => (x - 1, y),
        }
    }

    /// Next direction for a 4-bit cell state; `None` for the filled state.
    /// Saddles (6 and 9) keep turning the way the walk was already going.
    fn from_state(state: u8, previous: Direction) -> Option<Direction> {
        let next = match state {
            0 | 2 | 3 | 7 => Direction::East,
            4 | 12 | 14 => Direction::West,
            6 => {
                if previous == Direction::North {
                    Direction::West
                } else {
                    Direction::East
                }
            }
            1 | 5 | 13 => Direction::North,
            9 => {
                if previous == Direction::East {
                    Direction::North
                } else {
                    Direction::South
                }
            }
            8 | 10 | 11 => Direction::South,
            _ => return None,
        };
        Some(next)
    }
}

/// How a trace stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEnd {
    /// Returned to the start point.
    Closed,
    /// Stepped onto a cell without a full 2x2 window.
    OutOfBounds,
    /// Reached a fully filled cell while walking.
    InvalidState,
    StepLimit,
}

/// Traced boundary in grid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contour {
    pub points: Vec<Point2f>,
    pub end: TraceEnd,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_screen(&self, layout: &FieldLayout) -> Vec<Point2f> {
        self.points
            .iter()
            .map(|p| layout.cell_to_screen(p.x, p.y))
            .collect()
    }
}

/// Marching-squares tracer with reusable scratch storage.
///
/// A walk is capped at `2 * width * height + 4` steps unless
/// [`MarchingSquares::with_step_limit`] sets another cap.
#[derive(Debug, Default)]
pub struct MarchingSquares {
    visited: HashSet<(isize, isize)>,
    step_limit: Option<usize>,
}

impl MarchingSquares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_limit(step_limit: usize) -> Self {
        Self {
            step_limit: Some(step_limit),
            ..Self::default()
        }
    }

    fn max_steps(&self, field: &PotentialField) -> usize {
        self.step_limit
            .unwrap_or_else(|| 2 * field.width().saturating_mul(field.height()) + 4)
    }

    /// Traces the first boundary of `energy > threshold`, or `None` when no
    /// cell starts one.
    pub fn trace(&mut self, field: &PotentialField, threshold: f32) -> Option<Contour> {
        let (sx, sy) = find_start(field, threshold)?;
        Some(self.walk(field, threshold, sx, sy))
    }

    fn walk(&mut self, field: &PotentialField, threshold: f32, sx: isize, sy: isize) -> Contour {
        self.visited.clear();
        let max_steps = self.max_steps(field);

        let mut points = Vec::new();
        let (mut x, mut y) = (sx, sy);
        let mut dir = Direction::South;
        let mut steps = 0usize;

        let end = loop {
            if steps > 0 && (x, y) == (sx, sy) {
                break TraceEnd::Closed;
            }
            if steps >= max_steps {
                warn!(steps, "contour trace hit its step limit");
                break TraceEnd::StepLimit;
            }
            steps += 1;
            // Crossing an earlier point is not closure; the walk keeps
            // following the boundary until it is back at the start.
            if self.visited.insert((x, y)) {
                points.push(Point2f::new(x as f32, y as f32));
            }

            let Some(state) = cell_state(field, threshold, x, y) else {
                warn!(x, y, "contour trace left the field");
                break TraceEnd::OutOfBounds;
            };
            let Some(next) = Direction::from_state(state, dir) else {
                warn!(x, y, "contour trace reached a filled cell");
                break TraceEnd::InvalidState;
            };
            dir = next;
            (x, y) = dir.step(x, y);
        };

        Contour { points, end }
    }
}

fn find_start(field: &PotentialField, threshold: f32) -> Option<(isize, isize)> {
    let (w, h) = (field.width() as isize, field.height() as isize);
    for x in 0..w {
        for y in 0..h {
            let above = field.value(x, y).is_some_and(|v| v > threshold);
            if above && cell_state(field, threshold, x, y) != Some(15) {
                return Some((x, y));
            }
        }
    }
    None
}

/// 4-bit state of the 2x2 window anchored at `(x, y)`; `None` when the
/// window does not fit in the field.
fn cell_state(field: &PotentialField, threshold: f32, x: isize, y: isize) -> Option<u8> {
    let filled = |dx: isize, dy: isize| -> Option<u8> {
        field.value(x + dx, y + dy).map(|v| u8::from(v > threshold))
    };
    Some(filled(0, 0)? | filled(1, 0)? << 1 | filled(0, 1)? << 2 | filled(1, 1)? << 3)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bs_core::{Grid, Point2f, Rect};
    use bs_field::{FieldLayout, InfluenceArea, PotentialField};

    use super::{Direction, MarchingSquares, TraceEnd, cell_state};

    fn field_with(w: usize, h: usize, filled: &[(usize, usize)]) -> PotentialField {
        let layout = FieldLayout::new(&Rect::new(0.0, 0.0, w as f32 * 4.0, h as f32 * 4.0), 4.0);
        let mut field = PotentialField::new(layout);
        for &(x, y) in filled {
            field.add_area(
                &InfluenceArea {
                    x: x as isize,
                    y: y as isize,
                    values: Arc::new(Grid::new_fill(1, 1, 2.0)),
                },
                1.0,
            );
        }
        field
    }

    #[test]
    fn state_bits_follow_corner_order() {
        let f = field_with(3, 3, &[(1, 0), (1, 1)]);

        assert_eq!(cell_state(&f, 1.0, 0, 0), Some(2 | 8));
        assert_eq!(cell_state(&f, 1.0, 1, 0), Some(1 | 4));
        assert_eq!(cell_state(&f, 1.0, 2, 0), None);
        assert_eq!(cell_state(&f, 1.0, 0, -1), None);
    }

    #[test]
    fn saddles_resolve_by_previous_direction() {
        assert_eq!(Direction::from_state(6, Direction::North), Some(Direction::West));
        assert_eq!(Direction::from_state(6, Direction::South), Some(Direction::East));
        assert_eq!(Direction::from_state(9, Direction::East), Some(Direction::North));
        assert_eq!(Direction::from_state(9, Direction::West), Some(Direction::South));
        assert_eq!(Direction::from_state(0, Direction::West), Some(Direction::East));
        assert_eq!(Direction::from_state(15, Direction::West), None);
    }

    #[test]
    fn square_block_traces_a_closed_loop() {
        let f = field_with(4, 4, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        let contour = MarchingSquares::new().trace(&f, 1.0).expect("contour");

        assert_eq!(contour.end, TraceEnd::Closed);
        let expected: Vec<Point2f> = [
            (1.0, 2.0),
            (2.0, 2.0),
            (2.0, 1.0),
            (2.0, 0.0),
            (1.0, 0.0),
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
        ]
        .iter()
        .map(|&(x, y)| Point2f::new(x, y))
        .collect();
        assert_eq!(contour.points, expected);

        let screen = contour.to_screen(f.layout());
        assert_eq!(screen[0], Point2f::new(4.0, 8.0));
    }

    #[test]
    fn step_limit_cuts_the_walk_short() {
        let f = field_with(4, 4, &[(1, 1), (2, 1), (1, 2), (2, 2)]);

        let contour = MarchingSquares::with_step_limit(3).trace(&f, 1.0).expect("contour");
        assert_eq!(contour.end, TraceEnd::StepLimit);
        assert_eq!(
            contour.points,
            vec![
                Point2f::new(1.0, 2.0),
                Point2f::new(2.0, 2.0),
                Point2f::new(2.0, 1.0),
            ]
        );

        // The loop takes exactly eight steps.
        let exact = MarchingSquares::with_step_limit(8).trace(&f, 1.0).expect("contour");
        assert_eq!(exact.end, TraceEnd::Closed);
        assert_eq!(MarchingSquares::new().max_steps(&f), 2 * f.width() * f.height() + 4);
    }

    #[test]
    fn diagonal_saddle_closes_at_the_start() {
        let f = field_with(4, 4, &[(1, 1), (2, 2)]);
        let contour = MarchingSquares::new().trace(&f, 1.0).expect("contour");

        assert_eq!(contour.end, TraceEnd::Closed);
        assert_eq!(
            contour.points,
            vec![
                Point2f::new(1.0, 1.0),
                Point2f::new(1.0, 2.0),
                Point2f::new(2.0, 2.0),
                Point2f::new(2.0, 1.0),
            ]
        );
    }

    #[test]
    fn empty_field_has_no_contour() {
        let f = field_with(4, 4, &[]);
        assert!(MarchingSquares::new().trace(&f, 1.0).is_none());
    }

    #[test]
    fn fully_filled_field_has_no_start() {
        let all: Vec<(usize, usize)> = (0..3).flat_map(|x| (0..3).map(move |y| (x, y))).collect();
        let f = field_with(3, 3, &all);
        let contour = MarchingSquares::new().trace(&f, 1.0).expect("border start");

        // Only border cells lack a full window; the walk leaves immediately.
        assert_eq!(contour.end, TraceEnd::OutOfBounds);
        assert_eq!(contour.points, vec![Point2f::new(0.0, 2.0)]);
    }

    #[test]
    fn blob_touching_the_edge_stops_out_of_bounds() {
        let f = field_with(3, 3, &[(2, 1)]);
        let contour = MarchingSquares::new().trace(&f, 1.0).expect("contour");
        assert_eq!(contour.end, TraceEnd::OutOfBounds);
        assert!(!contour.is_empty());
    }
}
