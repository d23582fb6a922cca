use bs_core::{
    OutlineConfig, Point2f, Rect, RectCrossing, Segment, Shape, fraction_to_line_center,
    rect_crossing,
};
use serde::Serialize;
use tracing::{trace, warn};

use crate::corner::Corner;

const POINT_EPS: f32 = 1e-3;
const BUFFER_SHRINK: f32 = 1.5;

/// Polyline linking member `from` to the already-visited member `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualEdge {
    pub from: usize,
    pub to: usize,
    /// Consecutive segments; each starts where the previous one ends.
    pub segments: Vec<Segment>,
    /// Reroute rounds used; each round places at most one detour.
    pub iterations: usize,
    /// The routing budget ran out while an unchecked segment still passes
    /// through an obstacle.
    pub exhausted: bool,
    /// Segments kept although no free detour corner was found.
    pub unresolved: usize,
}

impl VirtualEdge {
    pub fn points(&self) -> Vec<Point2f> {
        let mut out = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            out.push(first.a);
        }
        out.extend(self.segments.iter().map(|s| s.b));
        out
    }

    pub fn is_rerouted(&self) -> bool {
        self.segments.len() > 1
    }
}

enum Detour {
    Clear,
    Via(Point2f),
    Blocked,
}

/// Reusable routing state; the work lists are kept between connections.
#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    pending: Vec<Segment>,
    finished: Vec<Segment>,
}

impl EdgeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        &mut self,
        members: &[Shape],
        obstacles: &[Shape],
        cfg: &OutlineConfig,
    ) -> Vec<VirtualEdge> {
        let mut visited = Vec::with_capacity(members.len());
        let mut edges = Vec::with_capacity(members.len().saturating_sub(1));

        for idx in centroid_order(members) {
            if let Some(to) = closest_visited(members, obstacles, idx, &visited) {
                let line = Segment::new(members[idx].center(), members[to].center());
                edges.push(self.connect(line, idx, to, obstacles, cfg));
            }
            visited.push(idx);
        }
        edges
    }

    fn connect(
        &mut self,
        line: Segment,
        from: usize,
        to: usize,
        obstacles: &[Shape],
        cfg: &OutlineConfig,
    ) -> VirtualEdge {
        self.pending.clear();
        self.finished.clear();
        self.pending.push(line);

        let mut iterations = 0usize;
        let mut unresolved = 0usize;
        let mut rerouted = true;
        // One round pops segments until it places a detour; clear and
        // blocked segments are finalized within the round.
        while rerouted && iterations < cfg.max_routing_iterations {
            rerouted = false;
            while !rerouted {
                let Some(seg) = self.pending.pop() else {
                    break;
                };
                match self.detour(&seg, obstacles, cfg.morph_buffer) {
                    Detour::Clear => self.finished.push(seg),
                    Detour::Via(p) => {
                        trace!(from, to, x = p.x, y = p.y, "detour around obstacle");
                        // Pushed in reverse so the next pop continues from `seg.a`.
                        self.pending.push(Segment::new(p, seg.b));
                        self.pending.push(Segment::new(seg.a, p));
                        rerouted = true;
                    }
                    Detour::Blocked => {
                        unresolved += 1;
                        self.finished.push(seg);
                    }
                }
            }
            iterations += 1;
        }

        let exhausted = self
            .pending
            .iter()
            .any(|seg| nearest_crossed(obstacles, seg).is_some());
        if exhausted {
            warn!(
                from,
                to,
                remaining = self.pending.len(),
                "routing budget exhausted, keeping crossing segments"
            );
        }
        while let Some(seg) = self.pending.pop() {
            self.finished.push(seg);
        }

        VirtualEdge {
            from,
            to,
            segments: merge_segments(&self.finished, obstacles),
            iterations,
            exhausted,
            unresolved,
        }
    }

    fn detour(&self, seg: &Segment, obstacles: &[Shape], morph_buffer: f32) -> Detour {
        let Some((bounds, crossing)) = nearest_crossed(obstacles, seg) else {
            return Detour::Clear;
        };

        let preferred = Corner::preferred(&bounds, &crossing);
        if let Some(p) = self.try_corner(preferred, &bounds, obstacles, morph_buffer, true) {
            return Detour::Via(p);
        }
        // The opposite corner is taken even when it lands on another obstacle;
        // the next pass routes around that one.
        if let Some(p) = self.try_corner(preferred.opposite(), &bounds, obstacles, morph_buffer, false)
        {
            return Detour::Via(p);
        }
        Detour::Blocked
    }

    fn try_corner(
        &self,
        corner: Corner,
        bounds: &Rect,
        obstacles: &[Shape],
        morph_buffer: f32,
        require_free: bool,
    ) -> Option<Point2f> {
        let mut buffer = morph_buffer;
        let mut p = corner.offset_point(bounds, buffer);
        let mut taken = self.point_taken(p);
        let mut inside = inside_any(obstacles, p);

        while !taken && inside && buffer >= 1.0 {
            buffer /= BUFFER_SHRINK;
            p = corner.offset_point(bounds, buffer);
            taken = self.point_taken(p);
            inside = inside_any(obstacles, p);
        }

        (!taken && (!inside || !require_free)).then_some(p)
    }

    fn point_taken(&self, p: Point2f) -> bool {
        self.pending
            .iter()
            .chain(self.finished.iter())
            .any(|s| s.a.approx_eq(p, POINT_EPS) || s.b.approx_eq(p, POINT_EPS))
    }
}

/// Routes virtual edges with a fresh [`EdgeRouter`].
pub fn route_virtual_edges(
    members: &[Shape],
    obstacles: &[Shape],
    cfg: &OutlineConfig,
) -> Vec<VirtualEdge> {
    EdgeRouter::new().route(members, obstacles, cfg)
}

/// Member indices by ascending squared distance to the member centroid.
fn centroid_order(members: &[Shape]) -> Vec<usize> {
    if members.is_empty() {
        return Vec::new();
    }

    let n = members.len() as f32;
    let (sx, sy) = members.iter().fold((0.0f32, 0.0f32), |(sx, sy), m| {
        let c = m.center();
        (sx + c.x, sy + c.y)
    });
    let centroid = Point2f::new(sx / n, sy / n);

    let mut keyed: Vec<(usize, f32)> = members
        .iter()
        .enumerate()
        .map(|(i, m)| (i, m.center().dist_sq(centroid)))
        .collect();
    keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
    keyed.into_iter().map(|(i, _)| i).collect()
}

fn closest_visited(
    members: &[Shape],
    obstacles: &[Shape],
    idx: usize,
    visited: &[usize],
) -> Option<usize> {
    let c = members[idx].center();
    let mut best = None;
    let mut best_score = f32::INFINITY;

    for &v in visited {
        let nc = members[v].center();
        let k = count_interference(obstacles, &Segment::new(c, nc)) as f32;
        let score = c.dist_sq(nc) * (k + 1.0) * (k + 1.0);
        if score < best_score {
            best_score = score;
            best = Some(v);
        }
    }
    best
}

fn interferes(obstacle: &Shape, line: &Segment) -> bool {
    obstacle.intersects_segment(line) && fraction_to_line_center(&obstacle.bounds(), line).is_some()
}

fn count_interference(obstacles: &[Shape], line: &Segment) -> usize {
    obstacles.iter().filter(|o| interferes(o, line)).count()
}

/// Obstacle passed through (two bounding-box crossings) closest to the
/// middle of `line`.
fn nearest_crossed(obstacles: &[Shape], line: &Segment) -> Option<(Rect, RectCrossing)> {
    let mut best: Option<(f32, Rect, RectCrossing)> = None;
    for obstacle in obstacles {
        if !obstacle.intersects_segment(line) {
            continue;
        }
        let bounds = obstacle.bounds();
        let Some(d) = fraction_to_line_center(&bounds, line) else {
            continue;
        };
        let crossing = rect_crossing(line, &bounds);
        if crossing.count != 2 {
            continue;
        }
        if best.as_ref().is_none_or(|(bd, _, _)| d < *bd) {
            best = Some((d, bounds, crossing));
        }
    }
    best.map(|(_, bounds, crossing)| (bounds, crossing))
}

fn inside_any(obstacles: &[Shape], p: Point2f) -> bool {
    obstacles.iter().any(|o| o.contains_point(p))
}

/// Greedily joins consecutive segments whose merged line touches nothing.
fn merge_segments(segments: &[Segment], obstacles: &[Shape]) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for &seg in segments {
        if let Some(last) = merged.last_mut() {
            let candidate = Segment::new(last.a, seg.b);
            if !obstacles.iter().any(|o| interferes(o, &candidate)) {
                *last = candidate;
                continue;
            }
        }
        merged.push(seg);
    }
    merged
}
