use bs_contour::{Containment, MarchingSquares};
use bs_core::{Error, OutlineConfig, Segment, Shape};
use bs_field::{FieldLayout, PotentialField, TemplateCache, build_segment_area};
use bs_path::{PathConfig, PointPath, sample_closed};
use bs_route::{VirtualEdge, route_virtual_edges};
use serde::Serialize;

use crate::refine::{FieldAreas, RefineOutcome, RefineReport, RefineState, refine};
use crate::region::{active_region, relevant_non_members};
use crate::sink::FieldSink;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineStats {
    /// Threshold and factors of the last traced iteration.
    pub state: RefineState,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Points of the last traced contour before sampling.
    pub raw_points: usize,
    pub containment: Option<Containment>,
}

impl OutlineStats {
    fn initial(cfg: &OutlineConfig) -> Self {
        Self {
            state: RefineState::from_config(cfg),
            grid_width: 0,
            grid_height: 0,
            raw_points: 0,
            containment: None,
        }
    }
}

/// Result of one outline computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    /// Sampled screen-space outline; empty unless a contour was found.
    pub path: PointPath,
    pub outcome: RefineOutcome,
    pub virtual_edges: Vec<VirtualEdge>,
    pub stats: OutlineStats,
}

impl Outline {
    pub(crate) fn no_members(cfg: &OutlineConfig) -> Self {
        Self {
            path: PointPath::default(),
            outcome: RefineOutcome::NoMembers,
            virtual_edges: Vec::new(),
            stats: OutlineStats::initial(cfg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Simplified and/or smoothed copy of [`Self::path`].
    pub fn post_process(&self, cfg: &PathConfig) -> PointPath {
        self.path.post_process(cfg)
    }
}

/// Segments of every virtual edge followed by the explicit edges.
pub(crate) fn edge_segments(virtual_edges: &[VirtualEdge], explicit: &[Segment]) -> Vec<Segment> {
    virtual_edges
        .iter()
        .flat_map(|e| e.segments.iter().copied())
        .chain(explicit.iter().copied())
        .collect()
}

/// Runs refinement over prepared areas and packages the result.
#[allow(clippy::too_many_arguments)]
pub(crate) fn solve(
    field: &mut PotentialField,
    tracer: &mut MarchingSquares,
    areas: &FieldAreas,
    members: &[Shape],
    relevant: &[Shape],
    virtual_edges: Vec<VirtualEdge>,
    cfg: &OutlineConfig,
    sink: Option<&mut dyn FieldSink>,
) -> Outline {
    let report = refine(field, tracer, areas, members, relevant, cfg);
    if let Some(sink) = sink {
        sink.accept(field, report.state.threshold);
    }
    package(report, field.layout(), virtual_edges, cfg)
}

fn package(
    report: RefineReport,
    layout: &FieldLayout,
    virtual_edges: Vec<VirtualEdge>,
    cfg: &OutlineConfig,
) -> Outline {
    let path = match &report.outcome {
        RefineOutcome::Found(contour) => {
            PointPath::closed(sample_closed(&contour.to_screen(layout), cfg.skip))
        }
        _ => PointPath::default(),
    };

    Outline {
        path,
        outcome: report.outcome,
        virtual_edges,
        stats: OutlineStats {
            state: report.state,
            grid_width: layout.width,
            grid_height: layout.height,
            raw_points: report.contour_len,
            containment: report.containment,
        },
    }
}

fn compute(
    members: &[Shape],
    non_members: &[Shape],
    edges: &[Segment],
    cfg: &OutlineConfig,
    sink: Option<&mut dyn FieldSink>,
) -> Outline {
    let virtual_edges = route_virtual_edges(members, non_members, cfg);
    let segments = edge_segments(&virtual_edges, edges);
    let Some(region) = active_region(members, &segments, cfg) else {
        return Outline::no_members(cfg);
    };

    let layout = FieldLayout::new(&region, cfg.pixel_group);
    let relevant = relevant_non_members(non_members, &region);
    let mut cache = TemplateCache::new();
    let areas = FieldAreas {
        members: members
            .iter()
            .map(|m| cache.shape_area(&layout, m, cfg.node_r1))
            .collect(),
        edges: segments
            .iter()
            .map(|s| build_segment_area(&layout, s, cfg.edge_r1))
            .collect(),
        non_members: relevant
            .iter()
            .map(|n| cache.shape_area(&layout, n, cfg.node_r1))
            .collect(),
    };

    let mut field = PotentialField::new(layout);
    solve(
        &mut field,
        &mut MarchingSquares::new(),
        &areas,
        members,
        &relevant,
        virtual_edges,
        cfg,
        sink,
    )
}

/// Computes the outline enclosing `members` while avoiding `non_members`.
///
/// Inputs are used as given; see [`try_create_outline`] for validation.
pub fn create_outline(
    members: &[Shape],
    non_members: &[Shape],
    edges: &[Segment],
    cfg: &OutlineConfig,
) -> Outline {
    compute(members, non_members, edges, cfg, None)
}

/// Like [`create_outline`], handing the final field to `sink`.
pub fn create_outline_with_sink(
    members: &[Shape],
    non_members: &[Shape],
    edges: &[Segment],
    cfg: &OutlineConfig,
    sink: &mut dyn FieldSink,
) -> Outline {
    compute(members, non_members, edges, cfg, Some(sink))
}

/// Validates the configuration and every shape and edge before computing.
pub fn try_create_outline(
    members: &[Shape],
    non_members: &[Shape],
    edges: &[Segment],
    cfg: &OutlineConfig,
) -> Result<Outline, Error> {
    cfg.validate()?;
    for shape in members.iter().chain(non_members) {
        shape.validate()?;
    }
    for edge in edges {
        if !(edge.a.is_finite() && edge.b.is_finite()) {
            return Err(Error::InvalidShape {
                reason: "edge endpoint is not finite".to_string(),
            });
        }
    }
    Ok(create_outline(members, non_members, edges, cfg))
}

#[cfg(test)]
mod tests {
    use bs_contour::polygon_contains;
    use bs_core::{Error, OutlineConfig, Point2f, Segment, Shape};
    use bs_path::PathConfig;

    use super::{create_outline, create_outline_with_sink, try_create_outline};
    use crate::refine::RefineOutcome;
    use crate::sink::SnapshotSink;

    fn assert_encloses(points: &[Point2f], shapes: &[Shape]) {
        for s in shapes {
            assert!(polygon_contains(points, s.center()), "{:?} not enclosed", s.center());
        }
    }

    #[test]
    fn single_rect_member_is_enclosed() {
        let member = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let out = create_outline(&[member], &[], &[], &OutlineConfig::default());

        assert!(out.outcome.is_found());
        assert!(!out.is_empty());
        assert!(out.path.is_closed());
        assert!(out.virtual_edges.is_empty());

        let b = out.path.bounds().expect("bounds");
        assert!(b.width > 10.0 && b.height > 10.0);
        assert!(b.contains_point(Point2f::new(5.0, 5.0)));
        assert_encloses(out.path.points(), &[member]);
        assert!(out.stats.containment.is_some_and(|c| c.all_members));
    }

    #[test]
    fn connected_pair_is_enclosed_together() {
        let members = [
            Shape::rect(0.0, 0.0, 10.0, 10.0),
            Shape::rect(60.0, 0.0, 10.0, 10.0),
        ];
        let out = create_outline(&members, &[], &[], &OutlineConfig::default());

        assert_eq!(out.virtual_edges.len(), 1);
        assert!(out.outcome.is_found());
        assert_encloses(out.path.points(), &members);
    }

    #[test]
    fn obstacle_reroutes_the_virtual_edge() {
        let members = [
            Shape::rect(0.0, 0.0, 10.0, 10.0),
            Shape::rect(200.0, 0.0, 10.0, 10.0),
        ];
        let obstacle = Shape::rect(90.0, -20.0, 30.0, 50.0);
        let out = create_outline(&members, &[obstacle], &[], &OutlineConfig::default());

        assert_eq!(out.virtual_edges.len(), 1);
        let edge = &out.virtual_edges[0];
        assert!(edge.points().len() > 2);
        assert_ne!(
            edge.segments,
            vec![Segment::new(members[1].center(), members[0].center())]
        );
        if out.outcome.is_found() {
            assert_encloses(out.path.points(), &members);
        }
    }

    #[test]
    fn no_members_gives_an_empty_outline() {
        let cfg = OutlineConfig::default();
        let out = create_outline(
            &[],
            &[Shape::circle(5.0, 5.0, 3.0)],
            &[Segment::from_coords(0.0, 0.0, 50.0, 50.0)],
            &cfg,
        );

        assert!(out.is_empty());
        assert_eq!(out.outcome, RefineOutcome::NoMembers);
        assert_eq!(out.stats.grid_width, 0);
    }

    #[test]
    fn coarser_grid_has_fewer_cells_and_points() {
        let member = [Shape::rect(0.0, 0.0, 10.0, 10.0)];
        let fine = create_outline(&member, &[], &[], &OutlineConfig::default());
        let coarse = create_outline(
            &member,
            &[],
            &[],
            &OutlineConfig {
                pixel_group: 8.0,
                ..OutlineConfig::default()
            },
        );

        let fine_cells = (fine.stats.grid_width * fine.stats.grid_height) as f32;
        let coarse_cells = (coarse.stats.grid_width * coarse.stats.grid_height) as f32;
        let ratio = fine_cells / coarse_cells;
        assert!((3.0..=5.0).contains(&ratio), "ratio {ratio}");
        assert!(coarse.stats.raw_points < fine.stats.raw_points);
    }

    #[test]
    fn explicit_edges_extend_the_region() {
        let member = [Shape::rect(0.0, 0.0, 10.0, 10.0)];
        let edge = [Segment::from_coords(5.0, 5.0, 5.0, 200.0)];
        let plain = create_outline(&member, &[], &[], &OutlineConfig::default());
        let with_edge = create_outline(&member, &[], &edge, &OutlineConfig::default());

        assert!(with_edge.stats.grid_height > plain.stats.grid_height);
        assert_eq!(with_edge.stats.grid_width, plain.stats.grid_width);
    }

    #[test]
    fn sink_sees_the_final_field() {
        let member = [Shape::rect(0.0, 0.0, 10.0, 10.0)];
        let cfg = OutlineConfig::default();
        let mut sink = SnapshotSink::default();
        let out = create_outline_with_sink(&member, &[], &[], &cfg, &mut sink);

        let snap = sink.snapshot.expect("snapshot");
        assert_eq!(snap.width, out.stats.grid_width);
        assert_eq!(snap.threshold, out.stats.state.threshold);
        assert!(snap.max_value() > snap.threshold);
        assert_eq!(out, create_outline(&member, &[], &[], &cfg));
    }

    #[test]
    fn validation_runs_before_computing() {
        let member = [Shape::rect(0.0, 0.0, 10.0, 10.0)];
        let bad_cfg = OutlineConfig {
            pixel_group: 0.0,
            ..OutlineConfig::default()
        };
        assert!(matches!(
            try_create_outline(&member, &[], &[], &bad_cfg),
            Err(Error::InvalidConfig { .. })
        ));

        let nan = [Shape::rect(f32::NAN, 0.0, 10.0, 10.0)];
        assert!(matches!(
            try_create_outline(&nan, &[], &[], &OutlineConfig::default()),
            Err(Error::InvalidShape { .. })
        ));

        let edge = [Segment::from_coords(0.0, 0.0, f32::INFINITY, 1.0)];
        assert!(try_create_outline(&member, &[], &edge, &OutlineConfig::default()).is_err());

        let ok = try_create_outline(&member, &[], &[], &OutlineConfig::default()).expect("ok");
        assert!(ok.outcome.is_found());
    }

    #[test]
    fn post_processing_smooths_the_outline() {
        let member = [Shape::rect(0.0, 0.0, 10.0, 10.0)];
        let out = create_outline(&member, &[], &[], &OutlineConfig::default());
        let smooth = out.post_process(&PathConfig {
            simplify_tolerance: None,
            smooth_granularity: Some(4),
        });

        assert_eq!(smooth.len(), 1 + out.path.len() * 4);
        assert!(smooth.is_closed());
    }
}
