use bs_contour::MarchingSquares;
use bs_core::{OutlineConfig, Segment, Shape};
use bs_field::{FieldLayout, InfluenceArea, PotentialField, TemplateCache, build_segment_area};
use bs_route::EdgeRouter;
use serde::Serialize;
use tracing::debug;

use crate::outline::{Outline, edge_segments, solve};
use crate::refine::FieldAreas;
use crate::region::active_region;
use crate::sink::FieldSink;

/// Stable handle of a member or non-member in a [`BubbleSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShapeId(pub u32);

/// Stable handle of an explicit edge in a [`BubbleSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    NonMember,
}

#[derive(Debug, Clone)]
struct ShapeRecord {
    shape: Shape,
    role: Role,
    area: Option<InfluenceArea>,
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    segment: Segment,
    area: Option<InfluenceArea>,
}

/// Incremental outline computation over an editable set of shapes.
///
/// Records live in slot arenas indexed by id, so iteration order is
/// insertion order and matches the slices a caller would pass to
/// [`crate::create_outline`]. Each record caches its placed influence area;
/// the cache is dropped for edited or dirty records, and for all records
/// when the field layout moves or resizes.
#[derive(Debug)]
pub struct BubbleSession {
    config: OutlineConfig,
    shapes: Vec<Option<ShapeRecord>>,
    edges: Vec<Option<EdgeRecord>>,
    templates: TemplateCache,
    layout: Option<FieldLayout>,
    field: Option<PotentialField>,
    tracer: MarchingSquares,
    router: EdgeRouter,
}

impl Default for BubbleSession {
    fn default() -> Self {
        Self::new(OutlineConfig::default())
    }
}

impl BubbleSession {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            config,
            shapes: Vec::new(),
            edges: Vec::new(),
            templates: TemplateCache::new(),
            layout: None,
            field: None,
            tracer: MarchingSquares::new(),
            router: EdgeRouter::new(),
        }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Replaces the configuration and drops every cached area and template.
    pub fn set_config(&mut self, config: OutlineConfig) {
        self.config = config;
        self.templates.clear();
        self.layout = None;
        for rec in self.shapes.iter_mut().flatten() {
            rec.area = None;
        }
        for rec in self.edges.iter_mut().flatten() {
            rec.area = None;
        }
    }

    pub fn insert_member(&mut self, shape: Shape) -> ShapeId {
        self.insert_shape(shape, Role::Member)
    }

    pub fn insert_non_member(&mut self, shape: Shape) -> ShapeId {
        self.insert_shape(shape, Role::NonMember)
    }

    fn insert_shape(&mut self, shape: Shape, role: Role) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(Some(ShapeRecord {
            shape,
            role,
            area: None,
        }));
        id
    }

    pub fn insert_edge(&mut self, segment: Segment) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(EdgeRecord {
            segment,
            area: None,
        }));
        id
    }

    fn shape_slot(&mut self, id: ShapeId) -> Option<&mut ShapeRecord> {
        self.shapes.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0 as usize)?.as_ref().map(|r| &r.shape)
    }

    pub fn role(&self, id: ShapeId) -> Option<Role> {
        self.shapes.get(id.0 as usize)?.as_ref().map(|r| r.role)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Segment> {
        self.edges.get(id.0 as usize)?.as_ref().map(|r| &r.segment)
    }

    /// Replaces the geometry of `id`; `false` for an unknown id.
    pub fn update_shape(&mut self, id: ShapeId, shape: Shape) -> bool {
        match self.shape_slot(id) {
            Some(rec) => {
                rec.shape = shape;
                rec.area = None;
                true
            }
            None => false,
        }
    }

    /// Forces the cached area of `id` to be rebuilt on the next compute.
    pub fn mark_dirty(&mut self, id: ShapeId) -> bool {
        match self.shape_slot(id) {
            Some(rec) => {
                rec.area = None;
                true
            }
            None => false,
        }
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.get_mut(id.0 as usize)?.take().map(|r| r.shape)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Segment> {
        self.edges.get_mut(id.0 as usize)?.take().map(|r| r.segment)
    }

    fn shapes_with(&self, role: Role) -> Vec<Shape> {
        self.shapes
            .iter()
            .flatten()
            .filter(|r| r.role == role)
            .map(|r| r.shape)
            .collect()
    }

    pub fn members(&self) -> Vec<Shape> {
        self.shapes_with(Role::Member)
    }

    pub fn non_members(&self) -> Vec<Shape> {
        self.shapes_with(Role::NonMember)
    }

    pub fn explicit_edges(&self) -> Vec<Segment> {
        self.edges.iter().flatten().map(|r| r.segment).collect()
    }

    /// Template reuse so far, as `(hits, misses)`.
    /// Templates currently held; only those a record still uses survive a
    /// compute.
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn template_stats(&self) -> (u64, u64) {
        (self.templates.hits(), self.templates.misses())
    }

    pub fn compute(&mut self) -> Outline {
        self.compute_inner(None)
    }

    pub fn compute_with_sink(&mut self, sink: &mut dyn FieldSink) -> Outline {
        self.compute_inner(Some(sink))
    }

    fn compute_inner(&mut self, sink: Option<&mut dyn FieldSink>) -> Outline {
        let cfg = self.config.clone();
        let members = self.members();
        let non_members = self.non_members();
        let explicit = self.explicit_edges();

        let virtual_edges = self.router.route(&members, &non_members, &cfg);
        let segments = edge_segments(&virtual_edges, &explicit);
        let Some(region) = active_region(&members, &segments, &cfg) else {
            return Outline::no_members(&cfg);
        };

        let layout = FieldLayout::new(&region, cfg.pixel_group);
        if self.layout != Some(layout) {
            debug!(
                width = layout.width,
                height = layout.height,
                "field layout changed, rebuilding placed areas"
            );
            for rec in self.shapes.iter_mut().flatten() {
                rec.area = None;
            }
            for rec in self.edges.iter_mut().flatten() {
                rec.area = None;
            }
            self.layout = Some(layout);
        }

        let mut areas = FieldAreas::default();
        let mut relevant = Vec::new();
        for rec in self.shapes.iter_mut().flatten() {
            if rec.role == Role::NonMember && !rec.shape.bounds().intersects(&region) {
                continue;
            }
            let area = match &rec.area {
                Some(a) => a.clone(),
                None => {
                    let a = self.templates.shape_area(&layout, &rec.shape, cfg.node_r1);
                    rec.area = Some(a.clone());
                    a
                }
            };
            match rec.role {
                Role::Member => areas.members.push(area),
                Role::NonMember => {
                    areas.non_members.push(area);
                    relevant.push(rec.shape);
                }
            }
        }

        // Routed segments change with any member, so only explicit edges are
        // cached.
        for seg in virtual_edges.iter().flat_map(|e| e.segments.iter()) {
            areas.edges.push(build_segment_area(&layout, seg, cfg.edge_r1));
        }
        for rec in self.edges.iter_mut().flatten() {
            let area = match &rec.area {
                Some(a) => a.clone(),
                None => {
                    let a = build_segment_area(&layout, &rec.segment, cfg.edge_r1);
                    rec.area = Some(a.clone());
                    a
                }
            };
            areas.edges.push(area);
        }

        let field = self
            .field
            .get_or_insert_with(|| PotentialField::new(layout));
        field.reset(layout);

        let outline = solve(
            field,
            &mut self.tracer,
            &areas,
            &members,
            &relevant,
            virtual_edges,
            &cfg,
            sink,
        );

        drop(areas);
        self.templates.evict_unshared();
        outline
    }
}

#[cfg(test)]
mod tests {
    use bs_core::{OutlineConfig, Segment, Shape};

    use super::{BubbleSession, Role, ShapeId};
    use crate::outline::create_outline;
    use crate::sink::SnapshotSink;

    fn scene(session: &mut BubbleSession) -> (ShapeId, ShapeId, ShapeId) {
        let a = session.insert_member(Shape::rect(0.0, 0.0, 10.0, 10.0));
        let n = session.insert_non_member(Shape::rect(45.0, 30.0, 10.0, 10.0));
        let b = session.insert_member(Shape::circle(80.0, 5.0, 6.0));
        (a, n, b)
    }

    fn one_shot(session: &BubbleSession) -> crate::Outline {
        create_outline(
            &session.members(),
            &session.non_members(),
            &session.explicit_edges(),
            session.config(),
        )
    }

    #[test]
    fn compute_matches_one_shot() {
        let mut session = BubbleSession::default();
        scene(&mut session);
        session.insert_edge(Segment::from_coords(5.0, 5.0, 5.0, 60.0));

        let out = session.compute();
        assert_eq!(out, one_shot(&session));
        assert!(out.outcome.is_found());
    }

    #[test]
    fn edits_keep_matching_one_shot() {
        let mut session = BubbleSession::default();
        let (a, n, b) = scene(&mut session);
        session.compute();

        assert!(session.update_shape(b, Shape::circle(78.0, 7.0, 6.0)));
        assert_eq!(session.compute(), one_shot(&session));

        assert!(session.mark_dirty(a));
        assert_eq!(session.compute(), one_shot(&session));

        assert_eq!(session.remove_shape(n), Some(Shape::rect(45.0, 30.0, 10.0, 10.0)));
        assert_eq!(session.remove_shape(n), None);
        assert_eq!(session.compute(), one_shot(&session));

        let e = session.insert_edge(Segment::from_coords(5.0, 5.0, 80.0, 80.0));
        assert_eq!(session.compute(), one_shot(&session));
        assert!(session.remove_edge(e).is_some());
        assert_eq!(session.compute(), one_shot(&session));
    }

    #[test]
    fn unchanged_scene_reuses_cached_areas() {
        let mut session = BubbleSession::default();
        scene(&mut session);

        let first = session.compute();
        let (_, misses) = session.template_stats();
        let second = session.compute();

        assert_eq!(first, second);
        assert_eq!(session.template_stats().1, misses);
    }

    #[test]
    fn dragging_does_not_accumulate_templates() {
        let mut session = BubbleSession::default();
        let (_, _, b) = scene(&mut session);

        for step in 1..=200 {
            let dx = 0.37 * step as f32;
            assert!(session.update_shape(b, Shape::circle(80.0 + dx, 5.0, 6.0)));
            session.compute();
            assert!(session.template_count() <= 3, "step {step}");
        }
        assert_eq!(session.compute(), one_shot(&session));
    }

    #[test]
    fn set_config_drops_caches() {
        let mut session = BubbleSession::default();
        scene(&mut session);
        session.compute();

        session.set_config(OutlineConfig {
            node_r1: 40.0,
            ..OutlineConfig::default()
        });
        assert_eq!(session.template_stats(), (0, 0));
        assert_eq!(session.compute(), one_shot(&session));
    }

    #[test]
    fn ids_are_stable_and_roles_kept() {
        let mut session = BubbleSession::default();
        let (a, n, b) = scene(&mut session);
        session.remove_shape(a);

        assert_eq!(session.shape(a), None);
        assert_eq!(session.role(n), Some(Role::NonMember));
        assert_eq!(session.role(b), Some(Role::Member));
        assert!(!session.update_shape(a, Shape::circle(0.0, 0.0, 1.0)));
        assert!(!session.mark_dirty(ShapeId(99)));
        assert_eq!(session.members().len(), 1);
    }

    #[test]
    fn empty_session_has_no_outline() {
        let mut session = BubbleSession::default();
        session.insert_non_member(Shape::circle(0.0, 0.0, 5.0));

        let mut sink = SnapshotSink::default();
        let out = session.compute_with_sink(&mut sink);
        assert!(out.is_empty());
        assert!(sink.snapshot.is_none());
    }
}
