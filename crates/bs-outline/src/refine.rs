use bs_contour::{Containment, Contour, MarchingSquares, validate_contour};
use bs_core::{OutlineConfig, Shape};
use bs_field::{InfluenceArea, PotentialField};
use serde::Serialize;
use tracing::{debug, warn};

const THRESHOLD_DECAY: f32 = 0.95;
const ATTRACTION_GROWTH: f32 = 1.2;
const REPULSION_DECAY: f32 = 0.8;

/// Placed influence areas, one per member, edge segment and relevant
/// non-member, in that accumulation order.
#[derive(Debug, Clone, Default)]
pub struct FieldAreas {
    pub members: Vec<InfluenceArea>,
    pub edges: Vec<InfluenceArea>,
    pub non_members: Vec<InfluenceArea>,
}

/// Threshold and weights of the current refinement iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefineState {
    pub iterations: usize,
    pub threshold: f32,
    pub member_factor: f32,
    pub edge_factor: f32,
    pub non_member_factor: f32,
}

impl RefineState {
    pub fn from_config(cfg: &OutlineConfig) -> Self {
        Self {
            iterations: 0,
            threshold: cfg.threshold,
            member_factor: cfg.member_factor,
            edge_factor: cfg.edge_factor,
            non_member_factor: cfg.non_member_factor,
        }
    }

    /// Loosens the state after a rejected iteration. Returns `false` when no
    /// lever is left to pull.
    ///
    /// The threshold always decays. While the advanced iteration count is
    /// within the first half of the budget the attracting factors grow;
    /// afterwards the repulsion decays while there is any.
    pub fn relax(&mut self, cfg: &OutlineConfig, has_non_members: bool) -> bool {
        let half = cfg.max_marching_iterations as f32 * 0.5;
        self.threshold *= THRESHOLD_DECAY;
        self.iterations += 1;

        if self.iterations as f32 <= half {
            self.member_factor *= ATTRACTION_GROWTH;
            self.edge_factor *= ATTRACTION_GROWTH;
            true
        } else if self.non_member_factor != 0.0 && has_non_members {
            self.non_member_factor *= REPULSION_DECAY;
            true
        } else {
            false
        }
    }
}

/// How the refinement loop ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "contour", rename_all = "snake_case")]
pub enum RefineOutcome {
    /// A contour enclosing every member, in grid coordinates.
    Found(Contour),
    ExhaustedIterations,
    NoMoreLevers,
    NoMembers,
}

impl RefineOutcome {
    pub fn contour(&self) -> Option<&Contour> {
        match self {
            RefineOutcome::Found(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RefineOutcome::Found(_))
    }

    /// Serialized tag of the variant.
    pub fn status(&self) -> &'static str {
        match self {
            RefineOutcome::Found(_) => "found",
            RefineOutcome::ExhaustedIterations => "exhausted_iterations",
            RefineOutcome::NoMoreLevers => "no_more_levers",
            RefineOutcome::NoMembers => "no_members",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefineReport {
    pub outcome: RefineOutcome,
    /// State of the last iteration that was traced.
    pub state: RefineState,
    /// Containment of the last traced contour.
    pub containment: Option<Containment>,
    /// Raw point count of the last traced contour.
    pub contour_len: usize,
}

/// Clears `field` and accumulates every area at its normalized weight.
pub fn fill_field(
    field: &mut PotentialField,
    areas: &FieldAreas,
    state: &RefineState,
    cfg: &OutlineConfig,
) {
    field.clear();

    let node = cfg.node_normalizer();
    let edge = cfg.edge_normalizer();
    let layers = [
        (&areas.members, state.member_factor / node),
        (&areas.edges, state.edge_factor / edge),
        (&areas.non_members, state.non_member_factor / node),
    ];
    for (list, weight) in layers {
        if weight == 0.0 {
            continue;
        }
        for area in list {
            field.add_area(area, weight);
        }
    }
}

fn warn_on_factor_signs(state: &RefineState) {
    if state.member_factor < 0.0 {
        warn!(factor = state.member_factor, "member influence factor is negative");
    }
    if state.edge_factor < 0.0 {
        warn!(factor = state.edge_factor, "edge influence factor is negative");
    }
    if state.non_member_factor > 0.0 {
        warn!(
            factor = state.non_member_factor,
            "non-member influence factor is positive"
        );
    }
}

/// Fills, traces and validates until a contour encloses all `members` or
/// the budget runs out. `field` is left holding the last accumulated energy.
pub fn refine(
    field: &mut PotentialField,
    tracer: &mut MarchingSquares,
    areas: &FieldAreas,
    members: &[Shape],
    non_members: &[Shape],
    cfg: &OutlineConfig,
) -> RefineReport {
    let mut state = RefineState::from_config(cfg);
    warn_on_factor_signs(&state);

    let mut traced = state;
    let mut containment = None;
    let mut contour_len = 0;

    let outcome = loop {
        if state.iterations >= cfg.max_marching_iterations {
            break RefineOutcome::ExhaustedIterations;
        }

        fill_field(field, areas, &state, cfg);
        let contour = tracer.trace(field, state.threshold);
        let check = contour.as_ref().map(|c| {
            validate_contour(&c.to_screen(field.layout()), members, non_members, cfg.skip)
        });

        traced = state;
        containment = check;
        contour_len = contour.as_ref().map_or(0, Contour::len);
        debug!(
            iteration = state.iterations,
            threshold = state.threshold,
            member_factor = state.member_factor,
            edge_factor = state.edge_factor,
            non_member_factor = state.non_member_factor,
            contour_len,
            members_inside = ?check.map(|c| c.members_inside),
            leaked = ?check.map(|c| c.leaked),
            "refinement iteration"
        );

        if let (Some(c), Some(v)) = (contour, check)
            && v.all_members
        {
            break RefineOutcome::Found(c);
        }
        if !state.relax(cfg, !non_members.is_empty()) {
            break RefineOutcome::NoMoreLevers;
        }
    };

    RefineReport {
        outcome,
        state: traced,
        containment,
        contour_len,
    }
}
