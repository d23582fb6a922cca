use serde::{Deserialize, Serialize};

use crate::Error;

/// Parameters of one outline computation. Never mutated by the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Segment reroute budget per virtual edge.
    pub max_routing_iterations: usize,
    /// Field refinement budget.
    pub max_marching_iterations: usize,
    /// Screen units per field cell.
    pub pixel_group: f32,
    pub edge_r0: f32,
    pub edge_r1: f32,
    pub node_r0: f32,
    pub node_r1: f32,
    /// Corner offset used when routing around obstacles.
    pub morph_buffer: f32,
    /// Contour sampling stride.
    pub skip: usize,
    pub threshold: f32,
    pub member_factor: f32,
    pub edge_factor: f32,
    pub non_member_factor: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_routing_iterations: 100,
            max_marching_iterations: 20,
            pixel_group: 4.0,
            edge_r0: 10.0,
            edge_r1: 20.0,
            node_r0: 15.0,
            node_r1: 50.0,
            morph_buffer: 10.0,
            skip: 8,
            threshold: 1.0,
            member_factor: 1.0,
            edge_factor: 1.0,
            non_member_factor: -0.8,
        }
    }
}

impl OutlineConfig {
    /// Padding applied around members and edges to form the active region.
    pub fn region_padding(&self) -> f32 {
        self.edge_r1.max(self.node_r1) + self.morph_buffer
    }

    /// `(r0 - r1)^2` for nodes.
    pub fn node_normalizer(&self) -> f32 {
        let d = self.node_r0 - self.node_r1;
        d * d
    }

    /// `(r0 - r1)^2` for edges.
    pub fn edge_normalizer(&self) -> f32 {
        let d = self.edge_r0 - self.edge_r1;
        d * d
    }

    pub fn validate(&self) -> Result<(), Error> {
        let finite = [
            ("pixel_group", self.pixel_group),
            ("edge_r0", self.edge_r0),
            ("edge_r1", self.edge_r1),
            ("node_r0", self.node_r0),
            ("node_r1", self.node_r1),
            ("morph_buffer", self.morph_buffer),
            ("threshold", self.threshold),
            ("member_factor", self.member_factor),
            ("edge_factor", self.edge_factor),
            ("non_member_factor", self.non_member_factor),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        if self.pixel_group <= 0.0 {
            return Err(invalid("pixel_group", "must be positive"));
        }
        if self.skip == 0 {
            return Err(invalid("skip", "must be at least 1"));
        }
        if self.morph_buffer < 0.0 {
            return Err(invalid("morph_buffer", "must not be negative"));
        }
        if self.node_r0 < 0.0 || self.node_r0 >= self.node_r1 {
            return Err(invalid("node_r0", "must satisfy 0 <= node_r0 < node_r1"));
        }
        if self.edge_r0 < 0.0 || self.edge_r0 >= self.edge_r1 {
            return Err(invalid("edge_r0", "must satisfy 0 <= edge_r0 < edge_r1"));
        }
        if self.threshold <= 0.0 {
            return Err(invalid("threshold", "must be positive"));
        }
        if self.member_factor < 0.0 {
            return Err(invalid("member_factor", "must not be negative"));
        }
        if self.edge_factor < 0.0 {
            return Err(invalid("edge_factor", "must not be negative"));
        }
        if self.non_member_factor > 0.0 {
            return Err(invalid("non_member_factor", "must not be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> Error {
    Error::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
