use std::collections::HashMap;
use std::sync::Arc;

use bs_core::{Grid, Shape};
use tracing::{debug, trace};

use crate::layout::FieldLayout;
use crate::template::{InfluenceArea, TemplateKey, build_template, shape_key};

/// Memoizes shape templates by [`TemplateKey`].
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<TemplateKey, Arc<Grid<f32>>>,
    hits: u64,
    misses: u64,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same result as [`crate::build_shape_area`], sharing the grid when an
    /// equal key was built before.
    pub fn shape_area(&mut self, layout: &FieldLayout, shape: &Shape, r1: f32) -> InfluenceArea {
        let (key, x, y) = shape_key(layout, shape, r1);
        let values = match self.templates.get(&key) {
            Some(grid) => {
                self.hits += 1;
                Arc::clone(grid)
            }
            None => {
                self.misses += 1;
                let grid = Arc::new(build_template(&key));
                trace!(
                    width = grid.width(),
                    height = grid.height(),
                    cached = self.templates.len(),
                    "built influence template"
                );
                self.templates.insert(key, Arc::clone(&grid));
                grid
            }
        };
        InfluenceArea { x, y, values }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drops every template no placed area still shares. Returns how many
    /// were dropped.
    pub fn evict_unshared(&mut self) -> usize {
        let before = self.templates.len();
        self.templates.retain(|_, grid| Arc::strong_count(grid) > 1);
        let evicted = before - self.templates.len();
        if evicted > 0 {
            debug!(evicted, kept = self.templates.len(), "dropped unused templates");
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.templates.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
