use bs_core::Grid;
use tracing::trace;

use crate::layout::FieldLayout;
use crate::template::InfluenceArea;

/// Energy grid accumulated from weighted influence areas.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialField {
    layout: FieldLayout,
    energy: Grid<f32>,
}

impl PotentialField {
    pub fn new(layout: FieldLayout) -> Self {
        Self {
            layout,
            energy: Grid::new_fill(layout.width, layout.height, 0.0),
        }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn energy(&self) -> &Grid<f32> {
        &self.energy
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    /// Energy at a cell; `None` outside the grid.
    #[inline]
    pub fn value(&self, x: isize, y: isize) -> Option<f32> {
        self.energy.get_signed(x, y).copied()
    }

    /// Switches to `layout`, reallocating only when the grid size changes.
    /// The field is zeroed either way.
    pub fn reset(&mut self, layout: FieldLayout) {
        if layout.width != self.layout.width || layout.height != self.layout.height {
            self.energy = Grid::new_fill(layout.width, layout.height, 0.0);
        } else {
            self.energy.fill(0.0);
        }
        self.layout = layout;
    }

    pub fn clear(&mut self) {
        self.energy.fill(0.0);
    }

    /// Adds `factor * area` cell by cell, ignoring cells outside the field.
    ///
    /// A negative factor only lowers cells that are already positive.
    pub fn add_area(&mut self, area: &InfluenceArea, factor: f32) {
        if factor == 0.0 {
            return;
        }

        let fw = self.layout.width as isize;
        let fh = self.layout.height as isize;
        let aw = area.width() as isize;
        let ah = area.height() as isize;

        let i0 = (-area.x).clamp(0, aw);
        let i1 = (fw - area.x).clamp(i0, aw);
        let j0 = (-area.y).clamp(0, ah);
        let j1 = (fh - area.y).clamp(j0, ah);
        if i0 >= i1 || j0 >= j1 {
            trace!(x = area.x, y = area.y, "influence area lies outside the field");
            return;
        }

        let width = self.layout.width;
        let field = self.energy.data_mut();
        for j in j0..j1 {
            let src = &area.values.row(j as usize)[i0 as usize..i1 as usize];
            let start = (area.y + j) as usize * width + (area.x + i0) as usize;
            let dst = &mut field[start..start + src.len()];

            if factor > 0.0 {
                for (d, &v) in dst.iter_mut().zip(src) {
                    *d += factor * v;
                }
            } else {
                for (d, &v) in dst.iter_mut().zip(src) {
                    if *d > 0.0 {
                        *d += factor * v;
                    }
                }
            }
        }
    }
}
