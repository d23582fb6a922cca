use std::sync::Arc;

use bs_core::{Grid, Point2f, Rect, Segment, Shape, ShapeKind};

use crate::layout::FieldLayout;

/// Unit-weight falloff for a squared distance: `(d - r1)^2` inside `r1`.
#[inline]
pub fn influence(dist_sq: f32, r1: f32) -> f32 {
    if dist_sq < r1 * r1 {
        let d = dist_sq.sqrt() - r1;
        d * d
    } else {
        0.0
    }
}

/// A template grid placed at a signed cell offset in some field.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceArea {
    pub x: isize,
    pub y: isize,
    pub values: Arc<Grid<f32>>,
}

impl InfluenceArea {
    pub fn width(&self) -> usize {
        self.values.width()
    }

    pub fn height(&self) -> usize {
        self.values.height()
    }
}

/// Everything a shape template depends on, stored as raw bits so equal keys
/// always describe bit-identical grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub kind: ShapeKind,
    width: u32,
    height: u32,
    phase_x: u32,
    phase_y: u32,
    r1: u32,
    pixel_group: u32,
}

impl TemplateKey {
    pub fn size(&self) -> (f32, f32) {
        (f32::from_bits(self.width), f32::from_bits(self.height))
    }

    pub fn phase(&self) -> (f32, f32) {
        (f32::from_bits(self.phase_x), f32::from_bits(self.phase_y))
    }

    pub fn r1(&self) -> f32 {
        f32::from_bits(self.r1)
    }

    pub fn pixel_group(&self) -> f32 {
        f32::from_bits(self.pixel_group)
    }
}

/// Splits a screen coordinate relative to the field origin into a cell index
/// and the remaining offset inside that cell.
fn cell_and_phase(offset: f32, pixel_group: f32) -> (isize, f32) {
    let cell = (offset / pixel_group).floor();
    let phase = offset - cell * pixel_group;
    (cell as isize, phase)
}

/// Key and placement of the template for `shape` in `layout`.
pub fn shape_key(layout: &FieldLayout, shape: &Shape, r1: f32) -> (TemplateKey, isize, isize) {
    let b = shape.bounds();
    let pg = layout.pixel_group;
    let (x, phase_x) = cell_and_phase(b.x - r1 - layout.origin.x, pg);
    let (y, phase_y) = cell_and_phase(b.y - r1 - layout.origin.y, pg);

    let key = TemplateKey {
        kind: shape.kind(),
        width: b.width.to_bits(),
        height: b.height.to_bits(),
        phase_x: phase_x.to_bits(),
        phase_y: phase_y.to_bits(),
        r1: r1.to_bits(),
        pixel_group: pg.to_bits(),
    };
    (key, x, y)
}

/// Builds the unit-weight template described by `key`.
pub fn build_template(key: &TemplateKey) -> Grid<f32> {
    let (w, h) = key.size();
    let (px, py) = key.phase();
    let r1 = key.r1();
    let pg = key.pixel_group();

    let cols = span_cells(px + w + 2.0 * r1, pg);
    let rows = span_cells(py + h + 2.0 * r1, pg);

    // The shape in template-local coordinates, where sample (i, j) sits at
    // (i * pg, j * pg).
    let left = px + r1;
    let top = py + r1;
    let local = match key.kind {
        ShapeKind::Rect => Shape::Rect(Rect::new(left, top, w, h)),
        ShapeKind::Circle => Shape::circle(left + w * 0.5, top + h * 0.5, w * 0.5),
    };

    let mut grid = Grid::new_fill(cols, rows, 0.0f32);
    let data = grid.data_mut();
    for j in 0..rows {
        let sy = j as f32 * pg;
        for i in 0..cols {
            let p = Point2f::new(i as f32 * pg, sy);
            data[j * cols + i] = influence(local.dist_sq(p), r1);
        }
    }
    grid
}

/// Uncached template for one shape, already placed in `layout`.
pub fn build_shape_area(layout: &FieldLayout, shape: &Shape, r1: f32) -> InfluenceArea {
    let (key, x, y) = shape_key(layout, shape, r1);
    InfluenceArea {
        x,
        y,
        values: Arc::new(build_template(&key)),
    }
}

/// Influence of a line segment, clipped to the cells of `layout`.
pub fn build_segment_area(layout: &FieldLayout, seg: &Segment, r1: f32) -> InfluenceArea {
    let b = seg.as_rect().padded(r1);
    let pg = layout.pixel_group;

    let (x0, _) = cell_and_phase(b.x - layout.origin.x, pg);
    let (y0, _) = cell_and_phase(b.y - layout.origin.y, pg);
    let x1 = x0 + span_cells(b.width, pg) as isize + 1;
    let y1 = y0 + span_cells(b.height, pg) as isize + 1;

    let x0 = x0.clamp(0, layout.width as isize);
    let y0 = y0.clamp(0, layout.height as isize);
    let x1 = x1.clamp(x0, layout.width as isize);
    let y1 = y1.clamp(y0, layout.height as isize);

    let cols = (x1 - x0) as usize;
    let rows = (y1 - y0) as usize;
    let mut grid = Grid::new_fill(cols, rows, 0.0f32);
    let data = grid.data_mut();
    for j in 0..rows {
        for i in 0..cols {
            let p = layout.cell_to_screen((x0 as usize + i) as f32, (y0 as usize + j) as f32);
            data[j * cols + i] = influence(seg.dist_sq(p), r1);
        }
    }

    InfluenceArea {
        x: x0,
        y: y0,
        values: Arc::new(grid),
    }
}

fn span_cells(extent: f32, pixel_group: f32) -> usize {
    let n = (extent / pixel_group).ceil();
    if n >= 1.0 { n as usize } else { 1 }
}
