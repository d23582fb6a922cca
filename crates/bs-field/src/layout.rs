use bs_core::{Point2f, Rect};

/// Placement and resolution of a field grid in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub origin: Point2f,
    pub pixel_group: f32,
    pub width: usize,
    pub height: usize,
}

impl FieldLayout {
    /// Covers `region` with `ceil(size / pixel_group)` cells per axis.
    pub fn new(region: &Rect, pixel_group: f32) -> Self {
        Self {
            origin: Point2f::new(region.x, region.y),
            pixel_group,
            width: cells_for(region.width, pixel_group),
            height: cells_for(region.height, pixel_group),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Screen position of a (possibly fractional) grid coordinate.
    pub fn cell_to_screen(&self, x: f32, y: f32) -> Point2f {
        Point2f::new(
            self.origin.x + x * self.pixel_group,
            self.origin.y + y * self.pixel_group,
        )
    }

    pub fn screen_to_cell(&self, p: Point2f) -> (f32, f32) {
        (
            (p.x - self.origin.x) / self.pixel_group,
            (p.y - self.origin.y) / self.pixel_group,
        )
    }

    /// Screen rectangle spanned by the grid.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.width as f32 * self.pixel_group,
            self.height as f32 * self.pixel_group,
        )
    }
}

fn cells_for(extent: f32, pixel_group: f32) -> usize {
    let n = (extent / pixel_group).ceil();
    // NaN and negative counts saturate to zero.
    if n > 0.0 { n as usize } else { 0 }
}
