use bs_field::PotentialField;
use serde::Serialize;

/// Receives the final field of a computation. Never read back.
pub trait FieldSink {
    fn accept(&mut self, field: &PotentialField, threshold: f32);
}

impl<F: FnMut(&PotentialField, f32)> FieldSink for F {
    fn accept(&mut self, field: &PotentialField, threshold: f32) {
        self(field, threshold)
    }
}

/// One field cell as a screen-space square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldCell {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSnapshot {
    pub threshold: f32,
    pub pixel_group: f32,
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub cells: Vec<FieldCell>,
}

impl FieldSnapshot {
    pub fn capture(field: &PotentialField, threshold: f32) -> Self {
        let layout = field.layout();
        let pg = layout.pixel_group;
        let mut cells = Vec::with_capacity(layout.cell_count());
        for y in 0..layout.height {
            for (x, &value) in field.energy().row(y).iter().enumerate() {
                let p = layout.cell_to_screen(x as f32, y as f32);
                cells.push(FieldCell {
                    x: p.x,
                    y: p.y,
                    width: pg,
                    height: pg,
                    value,
                });
            }
        }

        Self {
            threshold,
            pixel_group: pg,
            width: layout.width,
            height: layout.height,
            cells,
        }
    }

    pub fn value(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).map(|c| c.value)
    }

    /// Largest energy in the snapshot, `0` when empty.
    pub fn max_value(&self) -> f32 {
        self.cells.iter().fold(0.0f32, |m, c| m.max(c.value))
    }
}

/// Keeps the last delivered field as a [`FieldSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotSink {
    pub snapshot: Option<FieldSnapshot>,
}

impl FieldSink for SnapshotSink {
    fn accept(&mut self, field: &PotentialField, threshold: f32) {
        self.snapshot = Some(FieldSnapshot::capture(field, threshold));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bs_core::{Grid, Rect};
    use bs_field::{FieldLayout, InfluenceArea, PotentialField};

    use super::{FieldSink, SnapshotSink};

    #[test]
    fn snapshot_places_cells_in_screen_space() {
        let layout = FieldLayout::new(&Rect::new(10.0, 20.0, 12.0, 8.0), 4.0);
        let mut field = PotentialField::new(layout);
        field.add_area(
            &InfluenceArea {
                x: 2,
                y: 1,
                values: Arc::new(Grid::new_fill(1, 1, 3.0)),
            },
            1.0,
        );

        let mut sink = SnapshotSink::default();
        sink.accept(&field, 0.75);
        let snap = sink.snapshot.expect("snapshot");

        assert_eq!((snap.width, snap.height), (3, 2));
        assert_eq!(snap.cells.len(), 6);
        assert_eq!(snap.threshold, 0.75);
        assert_eq!(snap.value(2, 1), Some(3.0));
        assert_eq!(snap.value(3, 0), None);
        assert_eq!(snap.max_value(), 3.0);

        let cell = snap.cells[5];
        assert_eq!((cell.x, cell.y, cell.width), (18.0, 24.0, 4.0));

        let json = serde_json::to_value(&snap).expect("json");
        assert_eq!(json["cells"][5]["value"], 3.0);
    }

    #[test]
    fn closures_are_sinks() {
        let layout = FieldLayout::new(&Rect::new(0.0, 0.0, 8.0, 8.0), 4.0);
        let field = PotentialField::new(layout);
        let mut seen = None;
        {
            let mut sink = |f: &PotentialField, t: f32| seen = Some((f.width(), t));
            sink.accept(&field, 0.5);
        }
        assert_eq!(seen, Some((2, 0.5)));
    }
}
