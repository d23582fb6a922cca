use bs_core::{OutlineConfig, Rect, Segment, Shape};

/// Bounding box of all members and edges, padded so every falloff fits.
/// `None` without members.
pub fn active_region(members: &[Shape], edges: &[Segment], cfg: &OutlineConfig) -> Option<Rect> {
    let (first, rest) = members.split_first()?;
    let bounds = rest
        .iter()
        .map(Shape::bounds)
        .chain(edges.iter().map(Segment::as_rect))
        .fold(first.bounds(), |acc, r| acc.union(&r));
    Some(bounds.padded(cfg.region_padding()))
}

/// Non-members overlapping `region`; the others cannot affect the field.
pub fn relevant_non_members(non_members: &[Shape], region: &Rect) -> Vec<Shape> {
    non_members
        .iter()
        .filter(|n| n.bounds().intersects(region))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use bs_core::{OutlineConfig, Rect, Segment, Shape};

    use super::{active_region, relevant_non_members};

    #[test]
    fn region_pads_members_and_edges() {
        let cfg = OutlineConfig::default();
        let members = [Shape::rect(0.0, 0.0, 10.0, 10.0), Shape::circle(100.0, 40.0, 5.0)];
        let edges = [Segment::from_coords(5.0, 5.0, 5.0, 120.0)];

        let r = active_region(&members, &edges, &cfg).expect("region");
        assert_eq!(r, Rect::new(-60.0, -60.0, 225.0, 240.0));
        assert!(active_region(&[], &edges, &cfg).is_none());
    }

    #[test]
    fn distant_non_members_are_dropped() {
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let near = Shape::rect(90.0, 90.0, 20.0, 20.0);
        let far = Shape::circle(300.0, 300.0, 10.0);

        assert_eq!(relevant_non_members(&[near, far], &region), vec![near]);
    }
}
