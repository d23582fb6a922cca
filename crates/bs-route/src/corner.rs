use bs_core::{Point2f, Rect, RectCrossing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Corner of `rect` pushed outward diagonally by `buffer`.
    pub fn offset_point(self, rect: &Rect, buffer: f32) -> Point2f {
        match self {
            Corner::TopLeft => Point2f::new(rect.x - buffer, rect.y - buffer),
            Corner::TopRight => Point2f::new(rect.x2() + buffer, rect.y - buffer),
            Corner::BottomLeft => Point2f::new(rect.x - buffer, rect.y2() + buffer),
            Corner::BottomRight => Point2f::new(rect.x2() + buffer, rect.y2() + buffer),
        }
    }

    /// Corner to wrap a line around, given how it crosses `rect`.
    ///
    /// A line entering through two adjacent edges cuts off a triangle and
    /// wraps around the corner between them. A line crossing two opposite
    /// edges wraps around the side holding less of the rectangle's area,
    /// at the corner where the line sits closer to that side. Exact area
    /// ties go around the bottom for left-right crossings and around the
    /// right for top-bottom crossings; equal crossing coordinates fall on the
    /// right-hand or bottom corner.
    pub fn preferred(rect: &Rect, crossing: &RectCrossing) -> Corner {
        let top = crossing.top.point();
        let left = crossing.left.point();
        let bottom = crossing.bottom.point();
        let right = crossing.right.point();

        if let Some(l) = left {
            if top.is_some() {
                return Corner::TopLeft;
            }
            if bottom.is_some() {
                return Corner::BottomLeft;
            }
            let r = right.unwrap_or(l);
            let top_area = rect.width * ((l.y - rect.y) + (r.y - rect.y)) * 0.5;
            if top_area < rect.area() * 0.5 {
                return if l.y > r.y {
                    Corner::TopLeft
                } else {
                    Corner::TopRight
                };
            }
            return if l.y < r.y {
                Corner::BottomLeft
            } else {
                Corner::BottomRight
            };
        }

        if right.is_some() {
            if top.is_some() {
                return Corner::TopRight;
            }
            if bottom.is_some() {
                return Corner::BottomRight;
            }
        }

        let t = top.unwrap_or(Point2f::new(rect.cx(), rect.y));
        let b = bottom.unwrap_or(t);
        let left_area = rect.height * ((t.x - rect.x) + (b.x - rect.x)) * 0.5;
        if left_area < rect.area() * 0.5 {
            return if t.x > b.x {
                Corner::TopLeft
            } else {
                Corner::BottomLeft
            };
        }
        if t.x < b.x {
            Corner::TopRight
        } else {
            Corner::BottomRight
        }
    }
}

#[cfg(test)]
mod tests {
    use bs_core::{Point2f, Rect, Segment, rect_crossing};

    use super::Corner;

    fn corner_for(line: Segment) -> Corner {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        Corner::preferred(&rect, &rect_crossing(&line, &rect))
    }

    #[test]
    fn adjacent_edges_wrap_the_cut_corner() {
        assert_eq!(
            corner_for(Segment::from_coords(-2.0, 4.0, 4.0, -2.0)),
            Corner::TopLeft
        );
        assert_eq!(
            corner_for(Segment::from_coords(-2.0, 6.0, 4.0, 12.0)),
            Corner::BottomLeft
        );
        assert_eq!(
            corner_for(Segment::from_coords(12.0, 4.0, 6.0, -2.0)),
            Corner::TopRight
        );
        assert_eq!(
            corner_for(Segment::from_coords(12.0, 6.0, 6.0, 12.0)),
            Corner::BottomRight
        );
    }

    #[test]
    fn opposite_edges_wrap_the_thinner_side() {
        // Horizontal pass near the top edge, rising to the right.
        assert_eq!(
            corner_for(Segment::from_coords(-5.0, 3.0, 15.0, 1.0)),
            Corner::TopLeft
        );
        // Pass near the bottom edge.
        assert_eq!(
            corner_for(Segment::from_coords(-5.0, 8.0, 15.0, 9.0)),
            Corner::BottomLeft
        );
        // Vertical pass near the left edge.
        assert_eq!(
            corner_for(Segment::from_coords(2.0, -5.0, 1.0, 15.0)),
            Corner::TopLeft
        );
        // Vertical pass near the right edge.
        assert_eq!(
            corner_for(Segment::from_coords(8.0, -5.0, 9.0, 15.0)),
            Corner::TopRight
        );
    }

    #[test]
    fn exact_center_tie_is_deterministic() {
        assert_eq!(
            corner_for(Segment::from_coords(-5.0, 5.0, 15.0, 5.0)),
            Corner::BottomRight
        );
        assert_eq!(
            corner_for(Segment::from_coords(5.0, -5.0, 5.0, 15.0)),
            Corner::BottomRight
        );
    }

    #[test]
    fn offsets_push_outward() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            Corner::TopLeft.offset_point(&rect, 2.0),
            Point2f::new(-2.0, -2.0)
        );
        assert_eq!(
            Corner::BottomRight.offset_point(&rect, 2.0),
            Point2f::new(12.0, 12.0)
        );
        assert_eq!(Corner::TopRight.opposite(), Corner::BottomLeft);
    }
}
