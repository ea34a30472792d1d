//! Cutting the path at its pins and routing the pieces in between.

use super::fixed_segment::FixedSegment;
use super::{ArrowEnd, EditContext};
use crate::endpoint::{BoundEndpoint, EndpointSpec, FreeEndpoint};
use crate::errors::{EditError, RouteError};
use crate::geometry::dedup_points;
use crate::log::debug;
use crate::route::route;
use crate::types::{Axis, Heading, Point, Rect};

/// Working state between applying an intent and splicing.
///
/// Gap `k` runs from anchor `k` to anchor `k + 1`, where the anchors are the
/// start, each pin, and the end, in path order.
#[derive(Debug, Clone)]
pub struct Draft {
    pub points: Vec<Point>,
    pub pins: Vec<FixedSegment>,
    pub start: Point,
    pub end: Point,
    /// End whose position the user is dragging
    pub dragged: Option<ArrowEnd>,
    /// Gaps that must be routed again rather than kept
    pub dirty: Vec<bool>,
}

impl Draft {
    /// # Panics
    ///
    /// If `points` is empty.
    pub fn new(points: Vec<Point>, pins: Vec<FixedSegment>) -> Self {
        let start = points[0];
        let end = points[points.len() - 1];
        let dirty = vec![false; pins.len() + 1];
        Self { points, pins, start, end, dragged: None, dirty }
    }

    pub fn gap_count(&self) -> usize {
        self.pins.len() + 1
    }

    /// Recompute the gap flags after the pin list changed, all clean
    pub fn reset_gaps(&mut self) {
        self.dirty = vec![false; self.gap_count()];
    }

    /// Where gap `k` starts and ends
    pub fn gap_ends(&self, k: usize) -> (Point, Point) {
        let a = if k == 0 { self.start } else { self.pins[k - 1].end() };
        let b = if k == self.pins.len() { self.end } else { self.pins[k].start() };
        (a, b)
    }

    /// The current points of gap `k`, anchors included
    pub fn gap_points(&self, k: usize) -> &[Point] {
        let lo = if k == 0 { 0 } else { self.pins[k - 1].index() + 1 };
        let hi = if k == self.pins.len() { self.points.len() - 1 } else { self.pins[k].index() };
        &self.points[lo..=hi]
    }
}

/// Whether `p` sits on the outline of `rect`
pub fn on_boundary(p: Point, rect: &Rect, eps: f64) -> bool {
    rect.inflate(eps).contains(p) && !rect.contains_strict(p, eps)
}

/// Endpoint spec for one end of the arrow at `position`.
///
/// A bound end keeps its attachment point when it still lies on the shape,
/// or always when the user is dragging it; otherwise the side facing the
/// other end is chosen afresh.
pub fn end_spec(which: ArrowEnd, position: Point, dragged: bool, ctx: &EditContext) -> EndpointSpec {
    let arrowhead = ctx.arrowhead(which);
    match ctx.binding(which) {
        Some(rect) => {
            let bound = BoundEndpoint::new(rect).with_arrowhead(arrowhead);
            if dragged || on_boundary(position, &rect, ctx.options.epsilon) {
                bound.with_anchor(position).into()
            } else {
                bound.into()
            }
        }
        None => FreeEndpoint::new(position).with_arrowhead(arrowhead).into(),
    }
}

/// A gap end sitting on a pin: leave across the pin's axis, toward `toward`.
fn pin_spec(at: Point, pin_axis: Axis, toward: Point, eps: f64) -> EndpointSpec {
    let across = pin_axis.perpendicular();
    let d = toward.along(across) - at.along(across);
    let free = FreeEndpoint::new(at);
    if d.abs() <= eps {
        return free.into();
    }
    let heading = if d > 0.0 { Heading::positive(across) } else { Heading::positive(across).reverse() };
    free.with_heading(heading).into()
}

/// Route every dirty gap (and any gap whose bound end slipped off its
/// shape); keep the rest as they are. One point list per gap.
pub fn reroute_gaps(draft: &Draft, ctx: &EditContext) -> Result<Vec<Vec<Point>>, EditError> {
    let eps = ctx.options.epsilon;
    let last = draft.gap_count() - 1;
    let obstacles = ctx.avoided();
    let mut sections = Vec::with_capacity(draft.gap_count());

    for k in 0..=last {
        let (a, b) = draft.gap_ends(k);
        let slipped = (k == 0 && ctx.start.is_some_and(|r| !on_boundary(a, &r, eps)))
            || (k == last && ctx.end.is_some_and(|r| !on_boundary(b, &r, eps)));
        if !draft.dirty[k] && !slipped {
            sections.push(draft.gap_points(k).to_vec());
            continue;
        }

        let from = if k == 0 {
            end_spec(ArrowEnd::Start, a, draft.dragged == Some(ArrowEnd::Start), ctx)
        } else {
            pin_spec(a, draft.pins[k - 1].axis(), b, eps)
        };
        let to = if k == last {
            end_spec(ArrowEnd::End, b, draft.dragged == Some(ArrowEnd::End), ctx)
        } else {
            pin_spec(b, draft.pins[k].axis(), a, eps)
        };

        debug!(gap = k, %a, %b, "rerouting gap");
        match route(&from, &to, &obstacles, &ctx.options) {
            Ok(res) => sections.push(res.into_points()),
            Err(RouteError::CoincidentEndpoints { .. }) => sections.push(vec![a]),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(sections)
}

/// Join the gap sections; consecutive sections meet across a pinned segment.
pub fn splice(sections: &[Vec<Point>], eps: f64) -> Vec<Point> {
    let joined: Vec<Point> = sections.iter().flatten().copied().collect();
    dedup_points(&joined, eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn draft() -> Draft {
        let pts = vec![p(0.0, 0.0), p(50.0, 0.0), p(50.0, 50.0), p(100.0, 50.0), p(100.0, 100.0), p(150.0, 100.0)];
        let pin = FixedSegment::new(1, p(50.0, 0.0), p(50.0, 50.0)).unwrap();
        Draft::new(pts, vec![pin])
    }

    #[test]
    fn gaps_are_cut_at_pins() {
        let d = draft();
        assert_eq!(d.gap_count(), 2);
        assert_eq!(d.gap_points(0), &[p(0.0, 0.0), p(50.0, 0.0)]);
        assert_eq!(d.gap_points(1), &[p(50.0, 50.0), p(100.0, 50.0), p(100.0, 100.0), p(150.0, 100.0)]);
        assert_eq!(d.gap_ends(1), (p(50.0, 50.0), p(150.0, 100.0)));
    }

    #[test]
    fn clean_gaps_splice_back_unchanged() {
        let d = draft();
        let sections = reroute_gaps(&d, &EditContext::default()).unwrap();
        assert_eq!(splice(&sections, EPS), d.points);
    }

    #[test]
    fn dirty_gap_is_routed_across_the_pin() {
        let mut d = draft();
        d.end = p(200.0, 80.0);
        d.dirty[1] = true;
        let sections = reroute_gaps(&d, &EditContext::default()).unwrap();
        // leaves the pin sideways toward the new end
        assert_eq!(sections[1], vec![p(50.0, 50.0), p(200.0, 50.0), p(200.0, 80.0)]);
    }

    #[test]
    fn pin_spec_points_toward_the_other_end() {
        let spec = pin_spec(p(50.0, 50.0), Axis::Vertical, p(0.0, 90.0), EPS);
        assert!(matches!(spec, EndpointSpec::Free(f) if f.heading == Some(Heading::Left)));
        let spec = pin_spec(p(50.0, 50.0), Axis::Vertical, p(50.0, 90.0), EPS);
        assert!(matches!(spec, EndpointSpec::Free(f) if f.heading.is_none()));
    }

    #[test]
    fn boundary_test() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(on_boundary(p(10.0, 5.0), &r, EPS));
        assert!(!on_boundary(p(5.0, 5.0), &r, EPS));
        assert!(!on_boundary(p(12.0, 5.0), &r, EPS));
    }
}
