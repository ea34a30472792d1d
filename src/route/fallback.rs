//! Fixed-shape path used when the grid search is skipped or fails.

use crate::geometry::simplify_path;
use crate::obstacles::EndLayout;
use crate::types::{Axis, Point};

/// Axis of greater separation between two points, horizontal on ties
fn dominant_axis(a: Point, b: Point) -> Axis {
    let d = b - a;
    if d.x.abs() >= d.y.abs() { Axis::Horizontal } else { Axis::Vertical }
}

/// Axes the path leaves the start dongle and enters the end dongle on.
///
/// An end with a heading uses that heading's axis. An end without one takes
/// the axis perpendicular to the other end, so two such ends meet in an L.
fn end_axes(start: &EndLayout, end: &EndLayout) -> (Axis, Axis) {
    let (s, e) = (start.dongle, end.dongle);
    match (start.heading.map(|h| h.axis()), end.heading.map(|h| h.axis())) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => (a, a.perpendicular()),
        (None, Some(b)) => (b.perpendicular(), b),
        (None, None) => {
            let a = dominant_axis(s, e);
            (a, a.perpendicular())
        }
    }
}

/// Join the two dongles with an L (different axes) or a Z through the
/// midline (same axis), then attach the exit points.
pub fn fallback_path(start: &EndLayout, end: &EndLayout, eps: f64) -> Vec<Point> {
    let (s, e) = (start.dongle, end.dongle);
    let core = match end_axes(start, end) {
        (Axis::Horizontal, Axis::Horizontal) => {
            let mx = (s.x + e.x) / 2.0;
            vec![Point::new(mx, s.y), Point::new(mx, e.y)]
        }
        (Axis::Vertical, Axis::Vertical) => {
            let my = (s.y + e.y) / 2.0;
            vec![Point::new(s.x, my), Point::new(e.x, my)]
        }
        (Axis::Horizontal, Axis::Vertical) => vec![Point::new(e.x, s.y)],
        (Axis::Vertical, Axis::Horizontal) => vec![Point::new(s.x, e.y)],
    };

    let mut points = Vec::with_capacity(core.len() + 4);
    points.extend([start.point, s]);
    points.extend(core);
    points.extend([e, end.point]);
    simplify_path(&points, &[], eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_orthogonal_path;
    use crate::types::Heading;

    const EPS: f64 = 1e-6;

    fn free(p: Point) -> EndLayout {
        EndLayout { point: p, heading: None, dongle: p, zone: None, element: None, arrowhead: false }
    }

    fn bound(point: Point, heading: Heading, gap: f64) -> EndLayout {
        EndLayout { dongle: point.translate(heading, gap), heading: Some(heading), ..free(point) }
    }

    #[test]
    fn free_ends_meet_in_an_l() {
        let out = fallback_path(&free(Point::new(0.0, 0.0)), &free(Point::new(100.0, 100.0)), EPS);
        assert_eq!(out, vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)]);
    }

    #[test]
    fn aligned_free_ends_are_straight() {
        let out = fallback_path(&free(Point::new(0.0, 0.0)), &free(Point::new(100.0, 0.0)), EPS);
        assert_eq!(out, vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    }

    #[test]
    fn facing_bound_ends_use_the_midline() {
        let start = bound(Point::new(100.0, 50.0), Heading::Right, 40.0);
        let end = bound(Point::new(400.0, 150.0), Heading::Left, 40.0);
        let out = fallback_path(&start, &end, EPS);
        assert_eq!(
            out,
            vec![Point::new(100.0, 50.0), Point::new(250.0, 50.0), Point::new(250.0, 150.0), Point::new(400.0, 150.0)]
        );
    }

    #[test]
    fn mixed_axes_turn_once_between_dongles() {
        let start = bound(Point::new(100.0, 50.0), Heading::Right, 20.0);
        let end = bound(Point::new(300.0, 200.0), Heading::Up, 20.0);
        let out = fallback_path(&start, &end, EPS);
        assert!(is_orthogonal_path(&out, EPS));
        assert_eq!(out, vec![Point::new(100.0, 50.0), Point::new(300.0, 50.0), Point::new(300.0, 200.0)]);
    }
}
