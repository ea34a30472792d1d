//! Keeping pins attached to the right segments across edits.
//!
//! Pins are matched by coordinates, not trusted by index: an index is only
//! a hint for which segment to prefer when several lie on the same line.

use super::fixed_segment::FixedSegment;
use crate::geometry::{axis_aligned_for_segment, points_close};
use crate::log::debug;
use crate::types::Point;

/// Pins on segments `1..=len - 3`; the segments touching an endpoint are never pinned.
fn pinnable(index: usize, len: usize) -> bool {
    index >= 1 && index + 2 < len
}

fn sort_unique(mut pins: Vec<FixedSegment>) -> Vec<FixedSegment> {
    pins.sort_by_key(FixedSegment::index);
    pins.dedup_by_key(|p| p.index());
    pins
}

/// Drop pins that cannot describe a segment of `points`: out-of-range
/// indices, segments touching an endpoint, zero-length or diagonal geometry.
pub fn sanitize(pins: &[FixedSegment], points: &[Point], eps: f64) -> Vec<FixedSegment> {
    let kept = pins
        .iter()
        .copied()
        .filter(|pin| {
            let ok = pinnable(pin.index(), points.len())
                && !points_close(pin.start(), pin.end(), eps)
                && axis_aligned_for_segment(pin.start(), pin.end(), eps).is_some();
            if !ok {
                debug!(index = pin.index(), "dropping invalid fixed segment");
            }
            ok
        })
        .collect();
    sort_unique(kept)
}

/// Whether segment `a`-`b` runs on the pin's line and overlaps its span
fn on_pin_line(pin: &FixedSegment, a: Point, b: Point, eps: f64) -> bool {
    let axis = pin.axis();
    if axis_aligned_for_segment(a, b, eps) != Some(axis) {
        return false;
    }
    let across = axis.perpendicular();
    if (a.along(across) - pin.offset()).abs() > eps {
        return false;
    }
    let (lo, hi) = span(a.along(axis), b.along(axis));
    let (plo, phi) = span(pin.start().along(axis), pin.end().along(axis));
    lo < phi - eps && plo < hi - eps
}

fn span(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Re-anchor each pin onto the segment of `points` it belongs to.
///
/// A pin keeps its index when that segment still matches; otherwise the
/// nearest segment on the same line is used. The pin then takes that
/// segment's exact endpoints. Pins with no matching segment are dropped.
pub fn reindex(pins: &[FixedSegment], points: &[Point], eps: f64) -> Vec<FixedSegment> {
    let n = points.len();
    let mut out = Vec::with_capacity(pins.len());
    for pin in pins {
        let at = |j: usize| on_pin_line(pin, points[j], points[j + 1], eps);
        let found = if pinnable(pin.index(), n) && at(pin.index()) {
            Some(pin.index())
        } else {
            (1..n.saturating_sub(2)).filter(|&j| at(j)).min_by_key(|&j| j.abs_diff(pin.index()))
        };
        match found.and_then(|j| FixedSegment::new(j, points[j], points[j + 1]).ok()) {
            Some(moved) => out.push(moved),
            None => {
                debug!(index = pin.index(), "fixed segment lost its segment");
            }
        }
    }
    sort_unique(out)
}

/// Index of each pin in the final point list; pins whose exact segment is gone are dropped.
pub fn relocate(pins: &[FixedSegment], points: &[Point], eps: f64) -> Vec<FixedSegment> {
    let n = points.len();
    let found = pins.iter().filter_map(|pin| {
        (1..n.saturating_sub(2))
            .filter(|&j| pin.matches(points[j], points[j + 1], eps))
            .min_by_key(|&j| j.abs_diff(pin.index()))
            .map(|j| pin.with_index(j))
    });
    sort_unique(found.collect())
}

/// Move segment `index` across its axis so it passes through `to`, and pin it.
///
/// Neighbouring pins follow the move. A pin whose segment collapses is
/// released, and so is the dragged segment when it lands back in line with
/// its neighbours. Returns `false` when the segment cannot be dragged.
pub fn drag_segment(points: &mut [Point], pins: &mut Vec<FixedSegment>, index: usize, to: Point, eps: f64) -> bool {
    if !pinnable(index, points.len()) {
        debug!(index, "segment touches an endpoint, not draggable");
        return false;
    }
    let Some(axis) = axis_aligned_for_segment(points[index], points[index + 1], eps) else {
        return false;
    };
    let across = axis.perpendicular();
    let value = to.along(across);
    points[index] = points[index].with_along(across, value);
    points[index + 1] = points[index + 1].with_along(across, value);

    let collapsed = |j: usize| points_close(points[j], points[j + 1], eps);
    let was_pinned: Vec<usize> = pins.iter().map(FixedSegment::index).collect();
    pins.retain(|p| !(index - 1..=index + 1).contains(&p.index()));
    for k in [index - 1, index, index + 1] {
        let wanted = if k == index {
            !collapsed(index - 1) && !collapsed(index + 1)
        } else {
            was_pinned.contains(&k) && !collapsed(k)
        };
        if let Some(pin) = wanted.then(|| FixedSegment::new(k, points[k], points[k + 1]).ok()).flatten() {
            pins.push(pin);
        }
    }
    pins.sort_by_key(FixedSegment::index);
    true
}

/// Remove the pin on segment `index`; the position it held in the pin list
pub fn release(pins: &mut Vec<FixedSegment>, index: usize) -> Option<usize> {
    let at = pins.iter().position(|p| p.index() == index)?;
    pins.remove(at);
    Some(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn pin(index: usize, a: Point, b: Point) -> FixedSegment {
        FixedSegment::new(index, a, b).unwrap()
    }

    fn staircase() -> Vec<Point> {
        vec![p(0.0, 0.0), p(50.0, 0.0), p(50.0, 50.0), p(100.0, 50.0), p(100.0, 100.0), p(150.0, 100.0)]
    }

    #[test]
    fn sanitize_drops_out_of_range_and_end_segments() {
        let pts = staircase();
        let pins = [
            pin(0, p(0.0, 0.0), p(50.0, 0.0)),
            pin(1, p(50.0, 0.0), p(50.0, 50.0)),
            pin(4, p(100.0, 100.0), p(150.0, 100.0)),
            pin(9, p(0.0, 0.0), p(0.0, 9.0)),
        ];
        let kept = sanitize(&pins, &pts, EPS);
        assert_eq!(kept.iter().map(FixedSegment::index).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn reindex_follows_coordinates() {
        // a point was inserted before the pinned segment
        let pts = vec![p(0.0, 0.0), p(20.0, 0.0), p(20.0, 10.0), p(50.0, 10.0), p(50.0, 60.0), p(100.0, 60.0)];
        let stale = pin(1, p(50.0, 0.0), p(50.0, 50.0));
        let out = reindex(&[stale], &pts, EPS);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].index(), 3);
        assert_eq!(out[0].start(), p(50.0, 10.0));
        assert_eq!(out[0].end(), p(50.0, 60.0));
    }

    #[test]
    fn reindex_drops_pins_with_no_segment() {
        let stale = pin(2, p(70.0, 0.0), p(70.0, 40.0));
        assert!(reindex(&[stale], &staircase(), EPS).is_empty());
    }

    #[test]
    fn relocate_finds_exact_segment() {
        let pts = staircase();
        let moved = pin(3, p(50.0, 0.0), p(50.0, 50.0));
        assert_eq!(relocate(&[moved], &pts, EPS)[0].index(), 1);
    }

    #[test]
    fn relocate_drops_pins_with_no_segment() {
        let lost = pin(2, p(70.0, 0.0), p(70.0, 40.0));
        assert!(relocate(&[lost], &staircase(), EPS).is_empty());
    }

    #[test]
    fn drag_moves_and_pins() {
        let mut pts = staircase();
        let mut pins = Vec::new();
        assert!(drag_segment(&mut pts, &mut pins, 2, p(75.0, 30.0), EPS));
        assert_eq!(pts[2], p(50.0, 30.0));
        assert_eq!(pts[3], p(100.0, 30.0));
        assert_eq!(pins, vec![pin(2, p(50.0, 30.0), p(100.0, 30.0))]);
    }

    #[test]
    fn neighbouring_pins_follow() {
        let mut pts = staircase();
        let mut pins = vec![pin(1, p(50.0, 0.0), p(50.0, 50.0))];
        assert!(drag_segment(&mut pts, &mut pins, 2, p(75.0, 80.0), EPS));
        assert_eq!(pins, vec![pin(1, p(50.0, 0.0), p(50.0, 80.0)), pin(2, p(50.0, 80.0), p(100.0, 80.0))]);
    }

    #[test]
    fn drag_back_in_line_releases() {
        let mut pts = staircase();
        let mut pins = vec![pin(2, p(50.0, 50.0), p(100.0, 50.0))];
        // y = 0 collapses the vertical segment before it
        assert!(drag_segment(&mut pts, &mut pins, 2, p(75.0, 0.0), EPS));
        assert!(pins.is_empty());
    }

    #[test]
    fn dragging_an_end_segment_is_ignored() {
        let mut pts = staircase();
        let mut pins = Vec::new();
        assert!(!drag_segment(&mut pts, &mut pins, 0, p(10.0, 10.0), EPS));
        assert_eq!(pts, staircase());
    }

    #[test]
    fn release_reports_position() {
        let mut pins = vec![pin(1, p(50.0, 0.0), p(50.0, 50.0)), pin(3, p(100.0, 50.0), p(100.0, 100.0))];
        assert_eq!(release(&mut pins, 3), Some(1));
        assert_eq!(release(&mut pins, 3), None);
        assert_eq!(pins.len(), 1);
    }
}
