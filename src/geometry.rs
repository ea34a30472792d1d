//! Geometry helpers: heading classification, axis tests, and path maintenance
//!
//! Every function here is pure. Paths are plain point slices; the
//! maintenance helpers return fresh vectors rather than editing in place.

use glam::DVec2;

use crate::types::{Axis, Heading, Point, Rect};

// ============================================================================
// Headings and axes
// ============================================================================

/// Classify a vector into the cardinal heading of its dominant axis.
///
/// Equal magnitudes resolve to the horizontal heading. The zero vector has
/// no meaningful heading; callers must not rely on the value returned for it.
pub fn heading_for_vector(v: DVec2) -> Heading {
    if v.x.abs() >= v.y.abs() {
        if v.x >= 0.0 { Heading::Right } else { Heading::Left }
    } else if v.y > 0.0 {
        Heading::Down
    } else {
        Heading::Up
    }
}

/// Heading of travel from `a` to `b`
#[inline]
pub fn heading_for_segment(a: Point, b: Point) -> Heading {
    heading_for_vector(b - a)
}

/// Axis of a segment: horizontal when `|dy| <= eps`, vertical when `|dx| <= eps`,
/// otherwise the axis of greater displacement.
pub fn axis_for_segment(a: Point, b: Point, eps: f64) -> Axis {
    let d = b - a;
    if d.y.abs() <= eps {
        Axis::Horizontal
    } else if d.x.abs() <= eps || d.y.abs() > d.x.abs() {
        Axis::Vertical
    } else {
        Axis::Horizontal
    }
}

/// Like [`axis_for_segment`] but `None` for a true diagonal
pub fn axis_aligned_for_segment(a: Point, b: Point, eps: f64) -> Option<Axis> {
    let d = b - a;
    if d.y.abs() <= eps {
        Some(Axis::Horizontal)
    } else if d.x.abs() <= eps {
        Some(Axis::Vertical)
    } else {
        None
    }
}

/// Which edge of `rect` a point faces, normalized for the rect's aspect ratio.
///
/// Points are compared against the rect's diagonals so a wide rect still
/// reports `Up`/`Down` for points above or below its long edges.
pub fn heading_for_point_on_rect(p: Point, rect: &Rect) -> Heading {
    let c = rect.center();
    let half_w = (rect.width() / 2.0).max(f64::EPSILON);
    let half_h = (rect.height() / 2.0).max(f64::EPSILON);
    let d = p - c;
    heading_for_vector(DVec2::new(d.x / half_w, d.y / half_h))
}

// ============================================================================
// Tolerance tests
// ============================================================================

#[inline]
pub fn points_close(a: Point, b: Point, eps: f64) -> bool {
    a.distance(b) <= eps
}

/// Whether `b` lies within `eps` of the line through `a` and `c`.
///
/// The cross product is divided by `|c - a|`, which turns it into the
/// perpendicular distance of `b` from the line.
pub fn segments_collinear(a: Point, b: Point, c: Point, eps: f64) -> bool {
    let ac = c - a;
    let len = ac.length();
    if len <= eps {
        return points_close(a, b, eps);
    }
    (ac.perp_dot(b - a) / len).abs() <= eps
}

pub fn has_diagonal_segments(points: &[Point], eps: f64) -> bool {
    points.windows(2).any(|w| axis_aligned_for_segment(w[0], w[1], eps).is_none())
}

/// The invariant every emitted path satisfies: at least two points, every
/// segment axis-aligned and longer than `eps`.
pub fn is_orthogonal_path(points: &[Point], eps: f64) -> bool {
    points.len() >= 2
        && points.iter().all(|p| p.is_finite())
        && points
            .windows(2)
            .all(|w| !points_close(w[0], w[1], eps) && axis_aligned_for_segment(w[0], w[1], eps).is_some())
}

fn is_pinned(p: Point, pinned: &[Point], eps: f64) -> bool {
    pinned.iter().any(|q| points_close(p, *q, eps))
}

// ============================================================================
// Path maintenance
// ============================================================================

/// Drop consecutive points closer than `eps`, keeping the later copy of a
/// pinned point when only one of the pair is pinned.
pub fn dedup_points(points: &[Point], eps: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(&last) if points_close(last, p, eps) => {}
            _ => out.push(p),
        }
    }
    // the path must still end exactly where it ended
    if let (Some(last_out), Some(&last_in)) = (out.last_mut(), points.last()) {
        *last_out = last_in;
    }
    out
}

/// Remove redundant collinear interior points.
///
/// Points listed in `pinned` (matched by coordinate) are never removed, and
/// the result keeps at least two points whenever the input had two distinct ones.
pub fn simplify_path(points: &[Point], pinned: &[Point], eps: f64) -> Vec<Point> {
    let mut out = dedup_points(points, eps);
    loop {
        let mut changed = false;
        let mut i = 1;
        while out.len() > 2 && i + 1 < out.len() {
            if !is_pinned(out[i], pinned, eps) && segments_collinear(out[i - 1], out[i], out[i + 1], eps) {
                out.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
        if !changed {
            break;
        }
        out = dedup_points(&out, eps);
    }
    out
}

/// Keep only the endpoints and the points where the path turns.
pub fn corner_points(points: &[Point], eps: f64) -> Vec<Point> {
    simplify_path(points, &[], eps)
}

/// Collapse interior jogs shorter than `min_length`.
///
/// A short segment is removed by sliding the run after it (or before it,
/// when the run after ends on an endpoint) across by the jog's length.
/// Endpoints and pinned points never move, so a jog that can only be
/// removed by moving one of them is kept.
pub fn remove_short_segments(points: &[Point], min_length: f64, pinned: &[Point], eps: f64) -> Vec<Point> {
    let mut pts = simplify_path(points, pinned, eps);
    let mut k = 1;
    while pts.len() >= 4 && k + 2 < pts.len() {
        let (a, b) = (pts[k], pts[k + 1]);
        let len = a.distance(b);
        let Some(axis) = axis_aligned_for_segment(a, b, eps) else {
            k += 1;
            continue;
        };
        if len >= min_length {
            k += 1;
            continue;
        }
        let last = pts.len() - 1;
        let forward_free = k + 2 < last && !is_pinned(pts[k + 1], pinned, eps) && !is_pinned(pts[k + 2], pinned, eps);
        let backward_free = k >= 2 && !is_pinned(pts[k], pinned, eps) && !is_pinned(pts[k - 1], pinned, eps);
        if forward_free {
            let target = a.along(axis);
            pts[k + 1] = pts[k + 1].with_along(axis, target);
            pts[k + 2] = pts[k + 2].with_along(axis, target);
        } else if backward_free {
            let target = b.along(axis);
            pts[k] = pts[k].with_along(axis, target);
            pts[k - 1] = pts[k - 1].with_along(axis, target);
        } else {
            k += 1;
            continue;
        }
        pts = simplify_path(&pts, pinned, eps);
        k = 1;
    }
    pts
}

/// Points needed to join `from` to `to` with axis-aligned segments, excluding
/// `from` itself. The first leg runs along `first_axis` when a corner is needed.
pub fn connect_orthogonally(from: Point, to: Point, first_axis: Axis, eps: f64) -> Vec<Point> {
    if axis_aligned_for_segment(from, to, eps).is_some() {
        return vec![to];
    }
    let corner = match first_axis {
        Axis::Horizontal => Point::new(to.x, from.y),
        Axis::Vertical => Point::new(from.x, to.y),
    };
    vec![corner, to]
}

/// Replace every diagonal segment with an L-shaped pair of axis-aligned ones.
pub fn orthogonalize(points: &[Point], eps: f64) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut out = vec![first];
    for w in points.windows(2) {
        let axis = match out.len() {
            // keep turning: the new leg runs across the previous segment
            n if n >= 2 => axis_for_segment(out[n - 2], out[n - 1], eps).perpendicular(),
            _ => axis_for_segment(w[0], w[1], eps),
        };
        out.extend(connect_orthogonally(w[0], w[1], axis, eps));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    const EPS: f64 = 1e-6;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    // ==================== heading tests ====================

    #[test]
    fn heading_for_vector_picks_dominant_axis() {
        assert_eq!(heading_for_vector(dvec2(5.0, 1.0)), Heading::Right);
        assert_eq!(heading_for_vector(dvec2(-5.0, 1.0)), Heading::Left);
        assert_eq!(heading_for_vector(dvec2(1.0, 5.0)), Heading::Down);
        assert_eq!(heading_for_vector(dvec2(1.0, -5.0)), Heading::Up);
    }

    #[test]
    fn heading_for_vector_ties_are_horizontal() {
        assert_eq!(heading_for_vector(dvec2(3.0, 3.0)), Heading::Right);
        assert_eq!(heading_for_vector(dvec2(-3.0, -3.0)), Heading::Left);
    }

    #[test]
    fn heading_for_point_on_wide_rect_uses_aspect() {
        let r = Rect::new(0.0, 0.0, 200.0, 20.0);
        // far right along x but still above the top edge's diagonal region
        assert_eq!(heading_for_point_on_rect(p(150.0, -30.0), &r), Heading::Up);
        assert_eq!(heading_for_point_on_rect(p(250.0, 10.0), &r), Heading::Right);
        assert_eq!(heading_for_point_on_rect(p(100.0, 40.0), &r), Heading::Down);
        assert_eq!(heading_for_point_on_rect(p(-10.0, 12.0), &r), Heading::Left);
    }

    #[test]
    fn axis_detection() {
        assert_eq!(axis_for_segment(p(0.0, 0.0), p(10.0, 0.0), EPS), Axis::Horizontal);
        assert_eq!(axis_for_segment(p(0.0, 0.0), p(0.0, 10.0), EPS), Axis::Vertical);
        assert_eq!(axis_for_segment(p(0.0, 0.0), p(10.0, 3.0), EPS), Axis::Horizontal);
        assert_eq!(axis_for_segment(p(0.0, 0.0), p(3.0, 10.0), EPS), Axis::Vertical);
        assert_eq!(axis_aligned_for_segment(p(0.0, 0.0), p(3.0, 10.0), EPS), None);
        assert_eq!(axis_aligned_for_segment(p(0.0, 0.0), p(0.0, 10.0), EPS), Some(Axis::Vertical));
    }

    // ==================== tolerance tests ====================

    #[test]
    fn collinearity_is_a_distance_tolerance() {
        // 0.5 units off a 1000-unit line: collinear at eps 1, not at eps 0.1
        let (a, b, c) = (p(0.0, 0.0), p(500.0, 0.5), p(1000.0, 0.0));
        assert!(segments_collinear(a, b, c, 1.0));
        assert!(!segments_collinear(a, b, c, 0.1));
    }

    #[test]
    fn collinear_spike_counts_as_collinear() {
        assert!(segments_collinear(p(0.0, 0.0), p(20.0, 0.0), p(10.0, 0.0), EPS));
    }

    #[test]
    fn orthogonal_path_check() {
        assert!(is_orthogonal_path(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 5.0)], EPS));
        assert!(!is_orthogonal_path(&[p(0.0, 0.0), p(10.0, 5.0)], EPS));
        assert!(!is_orthogonal_path(&[p(0.0, 0.0), p(0.0, 0.0), p(10.0, 0.0)], EPS));
        assert!(!is_orthogonal_path(&[p(0.0, 0.0)], EPS));
        assert!(has_diagonal_segments(&[p(0.0, 0.0), p(10.0, 5.0)], EPS));
    }

    // ==================== simplification tests ====================

    #[test]
    fn simplify_removes_collinear_points() {
        let pts = [p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        assert_eq!(simplify_path(&pts, &[], EPS), vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]);
    }

    #[test]
    fn simplify_keeps_pinned_points() {
        let pts = [p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        let out = simplify_path(&pts, &[p(5.0, 0.0)], EPS);
        assert_eq!(out, vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]);
    }

    #[test]
    fn simplify_never_goes_below_two_points() {
        let pts = [p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0)];
        assert_eq!(simplify_path(&pts, &[], EPS), vec![p(0.0, 0.0), p(10.0, 0.0)]);
    }

    #[test]
    fn dedup_keeps_exact_last_point() {
        let pts = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0000001)];
        let out = dedup_points(&pts, EPS);
        assert_eq!(out, vec![p(0.0, 0.0), p(10.0, 0.0000001)]);
    }

    #[test]
    fn corner_points_of_staircase() {
        let pts = [p(0.0, 0.0), p(3.0, 0.0), p(6.0, 0.0), p(6.0, 4.0), p(6.0, 8.0), p(9.0, 8.0)];
        assert_eq!(corner_points(&pts, EPS), vec![p(0.0, 0.0), p(6.0, 0.0), p(6.0, 8.0), p(9.0, 8.0)]);
    }

    #[test]
    fn remove_short_segments_slides_following_run() {
        // tiny 0.5 jog at x=50 between two horizontal runs
        let pts = [p(0.0, 0.0), p(0.0, 10.0), p(50.0, 10.0), p(50.0, 10.5), p(100.0, 10.5), p(100.0, 40.0)];
        let out = remove_short_segments(&pts, 1.0, &[], EPS);
        assert_eq!(out, vec![p(0.0, 0.0), p(0.0, 10.0), p(100.0, 10.0), p(100.0, 40.0)]);
        assert!(is_orthogonal_path(&out, EPS));
    }

    #[test]
    fn remove_short_segments_keeps_structural_jog() {
        // the only way to remove this jog would move an endpoint
        let pts = [p(0.0, 0.0), p(50.0, 0.0), p(50.0, 0.5), p(100.0, 0.5)];
        let out = remove_short_segments(&pts, 1.0, &[], EPS);
        assert_eq!(out, pts.to_vec());
    }

    #[test]
    fn orthogonalize_inserts_corners() {
        let pts = [p(0.0, 0.0), p(10.0, 10.0)];
        let out = orthogonalize(&pts, EPS);
        assert!(is_orthogonal_path(&out, EPS));
        assert_eq!(out.first(), Some(&p(0.0, 0.0)));
        assert_eq!(out.last(), Some(&p(10.0, 10.0)));
    }
}
