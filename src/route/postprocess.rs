//! Cleanup applied to a raw grid path before it is returned.

use crate::geometry::{
    axis_aligned_for_segment, heading_for_segment, is_orthogonal_path, remove_short_segments, simplify_path,
};
use crate::log::debug;
use crate::obstacles::{EndLayout, ObstacleLayout};
use crate::options::RoutingOptions;
use crate::spacing::{apply_spacing_to_segment, balanced_spacing, resolve_spacing_for_segment};
use crate::types::{Heading, Point, Rect};

/// Attach the exit points to the dongle-to-dongle search path, simplify,
/// drop tiny jogs and balance the shafts next to bound ends.
pub fn finish_path(raw: &[Point], layout: &ObstacleLayout, obstacles: &[Rect], options: &RoutingOptions) -> Vec<Point> {
    let eps = options.epsilon;
    let mut points = Vec::with_capacity(raw.len() + 2);
    points.push(layout.start.point);
    points.extend_from_slice(raw);
    points.push(layout.end.point);

    let points = simplify_path(&points, &[], eps);
    let points = remove_short_segments(&points, options.dedup_threshold, &[], eps);
    let points = harmonize_shafts(points, layout, obstacles, &[], options);
    simplify_path(&points, &[], eps)
}

/// The first segment perpendicular to a bound end's exit heading
#[derive(Debug, Clone, Copy)]
struct Shaft {
    index: usize,
    heading: Heading,
    element: Rect,
    floor: f64,
}

impl Shaft {
    fn gap(&self, points: &[Point]) -> f64 {
        resolve_spacing_for_segment([points[self.index], points[self.index + 1]], &self.element, self.heading)
    }
}

/// Locate the shaft next to `end`: the neighbour of the exit segment on the
/// interior side. A shaft that is locked, or next to a locked segment, stays put.
fn find_shaft(
    points: &[Point],
    end: &EndLayout,
    at_start: bool,
    locked: &[usize],
    options: &RoutingOptions,
) -> Option<Shaft> {
    let eps = options.epsilon;
    let n = points.len();
    if n < 4 {
        return None;
    }
    let (heading, element) = (end.heading?, end.element?);
    let (exit, index) = if at_start { (0, 1) } else { (n - 2, n - 3) };
    if locked.iter().any(|&k| k + 1 >= index && k <= index + 1) {
        return None;
    }
    if axis_aligned_for_segment(points[exit], points[exit + 1], eps) != Some(heading.axis()) {
        return None;
    }
    let shaft = Shaft { index, heading, element, floor: options.min_binding_spacing(end.arrowhead) };
    (shaft.gap(points) > eps).then_some(shaft)
}

/// Equalize the element-to-shaft gaps at both ends.
///
/// Distinct shafts move to the smaller of the two gaps, raised to each end's
/// floor. A single shaft shared by two ends facing each other is centred. A
/// move is rejected if it would reverse or collapse a neighbouring segment
/// or push a segment through an obstacle or either element. Segment indices
/// in `locked` never move.
pub fn harmonize_shafts(
    points: Vec<Point>,
    layout: &ObstacleLayout,
    obstacles: &[Rect],
    locked: &[usize],
    options: &RoutingOptions,
) -> Vec<Point> {
    let start = find_shaft(&points, &layout.start, true, locked, options);
    let end = find_shaft(&points, &layout.end, false, locked, options);
    let mut blockers: Vec<Rect> = obstacles.to_vec();
    blockers.extend(layout.start.element);
    blockers.extend(layout.end.element);

    let mut points = points;
    match (start, end) {
        (Some(a), Some(b)) if a.index == b.index => {
            if a.heading == b.heading.reverse() {
                let target = (a.gap(&points) + b.gap(&points)) / 2.0;
                if target >= a.floor.max(b.floor) {
                    try_move(&mut points, a, target, &blockers, options.epsilon);
                }
            }
        }
        (a, b) => {
            let gaps = [a.map(|s| s.gap(&points)), b.map(|s| s.gap(&points))];
            let common = match gaps {
                [Some(x), Some(y)] => x.min(y),
                [Some(x), None] | [None, Some(x)] => x,
                [None, None] => return points,
            };
            for (shaft, gap) in [a, b].into_iter().zip(gaps) {
                let (Some(shaft), Some(gap)) = (shaft, gap) else { continue };
                let target = balanced_spacing(common, common, shaft.floor);
                if (target - gap).abs() > options.epsilon {
                    try_move(&mut points, shaft, target, &blockers, options.epsilon);
                }
            }
        }
    }
    points
}

fn try_move(points: &mut Vec<Point>, shaft: Shaft, target: f64, blockers: &[Rect], eps: f64) {
    let mut candidate = points.clone();
    apply_spacing_to_segment(&mut candidate, shaft.index, &shaft.element, shaft.heading, target);

    let i = shaft.index;
    let neighbours_kept = [i - 1, i + 1].into_iter().all(|k| {
        let before = heading_for_segment(points[k], points[k + 1]);
        let after = heading_for_segment(candidate[k], candidate[k + 1]);
        before == after
    });
    let clear =
        (i - 1..=i + 1).all(|k| !blockers.iter().any(|r| r.segment_crosses(candidate[k], candidate[k + 1], eps)));

    if neighbours_kept && clear && is_orthogonal_path(&candidate, eps) {
        *points = candidate;
    } else {
        debug!(index = i, target, "shaft move rejected");
    }
}
