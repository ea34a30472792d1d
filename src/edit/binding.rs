//! Keeping bound ends perpendicular to their shapes after an edit.

use super::EditContext;
use super::gaps::on_boundary;
use crate::geometry::{heading_for_segment, simplify_path};
use crate::log::debug;
use crate::obstacles::{EndLayout, ObstacleLayout, nearest_edge};
use crate::route::harmonize_shafts;
use crate::types::{Point, Rect};

/// Whether the segment `p`-`next` leaves `rect` through the edge it faces.
/// A point on a corner belongs to both edges.
fn leaves_through_edge(p: Point, next: Point, rect: &Rect, eps: f64) -> bool {
    let h = heading_for_segment(p, next);
    (p.along(h.axis()) - rect.edge(h)).abs() <= eps
}

/// Points to insert after `p` so the path leaves `rect` straight out of its
/// nearest edge, then rejoins at `next`.
fn perpendicular_stub(p: Point, next: Point, rect: &Rect, length: f64) -> [Point; 2] {
    let side = nearest_edge(p, rect);
    let across = side.axis().perpendicular();
    let out = p.translate(side, length);
    [out, out.with_along(across, next.along(across))]
}

/// Force the first and last segments to leave their bound shapes at a right angle.
///
/// A wrong exit gets a short stub out of the nearest edge plus a corner back
/// to the old path; `pinned` points survive the cleanup.
pub fn enforce_perpendicular(points: Vec<Point>, pinned: &[Point], ctx: &EditContext) -> Vec<Point> {
    let eps = ctx.options.epsilon;
    let length = ctx.options.padding;
    let mut points = points;
    if points.len() < 2 {
        return points;
    }

    if let Some(rect) = ctx.start {
        let (p, next) = (points[0], points[1]);
        if !leaves_through_edge(p, next, &rect, eps) {
            debug!(%p, "start leaves its shape at an angle, adding a stub");
            let stub = perpendicular_stub(p, next, &rect, length);
            points.splice(1..1, stub);
        }
    }
    if let Some(rect) = ctx.end {
        let n = points.len();
        let (p, prev) = (points[n - 1], points[n - 2]);
        if !leaves_through_edge(p, prev, &rect, eps) {
            debug!(%p, "end leaves its shape at an angle, adding a stub");
            let [out, corner] = perpendicular_stub(p, prev, &rect, length);
            points.splice(n - 1..n - 1, [corner, out]);
        }
    }
    simplify_path(&points, pinned, eps)
}

/// Re-balance the shafts next to bound ends; segments in `locked` stay put.
pub fn harmonize_bindings(points: Vec<Point>, locked: &[usize], ctx: &EditContext) -> Vec<Point> {
    let n = points.len();
    if n < 4 || (ctx.start.is_none() && ctx.end.is_none()) {
        return points;
    }
    let end_layout = |point: Point, next: Point, element: Option<Rect>, arrowhead: bool| EndLayout {
        point,
        heading: element.map(|_| heading_for_segment(point, next)),
        dongle: point,
        zone: None,
        element,
        arrowhead,
    };
    let layout = ObstacleLayout {
        start: end_layout(points[0], points[1], ctx.start, ctx.start_arrowhead),
        end: end_layout(points[n - 1], points[n - 2], ctx.end, ctx.end_arrowhead),
    };
    let zones: Vec<Rect> = ctx.obstacles.iter().map(|r| r.inflate(ctx.options.obstacle_padding)).collect();
    harmonize_shafts(points, &layout, &zones, locked, &ctx.options)
}

/// Bound ends sit on their shapes, leave them at a right angle, and the path
/// never cuts through either shape.
pub fn bindings_respected(points: &[Point], ctx: &EditContext) -> bool {
    let eps = ctx.options.epsilon;
    let n = points.len();
    if n < 2 {
        return false;
    }
    let end_ok = |rect: Option<Rect>, p: Point, next: Point| {
        rect.is_none_or(|r| on_boundary(p, &r, eps) && leaves_through_edge(p, next, &r, eps))
    };
    let clear =
        |rect: Option<Rect>| rect.is_none_or(|r| points.windows(2).all(|w| !r.segment_crosses(w[0], w[1], eps)));
    end_ok(ctx.start, points[0], points[1])
        && end_ok(ctx.end, points[n - 1], points[n - 2])
        && clear(ctx.start)
        && clear(ctx.end)
}
