//! Spacing harmonization between a bound shape's edge and the arrow.
//!
//! A gap is always measured along the exit heading, from the shape edge
//! facing that heading to some target coordinate. The target is either a
//! keep-out rect's edge (obstacle layout) or the midpoint of a routed
//! segment (post-route). Both go through [`resolve_spacing`] and
//! [`apply_spacing`]; only the [`SpacingTarget`] differs.

use crate::options::RoutingOptions;
use crate::types::{Heading, Point, Rect};

/// Where a gap is read from and written back to.
pub trait SpacingTarget {
    /// Coordinate of the target along `heading`'s axis
    fn read(&self, heading: Heading) -> f64;
    /// Move the target so its coordinate along `heading`'s axis is `value`
    fn write(&mut self, heading: Heading, value: f64);
}

/// The edge of a keep-out rect facing the heading
struct ObstacleEdge<'a>(&'a mut Rect);

impl SpacingTarget for ObstacleEdge<'_> {
    fn read(&self, heading: Heading) -> f64 {
        self.0.edge(heading)
    }

    fn write(&mut self, heading: Heading, value: f64) {
        *self.0 = self.0.with_edge(heading, value);
    }
}

/// The midpoint of the segment `points[index]`-`points[index + 1]`
struct SegmentMidpoint<'a> {
    points: &'a mut [Point],
    index: usize,
}

impl SpacingTarget for SegmentMidpoint<'_> {
    fn read(&self, heading: Heading) -> f64 {
        let axis = heading.axis();
        let (a, b) = (self.points[self.index], self.points[self.index + 1]);
        (a.along(axis) + b.along(axis)) / 2.0
    }

    fn write(&mut self, heading: Heading, value: f64) {
        let axis = heading.axis();
        for p in &mut self.points[self.index..=self.index + 1] {
            *p = p.with_along(axis, value);
        }
    }
}

/// Signed gap from the edge of `bounds` facing `heading` to the target.
/// Positive means the target lies outside the shape in the heading direction.
pub fn resolve_spacing(target: &impl SpacingTarget, bounds: &Rect, heading: Heading) -> f64 {
    (target.read(heading) - bounds.edge(heading)) * heading.sign()
}

/// Move the target so that [`resolve_spacing`] returns `spacing`.
pub fn apply_spacing(target: &mut impl SpacingTarget, bounds: &Rect, heading: Heading, spacing: f64) {
    target.write(heading, bounds.edge(heading) + spacing * heading.sign());
}

// ============================================================================
// Call-site wrappers
// ============================================================================

/// Gap between the element's edge and the obstacle's edge along `heading`
pub fn resolve_spacing_for_obstacle(element_bounds: &Rect, obstacle: &Rect, heading: Heading) -> f64 {
    let mut copy = *obstacle;
    resolve_spacing(&ObstacleEdge(&mut copy), element_bounds, heading)
}

/// Gap between the element's edge and the midpoint of `segment` along `heading`
pub fn resolve_spacing_for_segment(segment: [Point; 2], bounds: &Rect, heading: Heading) -> f64 {
    let mut pts = segment;
    resolve_spacing(&SegmentMidpoint { points: &mut pts, index: 0 }, bounds, heading)
}

/// The obstacle with its heading-facing edge exactly `spacing` beyond the element
pub fn apply_spacing_to_obstacle(obstacle: &Rect, element_bounds: &Rect, heading: Heading, spacing: f64) -> Rect {
    let mut out = *obstacle;
    apply_spacing(&mut ObstacleEdge(&mut out), element_bounds, heading, spacing);
    out
}

/// Slide both points of segment `segment` (`points[segment]`, `points[segment + 1]`)
/// along `heading`'s axis so their midpoint sits `spacing` beyond the element edge.
///
/// Intended for segments perpendicular to the heading; a parallel segment
/// would collapse onto a single coordinate.
///
/// # Panics
///
/// If `segment + 1` is out of bounds for `points`.
pub fn apply_spacing_to_segment(points: &mut [Point], segment: usize, bounds: &Rect, heading: Heading, spacing: f64) {
    apply_spacing(&mut SegmentMidpoint { points, index: segment }, bounds, heading, spacing);
}

/// Floor below which spacing is never set
pub fn min_binding_spacing(has_arrowhead: bool, options: &RoutingOptions) -> f64 {
    options.min_binding_spacing(has_arrowhead)
}

/// Common gap for two ends: the smaller of the two, raised to `floor`.
pub fn balanced_spacing(a: f64, b: f64, floor: f64) -> f64 {
    a.min(b).max(floor)
}
