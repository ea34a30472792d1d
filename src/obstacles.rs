//! Obstacle layout: keep-out zones and exit points for the two arrow ends.
//!
//! The layout is built in five steps, each a separate function:
//! inflate → clamp → split → exit → harmonize. Free ends contribute no
//! zone; their exit is the point itself.

use crate::endpoint::{Anchor, EndpointSpec};
use crate::geometry::heading_for_point_on_rect;
use crate::log::debug;
use crate::options::RoutingOptions;
use crate::spacing::{apply_spacing_to_obstacle, resolve_spacing_for_obstacle};
use crate::types::{Axis, Heading, Point, Rect};

/// How one end of the path leaves its anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndLayout {
    /// Exit point: on the element's boundary, or the free point itself
    pub point: Point,
    /// Direction the path leaves `point`; always set for bound ends
    pub heading: Option<Heading>,
    /// Where the search starts: `point` pushed out to the zone boundary
    pub dongle: Point,
    /// Keep-out zone around the bound element
    pub zone: Option<Rect>,
    /// The bound element itself
    pub element: Option<Rect>,
    pub arrowhead: bool,
}

impl EndLayout {
    /// Gap between the element edge and the zone edge along the exit heading
    pub fn spacing(&self) -> Option<f64> {
        match (self.element, self.zone, self.heading) {
            (Some(el), Some(zone), Some(h)) => Some(resolve_spacing_for_obstacle(&el, &zone, h)),
            _ => None,
        }
    }
}

/// Keep-out zones and exits for both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleLayout {
    pub start: EndLayout,
    pub end: EndLayout,
}

impl ObstacleLayout {
    /// Zones of the bound ends (zero, one, or two)
    pub fn zones(&self) -> impl Iterator<Item = Rect> + '_ {
        self.start.zone.into_iter().chain(self.end.zone)
    }
}

/// Build the layout for a start/end pair.
pub fn build_layout(start: &EndpointSpec, end: &EndpointSpec, options: &RoutingOptions) -> ObstacleLayout {
    let eps = options.epsilon;
    let extents = [start.extent(), end.extent()];

    let mut zones = [inflate(start, options.padding), inflate(end, options.padding)];
    clamp_zones(&mut zones, &extents);
    split_zones(&mut zones, start, end, eps);

    let (start_point, start_heading) = resolve_exit(start, end.reference_point(), Heading::Right);
    let (end_point, end_heading) = resolve_exit(end, start.reference_point(), Heading::Left);

    let headings = [start_heading, end_heading];
    let floors = [
        options.min_binding_spacing(start.has_arrowhead()),
        options.min_binding_spacing(end.has_arrowhead()),
    ];
    let elements = [start.bounds(), end.bounds()];
    let spacing = harmonize_zones(&mut zones, &elements, &headings, &floors);

    debug!(?zones, ?spacing, "obstacle layout");

    let make = |i: usize, point: Point, spec: &EndpointSpec| {
        let dongle = match (headings[i], spacing[i]) {
            (Some(h), Some(s)) if spec.is_bound() => point.translate(h, s),
            _ => point,
        };
        EndLayout {
            point,
            heading: headings[i],
            dongle,
            zone: zones[i],
            element: elements[i],
            arrowhead: spec.has_arrowhead(),
        }
    };

    ObstacleLayout { start: make(0, start_point, start), end: make(1, end_point, end) }
}

// ============================================================================
// Steps
// ============================================================================

/// Step 1: provisional keep-out zone, padded on every side
pub fn inflate(spec: &EndpointSpec, padding: f64) -> Option<Rect> {
    spec.bounds().map(|b| b.inflate(padding))
}

/// Step 2: pull each zone back to the midpoint of the gap between the two ends,
/// on every axis where the ends are separated.
pub fn clamp_zones(zones: &mut [Option<Rect>; 2], extents: &[Rect; 2]) {
    let [a, b] = extents;
    // x axis
    if b.min_x >= a.max_x {
        let mid = (a.max_x + b.min_x) / 2.0;
        clamp_edge(&mut zones[0], Heading::Right, mid);
        clamp_edge(&mut zones[1], Heading::Left, mid);
    } else if a.min_x >= b.max_x {
        let mid = (b.max_x + a.min_x) / 2.0;
        clamp_edge(&mut zones[0], Heading::Left, mid);
        clamp_edge(&mut zones[1], Heading::Right, mid);
    }
    // y axis
    if b.min_y >= a.max_y {
        let mid = (a.max_y + b.min_y) / 2.0;
        clamp_edge(&mut zones[0], Heading::Down, mid);
        clamp_edge(&mut zones[1], Heading::Up, mid);
    } else if a.min_y >= b.max_y {
        let mid = (b.max_y + a.min_y) / 2.0;
        clamp_edge(&mut zones[0], Heading::Up, mid);
        clamp_edge(&mut zones[1], Heading::Down, mid);
    }
}

/// Pull the edge facing `heading` back to `limit` if it reaches past it
fn clamp_edge(zone: &mut Option<Rect>, heading: Heading, limit: f64) {
    if let Some(z) = zone {
        let edge = z.edge(heading);
        if (edge - limit) * heading.sign() > 0.0 {
            *z = z.with_edge(heading, limit);
        }
    }
}

/// Step 3: two zones that still overlap are cut along the perpendicular
/// bisector of the line between the ends. Zones never shrink inside their element.
pub fn split_zones(zones: &mut [Option<Rect>; 2], start: &EndpointSpec, end: &EndpointSpec, eps: f64) {
    let (Some(za), Some(zb)) = (zones[0], zones[1]) else {
        return;
    };
    if !za.intersects(&zb, eps) {
        return;
    }
    let (ra, rb) = (start.reference_point(), end.reference_point());
    let d = rb - ra;
    let axis = if d.x.abs() >= d.y.abs() { Axis::Horizontal } else { Axis::Vertical };
    let mid = ra.midpoint(rb).along(axis);
    let toward_b = Heading::positive(axis);
    let (ha, hb) = if rb.along(axis) >= ra.along(axis) {
        (toward_b, toward_b.reverse())
    } else {
        (toward_b.reverse(), toward_b)
    };

    let cut = |zone: Rect, element: Option<Rect>, h: Heading| {
        // never cut into the element itself
        let floor = element.map_or(mid, |el| if h.sign() > 0.0 { mid.max(el.edge(h)) } else { mid.min(el.edge(h)) });
        zone.with_edge(h, floor)
    };
    zones[0] = Some(cut(za, start.bounds(), ha));
    zones[1] = Some(cut(zb, end.bounds(), hb));
    debug!(?axis, mid, "split overlapping zones");
}

/// Step 4: where an end leaves its anchor, and in which direction.
///
/// A free end keeps its point and optional heading. A bound end uses its
/// anchor (snapped to the nearest edge), its preferred side, or the side
/// facing `toward`, in that order. `fallback` is used when `toward` sits on
/// the element's center and gives no direction.
pub fn resolve_exit(spec: &EndpointSpec, toward: Point, fallback: Heading) -> (Point, Option<Heading>) {
    match spec {
        EndpointSpec::Free(free) => (free.point, free.heading),
        EndpointSpec::Bound(bound) => {
            let el = bound.bounds;
            if let Some(anchor) = bound.anchor {
                let heading = nearest_edge(anchor, &el);
                return (snap_to_edge(anchor, &el, heading), Some(heading));
            }
            let center = el.center();
            let heading = match bound.side {
                Some(side) => side,
                None if (toward - center).length_squared() == 0.0 => fallback,
                None => heading_for_point_on_rect(toward, &el),
            };
            (ray_exit(&el, center, toward, heading), Some(heading))
        }
    }
}

/// The edge of `rect` closest to `p` (aspect-normalized when `p` is outside)
pub(crate) fn nearest_edge(p: Point, rect: &Rect) -> Heading {
    if !rect.contains(p) {
        return heading_for_point_on_rect(p, rect);
    }
    let distances = [
        (Heading::Right, rect.max_x - p.x),
        (Heading::Down, rect.max_y - p.y),
        (Heading::Left, p.x - rect.min_x),
        (Heading::Up, p.y - rect.min_y),
    ];
    distances
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(Heading::Right, |(h, _)| h)
}

/// Project `p` onto the edge facing `heading`, clamped to the edge's extent
fn snap_to_edge(p: Point, rect: &Rect, heading: Heading) -> Point {
    let axis = heading.axis();
    let across = axis.perpendicular();
    let (lo, hi) = (rect.min().along(across), rect.max().along(across));
    let along_edge = p.along(across).clamp(lo, hi);
    Point::ORIGIN.with_along(axis, rect.edge(heading)).with_along(across, along_edge)
}

/// Where the ray from `center` toward `toward` crosses the edge facing `heading`.
/// Falls back to the edge midpoint when the ray runs away from that edge.
fn ray_exit(rect: &Rect, center: Point, toward: Point, heading: Heading) -> Point {
    let axis = heading.axis();
    let across = axis.perpendicular();
    let edge = rect.edge(heading);
    let d = toward - center;
    let d_along = Point::from(d).along(axis);
    let hit = if d_along * heading.sign() > 0.0 {
        let t = (edge - center.along(axis)) / d_along;
        center.along(across) + t * Point::from(d).along(across)
    } else {
        center.along(across)
    };
    snap_to_edge(Point::ORIGIN.with_along(axis, edge).with_along(across, hit), rect, heading)
}

/// Step 5: equalize the gap between each element and its zone along the exit
/// heading, never going below the per-end floor. Returns the applied spacing.
pub fn harmonize_zones(
    zones: &mut [Option<Rect>; 2],
    elements: &[Option<Rect>; 2],
    headings: &[Option<Heading>; 2],
    floors: &[f64; 2],
) -> [Option<f64>; 2] {
    let gap = |i: usize| match (elements[i], zones[i], headings[i]) {
        (Some(el), Some(zone), Some(h)) => Some(resolve_spacing_for_obstacle(&el, &zone, h)),
        _ => None,
    };
    let gaps = [gap(0), gap(1)];
    let common = match gaps {
        [Some(a), Some(b)] => Some(a.min(b)),
        [Some(a), None] | [None, Some(a)] => Some(a),
        [None, None] => None,
    };
    let mut applied = [None, None];
    for i in 0..2 {
        if let (Some(el), Some(zone), Some(h), Some(target)) = (elements[i], zones[i], headings[i], common) {
            let spacing = target.max(floors[i]);
            zones[i] = Some(apply_spacing_to_obstacle(&zone, &el, h, spacing));
            applied[i] = Some(spacing);
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::BoundEndpoint;

    fn opts() -> RoutingOptions {
        RoutingOptions::default()
    }

    #[test]
    fn free_ends_have_no_zones() {
        let (start, end) = (EndpointSpec::free(Point::new(0.0, 0.0)), EndpointSpec::free(Point::new(100.0, 100.0)));
        let layout = build_layout(&start, &end, &opts());
        assert_eq!(layout.zones().count(), 0);
        assert_eq!(layout.start.dongle, Point::new(0.0, 0.0));
        assert_eq!(layout.end.dongle, Point::new(100.0, 100.0));
        assert_eq!(layout.start.heading, None);
    }

    #[test]
    fn far_apart_shapes_keep_full_padding() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(400.0, 0.0, 500.0, 100.0);
        let layout = build_layout(&EndpointSpec::bound(a), &EndpointSpec::bound(b), &opts());
        assert_eq!(layout.start.heading, Some(Heading::Right));
        assert_eq!(layout.end.heading, Some(Heading::Left));
        assert_eq!(layout.start.point, Point::new(100.0, 50.0));
        assert_eq!(layout.end.point, Point::new(400.0, 50.0));
        assert_eq!(layout.start.spacing(), Some(40.0));
        assert_eq!(layout.end.spacing(), Some(40.0));
        assert_eq!(layout.start.dongle, Point::new(140.0, 50.0));
        assert_eq!(layout.end.dongle, Point::new(360.0, 50.0));
    }

    #[test]
    fn close_shapes_are_clamped_to_the_gap_midpoint() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(130.0, 0.0, 230.0, 100.0);
        let layout = build_layout(&EndpointSpec::bound(a), &EndpointSpec::bound(b), &opts());
        let (za, zb) = (layout.start.zone.unwrap(), layout.end.zone.unwrap());
        assert_eq!(za.max_x, 115.0);
        assert_eq!(zb.min_x, 115.0);
        assert!(!za.intersects(&zb, 1e-9));
        assert_eq!(layout.start.spacing(), Some(15.0));
        assert_eq!(layout.end.spacing(), Some(15.0));
    }

    #[test]
    fn harmonize_equalizes_unequal_gaps() {
        // b is a free end 50 units right of a: a's zone clamps to 25
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let layout = build_layout(&EndpointSpec::bound(a), &EndpointSpec::free(Point::new(150.0, 50.0)), &opts());
        assert_eq!(layout.start.spacing(), Some(25.0));
        assert_eq!(layout.start.dongle, Point::new(125.0, 50.0));
    }

    #[test]
    fn harmonize_respects_arrowhead_floor() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(104.0, 0.0, 204.0, 100.0);
        let end: EndpointSpec = BoundEndpoint::new(b).with_arrowhead(true).into();
        let layout = build_layout(&EndpointSpec::bound(a), &end, &opts());
        let o = opts();
        assert_eq!(layout.start.spacing(), Some(o.min_binding_spacing(false)));
        assert_eq!(layout.end.spacing(), Some(o.min_binding_spacing(true)));
    }

    #[test]
    fn free_end_is_never_swallowed() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let free = Point::new(110.0, 50.0);
        let layout = build_layout(&EndpointSpec::bound(a), &EndpointSpec::free(free), &opts());
        assert!(!layout.start.zone.unwrap().contains_strict(free, 1e-9));
    }

    #[test]
    fn overlapping_shapes_are_split() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(80.0, 60.0, 180.0, 160.0);
        let mut zones = [Some(a.inflate(40.0)), Some(b.inflate(40.0))];
        split_zones(&mut zones, &EndpointSpec::bound(a), &EndpointSpec::bound(b), 1e-9);
        let (za, zb) = (zones[0].unwrap(), zones[1].unwrap());
        // split on x at the center midpoint (90), but never inside an element
        assert_eq!(za.max_x, 100.0);
        assert_eq!(zb.min_x, 80.0);
        assert!(za.contains(a.max()) && zb.contains(b.min()));
    }

    #[test]
    fn preferred_side_wins() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let start: EndpointSpec = BoundEndpoint::new(a).with_side(Heading::Down).into();
        let (p, h) = resolve_exit(&start, Point::new(500.0, 50.0), Heading::Right);
        assert_eq!(h, Some(Heading::Down));
        assert_eq!(p, Point::new(50.0, 100.0));
    }

    #[test]
    fn anchor_snaps_to_nearest_edge() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let start: EndpointSpec = BoundEndpoint::new(a).with_anchor(Point::new(30.0, 95.0)).into();
        let (p, h) = resolve_exit(&start, Point::new(500.0, 50.0), Heading::Right);
        assert_eq!(h, Some(Heading::Down));
        assert_eq!(p, Point::new(30.0, 100.0));
    }

    #[test]
    fn ray_exit_follows_target() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        // target up and to the right, right edge hit at y = 50 - 50 * (50 / 200)
        let (p, h) = resolve_exit(&EndpointSpec::bound(a), Point::new(250.0, 0.0), Heading::Right);
        assert_eq!(h, Some(Heading::Right));
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 37.5).abs() < 1e-9);
    }
}
