//! Endpoint specifications for a route request
//!
//! An arrow end is either a free point on the canvas or bound to an
//! element's bounds. Both share the [`Anchor`] behavior so the layout
//! builder can treat them uniformly.

use enum_dispatch::enum_dispatch;

use crate::errors::RouteError;
use crate::types::{Heading, Point, Rect};

/// Common behavior for both kinds of arrow end
#[enum_dispatch]
pub trait Anchor {
    /// Point the opposite end aims at
    fn reference_point(&self) -> Point;

    /// Bounds of the bound element, `None` for a free end
    fn bounds(&self) -> Option<Rect>;

    /// Whether an arrowhead is drawn at this end
    fn has_arrowhead(&self) -> bool;

    /// Extent used when clamping keep-out zones: the element, or the point itself
    fn extent(&self) -> Rect {
        self.bounds().unwrap_or_else(|| {
            let p = self.reference_point();
            Rect::new(p.x, p.y, p.x, p.y)
        })
    }

    /// Reject non-finite coordinates
    fn validate(&self, what: &'static str) -> Result<(), RouteError>;
}

/// An unbound end at a fixed canvas position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeEndpoint {
    pub point: Point,
    /// Direction the path leaves this end, if constrained
    pub heading: Option<Heading>,
    pub arrowhead: bool,
}

impl FreeEndpoint {
    pub fn new(point: Point) -> Self {
        Self { point, heading: None, arrowhead: false }
    }

    pub fn with_heading(mut self, heading: Heading) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_arrowhead(mut self, arrowhead: bool) -> Self {
        self.arrowhead = arrowhead;
        self
    }
}

impl Anchor for FreeEndpoint {
    fn reference_point(&self) -> Point {
        self.point
    }

    fn bounds(&self) -> Option<Rect> {
        None
    }

    fn has_arrowhead(&self) -> bool {
        self.arrowhead
    }

    fn validate(&self, what: &'static str) -> Result<(), RouteError> {
        if self.point.is_finite() { Ok(()) } else { Err(RouteError::NonFinite { what }) }
    }
}

/// An end bound to an element's bounding rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundEndpoint {
    pub bounds: Rect,
    /// Preferred side to exit from
    pub side: Option<Heading>,
    /// Exact attachment point; snapped to the nearest edge, which also picks the side
    pub anchor: Option<Point>,
    pub arrowhead: bool,
}

impl BoundEndpoint {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds, side: None, anchor: None, arrowhead: false }
    }

    pub fn with_side(mut self, side: Heading) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_arrowhead(mut self, arrowhead: bool) -> Self {
        self.arrowhead = arrowhead;
        self
    }
}

impl Anchor for BoundEndpoint {
    fn reference_point(&self) -> Point {
        self.bounds.center()
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.bounds)
    }

    fn has_arrowhead(&self) -> bool {
        self.arrowhead
    }

    fn validate(&self, what: &'static str) -> Result<(), RouteError> {
        let anchor_ok = self.anchor.is_none_or(|a| a.is_finite());
        if self.bounds.is_finite() && anchor_ok { Ok(()) } else { Err(RouteError::NonFinite { what }) }
    }
}

/// One end of a route request
#[enum_dispatch(Anchor)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndpointSpec {
    Free(FreeEndpoint),
    Bound(BoundEndpoint),
}

impl EndpointSpec {
    pub fn free(point: Point) -> Self {
        FreeEndpoint::new(point).into()
    }

    pub fn bound(bounds: Rect) -> Self {
        BoundEndpoint::new(bounds).into()
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, EndpointSpec::Bound(_))
    }
}
