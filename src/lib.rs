//! Orthogonal ("elbow") connector routing and editing.
//!
//! [`route`] computes a path of horizontal and vertical segments between two
//! ends, each either a free canvas point or bound to a shape's bounds, going
//! around the shapes it touches and any other obstacles. [`edit`] applies a
//! user gesture (dragging an end, dragging or releasing a segment) to an
//! existing path while keeping pinned segments where the user put them.
//!
//! Coordinates are y-down: [`Heading::Down`] is `+y`. Both entry points are
//! pure functions of their inputs; nothing is retained between calls.
//!
//! ```
//! use elbow::{EndpointSpec, Point, Rect, RoutingOptions, route};
//!
//! let a = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let b = Rect::new(400.0, 0.0, 500.0, 100.0);
//! let res = route(&EndpointSpec::bound(a), &EndpointSpec::bound(b), &[], &RoutingOptions::default())?;
//! assert_eq!(res.points(), &[Point::new(100.0, 50.0), Point::new(400.0, 50.0)]);
//! # Ok::<(), elbow::RouteError>(())
//! ```

pub mod defaults;
pub mod edit;
pub mod endpoint;
pub mod errors;
pub mod geometry;
pub mod heap;
mod log;
pub mod obstacles;
pub mod options;
pub mod points;
pub mod route;
pub mod spacing;
pub mod types;

pub use edit::{
    ArrowEnd, EditContext, EditIntent, EditResult, FixedSegment, edit, fixed_segments_from_json,
    fixed_segments_to_json,
};
pub use endpoint::{Anchor, BoundEndpoint, EndpointSpec, FreeEndpoint};
pub use errors::{EditError, RecordError, RouteError, SegmentError};
pub use heap::PriorityQueue;
pub use options::RoutingOptions;
pub use points::RoutedPoints;
pub use route::{RouteResult, route};
pub use types::{Axis, Heading, NumericError, Point, Rect};
