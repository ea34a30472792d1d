//! Default routing tolerances and distances (canvas units)

pub const EPSILON: f64 = 1e-6;
/// Segments shorter than this are merged away after routing
pub const DEDUP_THRESHOLD: f64 = 1.0;
/// Keep-out inflation around a bound shape
pub const PADDING: f64 = 40.0;
/// Keep-out inflation around other elements the arrow avoids
pub const OBSTACLE_PADDING: f64 = 10.0;
pub const GRID_MARGIN: f64 = 20.0;
pub const BEND_PENALTY: f64 = 100.0;
/// Smallest gap between a shape edge and the arrow shaft
pub const BINDING_GAP: f64 = 5.0;
/// Extra gap reserved for an arrowhead
pub const ARROWHEAD_CLEARANCE: f64 = 10.0;
pub const MAX_GRID_NODES: usize = 40_000;
