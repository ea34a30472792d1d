//! Routing configuration.
//!
//! Everything the engine needs to know about tolerances and distances is
//! carried by [`RoutingOptions`], passed into every call by reference.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::types::{NumericError, check_finite};

/// Tunable distances and tolerances for routing and editing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Tolerance for equality and axis-alignment tests
    pub epsilon: f64,
    /// Segments shorter than this are removed from emitted paths
    pub dedup_threshold: f64,
    /// Keep-out inflation of bound shapes
    pub padding: f64,
    /// Keep-out inflation of other obstacle candidates
    pub obstacle_padding: f64,
    /// Ring added around the union of all zones when building the grid
    pub grid_margin: f64,
    /// Cost added for every change of direction
    pub bend_penalty: f64,
    /// Minimum shaft spacing without an arrowhead
    pub binding_gap: f64,
    /// Added to `binding_gap` when the end carries an arrowhead
    pub arrowhead_clearance: f64,
    /// Grids with more nodes than this skip the search and fall back
    pub max_grid_nodes: usize,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            epsilon: defaults::EPSILON,
            dedup_threshold: defaults::DEDUP_THRESHOLD,
            padding: defaults::PADDING,
            obstacle_padding: defaults::OBSTACLE_PADDING,
            grid_margin: defaults::GRID_MARGIN,
            bend_penalty: defaults::BEND_PENALTY,
            binding_gap: defaults::BINDING_GAP,
            arrowhead_clearance: defaults::ARROWHEAD_CLEARANCE,
            max_grid_nodes: defaults::MAX_GRID_NODES,
        }
    }
}

impl RoutingOptions {
    /// Reject NaN/infinite values, non-positive tolerances, and negative distances.
    pub fn validate(&self) -> Result<(), NumericError> {
        positive(self.epsilon)?;
        positive(self.dedup_threshold)?;
        non_negative(self.padding)?;
        non_negative(self.obstacle_padding)?;
        non_negative(self.grid_margin)?;
        non_negative(self.bend_penalty)?;
        positive(self.binding_gap)?;
        non_negative(self.arrowhead_clearance)?;
        if self.max_grid_nodes == 0 {
            return Err(NumericError::Zero);
        }
        Ok(())
    }

    /// Floor for the gap between a bound shape's edge and the arrow.
    ///
    /// Larger when an arrowhead sits at that end so the head does not touch the shape.
    pub fn min_binding_spacing(&self, has_arrowhead: bool) -> f64 {
        if has_arrowhead { self.binding_gap + self.arrowhead_clearance } else { self.binding_gap }
    }
}

fn non_negative(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val < 0.0 { Err(NumericError::Negative) } else { Ok(val) }
}

fn positive(val: f64) -> Result<f64, NumericError> {
    let val = non_negative(val)?;
    if val == 0.0 { Err(NumericError::Zero) } else { Ok(val) }
}
