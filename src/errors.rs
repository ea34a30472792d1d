//! Error types with diagnostics using miette
//!
//! Only genuinely invalid input surfaces as an error. Search exhaustion and
//! stale fixed segments are recovered inside the engine.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Route Errors
// ============================================================================

/// Errors that occur when routing a new path
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("non-finite coordinate in {what}")]
    #[diagnostic(code(elbow::route::non_finite))]
    NonFinite { what: &'static str },

    #[error("start and end resolve to the same point ({x}, {y})")]
    #[diagnostic(
        code(elbow::route::coincident_endpoints),
        help("an elbow path needs two distinct endpoints")
    )]
    CoincidentEndpoints { x: f64, y: f64 },

    #[error("invalid routing options: {0}")]
    #[diagnostic(code(elbow::route::invalid_options))]
    InvalidOptions(#[from] NumericError),
}

// ============================================================================
// Fixed Segment Errors
// ============================================================================

/// Violations of the fixed-segment invariants
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    #[error("fixed segment has zero length")]
    #[diagnostic(code(elbow::segment::zero_length))]
    ZeroLength,

    #[error("fixed segment is neither horizontal nor vertical")]
    #[diagnostic(code(elbow::segment::diagonal))]
    Diagonal,

    #[error("fixed segment has a non-finite coordinate")]
    #[diagnostic(code(elbow::segment::non_finite))]
    NonFinite,
}

/// Errors decoding a persisted fixed segment record
#[derive(Error, Diagnostic, Debug)]
pub enum RecordError {
    #[error("missing field `{field}`")]
    #[diagnostic(code(elbow::record::missing_field))]
    MissingField { field: &'static str },

    #[error("field `{field}` is not a number")]
    #[diagnostic(code(elbow::record::not_numeric))]
    NotNumeric { field: &'static str },

    #[error("`index` must be a non-negative integer, got {value}")]
    #[diagnostic(code(elbow::record::invalid_index))]
    InvalidIndex { value: String },

    #[error("record is not an object")]
    #[diagnostic(code(elbow::record::not_an_object))]
    NotAnObject,

    #[error("expected a list of fixed segment records")]
    #[diagnostic(code(elbow::record::not_a_list))]
    NotAList,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Segment(#[from] SegmentError),

    #[error("invalid JSON: {0}")]
    #[diagnostic(code(elbow::record::json))]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Edit Errors
// ============================================================================

/// Errors that occur while editing an existing path
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("an elbow path needs at least two points, got {len}")]
    #[diagnostic(code(elbow::edit::too_few_points))]
    TooFewPoints { len: usize },

    #[error("non-finite coordinate in {what}")]
    #[diagnostic(code(elbow::edit::non_finite))]
    NonFinite { what: &'static str },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Route(#[from] RouteError),
}
