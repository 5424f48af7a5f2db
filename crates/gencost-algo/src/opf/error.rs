use gencost_core::{GencostError, GridElementRef, PowerChannel};
use thiserror::Error;

/// Cost compilation errors.
///
/// Every variant aborts the compilation; no partially filled matrix is
/// returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectiveError {
    /// Quadratic polynomial costs next to piecewise-linear costs
    #[error(
        "piecewise linear costs can not be mixed with quadratic costs \
         ({piecewise} piecewise, {quadratic} quadratic declarations)"
    )]
    ConflictingCostModel { piecewise: usize, quadratic: usize },

    /// Gap or overlap between consecutive segments of one piecewise cost
    #[error(
        "piecewise cost of {element} is not contiguous: segment {segment} starts at \
         {lower} but the previous segment ends at {previous_upper}"
    )]
    NonContiguousSegments {
        element: GridElementRef,
        segment: usize,
        previous_upper: f64,
        lower: f64,
    },

    /// A linear cost converted to a piecewise curve needs finite bounds
    #[error("linear {channel} cost of {element} needs finite bounds to become piecewise linear")]
    UnboundedLinearCost {
        element: GridElementRef,
        channel: PowerChannel,
    },

    /// A lookup table pointed outside the generator array
    #[error("cost row {row} is outside the {rows}-row cost matrix")]
    RowOutOfRange { row: usize, rows: usize },

    /// More coefficients than the matrix was sized for
    #[error("cost row {row} needs {needed} coefficient columns, matrix has {available}")]
    CoefficientOverflow {
        row: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid objective configuration: {0}")]
    InvalidConfig(String),
}

impl From<ObjectiveError> for GencostError {
    fn from(err: ObjectiveError) -> Self {
        match err {
            ObjectiveError::InvalidConfig(msg) => GencostError::Config(msg),
            other => GencostError::Model(other.to_string()),
        }
    }
}
