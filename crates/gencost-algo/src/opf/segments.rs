//! Piecewise segment integration.
//!
//! Marginal-cost segments `(lower, upper, marginal_cost)` are accumulated into
//! the breakpoint form the solver expects: `[p0, f0, p1, f1, ...]` with power
//! in MW and `f` the cumulative cost at `p`.

use gencost_core::{CostSegment, GridElementRef};

use super::ObjectiveError;

/// Integrate the segments of one element into flat breakpoints.
///
/// `per_mw` is the number of declaration power units per MW. The first
/// breakpoint carries the cost of producing up to the first lower bound at
/// the first segment's marginal cost, so a curve starting above zero keeps
/// its slope anchored at the origin.
///
/// Segments must be contiguous in the order given; the first gap or overlap
/// fails the whole element.
pub fn integrate(
    element: GridElementRef,
    segments: &[CostSegment],
    sign: f64,
    per_mw: f64,
) -> Result<Vec<f64>, ObjectiveError> {
    let Some(first) = segments.first() else {
        return Ok(Vec::new());
    };

    let mut breakpoints = Vec::with_capacity(2 * (segments.len() + 1));
    let mut cumulative = first.lower * first.marginal_cost * sign;
    breakpoints.push(first.lower / per_mw);
    breakpoints.push(cumulative);

    let mut previous_upper = first.lower;
    for (i, segment) in segments.iter().enumerate() {
        if segment.lower != previous_upper {
            return Err(ObjectiveError::NonContiguousSegments {
                element,
                segment: i,
                previous_upper,
                lower: segment.lower,
            });
        }
        cumulative += segment.width() * segment.marginal_cost * sign;
        breakpoints.push(segment.upper / per_mw);
        breakpoints.push(cumulative);
        previous_upper = segment.upper;
    }

    Ok(breakpoints)
}
