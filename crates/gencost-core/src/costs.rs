//! Cost declarations attached to grid elements.
//!
//! Two declaration families exist:
//!
//! - [`PolynomialCostSpec`]: `c0 + c1·P + c2·P²` with coefficients per declaration unit
//! - [`PiecewiseCostSpec`]: ordered `(lower, upper, marginal cost)` segments
//!
//! Both are keyed by a [`GridElementRef`] and a [`PowerChannel`]. At most one
//! declaration per `(element, channel)` is allowed; [`CostTables::validate_into`]
//! reports violations for callers that build tables by hand.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::IssueCategory;
use crate::{Diagnostics, GencostResult, GridElementRef, PowerChannel};

/// Common view over both declaration families
pub trait CostDeclaration {
    fn element(&self) -> GridElementRef;
    fn channel(&self) -> PowerChannel;
}

/// One linear piece of a piecewise cost curve.
///
/// Serialized as a `[lower, upper, marginal_cost]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct CostSegment {
    pub lower: f64,
    pub upper: f64,
    /// Cost per unit of power inside `[lower, upper]`
    pub marginal_cost: f64,
}

impl CostSegment {
    pub fn new(lower: f64, upper: f64, marginal_cost: f64) -> Self {
        Self {
            lower,
            upper,
            marginal_cost,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl From<(f64, f64, f64)> for CostSegment {
    fn from((lower, upper, marginal_cost): (f64, f64, f64)) -> Self {
        Self::new(lower, upper, marginal_cost)
    }
}

impl From<CostSegment> for (f64, f64, f64) {
    fn from(s: CostSegment) -> Self {
        (s.lower, s.upper, s.marginal_cost)
    }
}

/// Polynomial cost of one element on one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialCostSpec {
    #[serde(flatten)]
    pub element: GridElementRef,
    #[serde(default, rename = "power_type")]
    pub channel: PowerChannel,
    /// Constant term (currency)
    #[serde(default)]
    pub c0: f64,
    /// Linear term (currency per unit)
    #[serde(default)]
    pub c1: f64,
    /// Quadratic term (currency per unit²)
    #[serde(default)]
    pub c2: f64,
}

impl PolynomialCostSpec {
    pub fn linear(element: GridElementRef, channel: PowerChannel, c0: f64, c1: f64) -> Self {
        Self::quadratic(element, channel, c0, c1, 0.0)
    }

    pub fn quadratic(
        element: GridElementRef,
        channel: PowerChannel,
        c0: f64,
        c1: f64,
        c2: f64,
    ) -> Self {
        Self {
            element,
            channel,
            c0,
            c1,
            c2,
        }
    }

    /// True if the declaration carries a quadratic term
    pub fn is_quadratic(&self) -> bool {
        self.c2 != 0.0
    }

    pub fn is_linear(&self) -> bool {
        !self.is_quadratic()
    }
}

impl CostDeclaration for PolynomialCostSpec {
    fn element(&self) -> GridElementRef {
        self.element
    }

    fn channel(&self) -> PowerChannel {
        self.channel
    }
}

/// Piecewise-linear cost of one element on one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseCostSpec {
    #[serde(flatten)]
    pub element: GridElementRef,
    #[serde(default, rename = "power_type")]
    pub channel: PowerChannel,
    /// Segments in curve order; consecutive segments must share their bound
    #[serde(alias = "points")]
    pub segments: Vec<CostSegment>,
}

impl PiecewiseCostSpec {
    pub fn new(
        element: GridElementRef,
        channel: PowerChannel,
        segments: impl IntoIterator<Item = (f64, f64, f64)>,
    ) -> Self {
        Self {
            element,
            channel,
            segments: segments.into_iter().map(CostSegment::from).collect(),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl CostDeclaration for PiecewiseCostSpec {
    fn element(&self) -> GridElementRef {
        self.element
    }

    fn channel(&self) -> PowerChannel {
        self.channel
    }
}

/// All cost declarations of one OPF run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTables {
    #[serde(default, alias = "poly_cost")]
    pub poly: Vec<PolynomialCostSpec>,
    #[serde(default, alias = "pwl_cost")]
    pub pwl: Vec<PiecewiseCostSpec>,
}

impl CostTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tables from JSON (`{"poly": [...], "pwl": [...]}`)
    pub fn from_json(json: &str) -> GencostResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> GencostResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn add_poly(&mut self, spec: PolynomialCostSpec) -> &mut Self {
        self.poly.push(spec);
        self
    }

    pub fn add_pwl(&mut self, spec: PiecewiseCostSpec) -> &mut Self {
        self.pwl.push(spec);
        self
    }

    pub fn len(&self) -> usize {
        self.poly.len() + self.pwl.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poly.is_empty() && self.pwl.is_empty()
    }

    /// Check the table-level invariants the compiler relies on.
    ///
    /// Reports duplicated `(element, channel)` declarations and non-finite
    /// coefficients as errors, empty segment lists as warnings.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        let mut seen: HashMap<(GridElementRef, PowerChannel), usize> = HashMap::new();
        let keys = self
            .poly
            .iter()
            .map(|c| (c.element(), c.channel()))
            .chain(self.pwl.iter().map(|c| (c.element(), c.channel())));
        for key in keys {
            *seen.entry(key).or_default() += 1;
        }

        let mut duplicates: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
        duplicates.sort();
        for ((element, channel), count) in duplicates {
            diag.add_error_for(
                IssueCategory::Duplicate,
                &element.to_string(),
                &format!("{} costs declared for channel {}", count, channel),
            );
        }

        for cost in &self.poly {
            if !(cost.c0.is_finite() && cost.c1.is_finite() && cost.c2.is_finite()) {
                diag.add_error_for(
                    IssueCategory::Coefficients,
                    &cost.element.to_string(),
                    "polynomial cost has a non-finite coefficient",
                );
            }
        }

        for cost in &self.pwl {
            if cost.segments.is_empty() {
                diag.add_warning_for(
                    IssueCategory::Segments,
                    &cost.element.to_string(),
                    "piecewise cost has no segments",
                );
            } else if cost.segments.iter().any(|s| !s.marginal_cost.is_finite()) {
                diag.add_error_for(
                    IssueCategory::Coefficients,
                    &cost.element.to_string(),
                    "piecewise cost has a non-finite marginal cost",
                );
            }
        }
    }
}
