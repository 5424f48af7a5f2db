//! Solver-side cost curves.
//!
//! A compiled cost row describes a curve in solver units (MW, currency). This
//! is the decoded form, used to evaluate what a row actually charges.

use serde::{Deserialize, Serialize};

/// Generator cost curve in solver units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CostModel {
    /// No cost function specified
    #[default]
    NoCost,
    /// Polynomial cost: `cost = sum(coeffs[i] * P^i)` where `coeffs[0]` is the constant term.
    Polynomial(Vec<f64>),
    /// Piecewise linear cost: `(MW, currency)` breakpoints in ascending power order
    PiecewiseLinear(Vec<(f64, f64)>),
}

impl CostModel {
    /// Quadratic cost: c0 + c1*P + c2*P^2
    pub fn quadratic(c0: f64, c1: f64, c2: f64) -> Self {
        CostModel::Polynomial(vec![c0, c1, c2])
    }

    /// Linear cost: c0 + c1*P
    pub fn linear(c0: f64, c1: f64) -> Self {
        CostModel::Polynomial(vec![c0, c1])
    }

    /// Evaluate cost at the given output.
    ///
    /// Piecewise curves are held flat outside their breakpoint range.
    pub fn evaluate(&self, p_mw: f64) -> f64 {
        match self {
            CostModel::NoCost => 0.0,
            CostModel::Polynomial(coeffs) => coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c * p_mw.powi(i as i32))
                .sum(),
            CostModel::PiecewiseLinear(points) => {
                let (Some(first), Some(last)) = (points.first(), points.last()) else {
                    return 0.0;
                };
                if p_mw <= first.0 {
                    return first.1;
                }
                if p_mw >= last.0 {
                    return last.1;
                }
                points
                    .windows(2)
                    .find(|w| p_mw >= w[0].0 && p_mw <= w[1].0)
                    .map(|w| {
                        let t = (p_mw - w[0].0) / (w[1].0 - w[0].0);
                        w[0].1 + t * (w[1].1 - w[0].1)
                    })
                    .unwrap_or(0.0)
            }
        }
    }

    /// Marginal cost at the given output (derivative of the cost function)
    pub fn marginal_cost(&self, p_mw: f64) -> f64 {
        match self {
            CostModel::NoCost => 0.0,
            CostModel::Polynomial(coeffs) => {
                // d/dP[sum(c_i * P^i)] = sum(i * c_i * P^(i-1))
                coeffs
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(i, c)| (i as f64) * c * p_mw.powi(i as i32 - 1))
                    .sum()
            }
            CostModel::PiecewiseLinear(points) => {
                let slope = |w: &[(f64, f64)]| (w[1].1 - w[0].1) / (w[1].0 - w[0].0);
                points
                    .windows(2)
                    .find(|w| p_mw >= w[0].0 && p_mw <= w[1].0)
                    .or_else(|| points.windows(2).last())
                    .map(slope)
                    .unwrap_or(0.0)
            }
        }
    }

    pub fn has_cost(&self) -> bool {
        !matches!(self, CostModel::NoCost)
    }
}
