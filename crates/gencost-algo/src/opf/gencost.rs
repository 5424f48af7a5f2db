//! The solver-facing cost matrix.
//!
//! Column layout follows the MATPOWER `gencost` convention:
//!
//! ```text
//! | MODEL | STARTUP | SHUTDOWN | NCOST | COST ...                          |
//! |   1   |    0    |    0     |   n   | p0 f0 p1 f1 ... (n breakpoints)   |  piecewise linear
//! |   2   |    0    |    0     |   n   | c(n-1) ... c1 c0 (n coefficients) |  polynomial
//! ```
//!
//! Rows `[0, G)` hold active-power costs, rows `[G, 2G)` (present only when a
//! reactive cost exists) hold reactive-power costs of the same generators.

use gencost_core::CostModel;
use serde::Serialize;

use super::ObjectiveError;

pub const MODEL: usize = 0;
pub const STARTUP: usize = 1;
pub const SHUTDOWN: usize = 2;
pub const NCOST: usize = 3;
pub const COST: usize = 4;

/// Cost model code stored in the `MODEL` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GencostModel {
    PiecewiseLinear = 1,
    Polynomial = 2,
}

impl GencostModel {
    pub fn code(self) -> f64 {
        self as u8 as f64
    }

    pub fn from_code(code: f64) -> Option<Self> {
        if code == 1.0 {
            Some(GencostModel::PiecewiseLinear)
        } else if code == 2.0 {
            Some(GencostModel::Polynomial)
        } else {
            None
        }
    }
}

/// Dense row-major cost matrix handed to the solver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Number of coefficient columns after `COST`
    pub fn coefficient_width(&self) -> usize {
        self.cols.saturating_sub(COST)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.cols {
            return None;
        }
        self.row(row).map(|r| r[col])
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1))
    }

    pub fn to_vecs(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Decode one row
    pub fn gen_cost(&self, row: usize) -> Option<GenCostRow> {
        let values = self.row(row)?;
        let model = GencostModel::from_code(values[MODEL])?;
        let ncost = values[NCOST] as usize;
        let width = match model {
            GencostModel::PiecewiseLinear => 2 * ncost,
            GencostModel::Polynomial => ncost,
        };
        let end = (COST + width).min(self.cols);
        Some(GenCostRow {
            model,
            startup: values[STARTUP],
            shutdown: values[SHUTDOWN],
            ncost,
            cost: values[COST..end].to_vec(),
        })
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut [f64], ObjectiveError> {
        if row >= self.rows {
            return Err(ObjectiveError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(&mut self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Set model and count of one row and replace its coefficient tail.
    ///
    /// Columns after the written coefficients are zeroed.
    pub(crate) fn write_row(
        &mut self,
        row: usize,
        model: GencostModel,
        ncost: usize,
        coefficients: &[f64],
    ) -> Result<(), ObjectiveError> {
        let available = self.coefficient_width();
        if coefficients.len() > available {
            return Err(ObjectiveError::CoefficientOverflow {
                row,
                needed: coefficients.len(),
                available,
            });
        }
        let values = self.row_mut(row)?;
        values[MODEL] = model.code();
        values[NCOST] = ncost as f64;
        let tail = &mut values[COST..];
        tail[..coefficients.len()].copy_from_slice(coefficients);
        tail[coefficients.len()..].fill(0.0);
        Ok(())
    }

    /// Write the same row into every row of the matrix
    pub(crate) fn fill_rows(
        &mut self,
        model: GencostModel,
        ncost: usize,
        coefficients: &[f64],
    ) -> Result<(), ObjectiveError> {
        for row in 0..self.rows {
            self.write_row(row, model, ncost, coefficients)?;
        }
        Ok(())
    }

    /// Set only the model code of every row
    pub(crate) fn set_model(&mut self, model: GencostModel) {
        for row in self.data.chunks_exact_mut(self.cols.max(1)) {
            row[MODEL] = model.code();
        }
    }
}

/// One decoded cost row, shaped like a MATPOWER gencost entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenCostRow {
    pub model: GencostModel,
    pub startup: f64,
    pub shutdown: f64,
    pub ncost: usize,
    /// Polynomial: highest order first. Piecewise: `p0, f0, p1, f1, ...`
    pub cost: Vec<f64>,
}

impl GenCostRow {
    /// Curve this row charges, in solver units
    pub fn to_cost_model(&self) -> CostModel {
        if self.ncost == 0 {
            return CostModel::NoCost;
        }
        match self.model {
            GencostModel::Polynomial => {
                CostModel::Polynomial(self.cost.iter().rev().copied().collect())
            }
            GencostModel::PiecewiseLinear => CostModel::PiecewiseLinear(
                self.cost.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
            ),
        }
    }
}
