//! OPF objective compilation.
//!
//! Turns per-element cost declarations into the `gencost` matrix the OPF
//! solver consumes, one row per flat generator (plus one per generator for
//! reactive costs).
//!
//! # Pipeline
//!
//! ```text
//! CostTables ──► bind (IndexResolver) ──► integrate (piecewise only) ──► CostMatrix
//! ```
//!
//! - [`IndexResolver`]: element reference to flat generator row
//! - [`bind`]: drops declarations of elements outside the OPF problem, attaches signs
//! - [`integrate`]: marginal-cost segments to cumulative breakpoints
//! - [`MatrixAssembler`]: sizes the matrix and picks one [`CostPath`]
//!
//! # Example
//!
//! ```
//! use gencost_algo::opf::{ObjectiveCompiler, ObjectiveInput};
//! use gencost_core::{
//!     CostTables, ElementRecord, ElementType, GridElementRef, OpfGenLayout,
//!     PiecewiseCostSpec, PowerChannel,
//! };
//!
//! let layout = OpfGenLayout::builder()
//!     .ext_grid(ElementRecord::new(0))
//!     .gen(ElementRecord::new(0).with_p_limits_kw(0.0, 100_000.0))
//!     .build()
//!     .unwrap();
//!
//! let mut costs = CostTables::new();
//! costs.add_pwl(PiecewiseCostSpec::new(
//!     GridElementRef::new(ElementType::Gen, 0),
//!     PowerChannel::Active,
//!     [(0.0, 100.0, 2.0)],
//! ));
//!
//! let gencost = ObjectiveCompiler::new()
//!     .compile(&ObjectiveInput::from_layout(&layout, &costs))
//!     .unwrap();
//! assert_eq!(gencost.nrows(), 2);
//! assert_eq!(gencost.row(1).unwrap()[4..8], [0.0, 0.0, 0.1, 200.0]);
//! ```

mod assembler;
mod binder;
mod config;
mod error;
pub mod gencost;
mod resolver;
mod segments;

pub use assembler::{plan, CostPath, MatrixAssembler, MatrixPlan};
pub use binder::{bind, cost_sign, BoundCosts};
pub use config::ObjectiveConfig;
pub use error::ObjectiveError;
pub use gencost::{CostMatrix, GenCostRow, GencostModel};
pub use resolver::{IndexResolver, ResolveStrategy};
pub use segments::integrate;

use gencost_core::{CostTables, Diagnostics, FlatGen, GenLookups, GencostResult, OpfGenLayout};
use tracing::debug;

/// Everything one compilation reads
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveInput<'a> {
    /// Flat generator array, one entry per matrix row
    pub gens: &'a [FlatGen],
    pub lookups: &'a GenLookups,
    pub costs: &'a CostTables,
}

impl<'a> ObjectiveInput<'a> {
    pub fn new(gens: &'a [FlatGen], lookups: &'a GenLookups, costs: &'a CostTables) -> Self {
        Self {
            gens,
            lookups,
            costs,
        }
    }

    pub fn from_layout(layout: &'a OpfGenLayout, costs: &'a CostTables) -> Self {
        Self::new(&layout.gens, &layout.lookups, costs)
    }
}

/// Objective compiler with builder-style configuration.
///
/// ```
/// use gencost_algo::opf::{ObjectiveCompiler, ObjectiveConfig};
/// use gencost_core::PowerUnit;
///
/// let compiler = ObjectiveCompiler::new()
///     .with_config(ObjectiveConfig::default().with_cost_unit(PowerUnit::Mw));
/// assert_eq!(compiler.config().per_mw(), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectiveCompiler {
    config: ObjectiveConfig,
}

impl ObjectiveCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ObjectiveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ObjectiveConfig {
        &self.config
    }

    /// Compile the cost matrix, discarding diagnostics
    pub fn compile(&self, input: &ObjectiveInput<'_>) -> Result<CostMatrix, ObjectiveError> {
        self.compile_into(input, &mut Diagnostics::new())
    }

    /// Compile the cost matrix, reporting non-fatal findings into `diag`
    pub fn compile_into(
        &self,
        input: &ObjectiveInput<'_>,
        diag: &mut Diagnostics,
    ) -> Result<CostMatrix, ObjectiveError> {
        self.config.validate()?;
        debug!(
            "Compiling objective: {} generators, {} polynomial and {} piecewise costs",
            input.gens.len(),
            input.costs.poly.len(),
            input.costs.pwl.len()
        );
        MatrixAssembler::new(*input, &self.config).assemble(diag)
    }

    /// Validate the cost tables, then compile.
    ///
    /// Table errors (duplicate declarations, non-finite coefficients) fail
    /// with [`gencost_core::GencostError::Validation`].
    pub fn compile_checked(
        &self,
        input: &ObjectiveInput<'_>,
        diag: &mut Diagnostics,
    ) -> GencostResult<CostMatrix> {
        let mut table_diag = Diagnostics::new();
        input.costs.validate_into(&mut table_diag);
        let errors = table_diag.error_count();
        let first = table_diag.errors().next().map(ToString::to_string);
        diag.merge(table_diag);
        if let Some(first) = first {
            return Err(gencost_core::GencostError::Validation(format!(
                "{} invalid cost declarations, first: {}",
                errors, first
            )));
        }
        Ok(self.compile_into(input, diag)?)
    }
}

/// Compile with the default configuration
pub fn make_objective(input: &ObjectiveInput<'_>) -> Result<CostMatrix, ObjectiveError> {
    ObjectiveCompiler::new().compile(input)
}
