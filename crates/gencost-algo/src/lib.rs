//! # gencost-algo: OPF Objective Compilation
//!
//! Compiles the cost declarations of a grid model into the generator cost
//! matrix (`gencost`) an OPF solver minimizes.
//!
//! ## Cost Paths
//!
//! | Path | Chosen when | Row model |
//! |------|-------------|-----------|
//! | [`CostPath::PiecewiseLinear`] | any piecewise cost exists | breakpoints `p0 f0 p1 f1 ...` |
//! | [`CostPath::Polynomial`] | only polynomial costs exist | `c2 c1 c0` or `c1 c0` |
//! | [`CostPath::NoCosts`] | no costs at all | `1·P` on every generator |
//!
//! Linear polynomial costs are folded into the piecewise path as two-point
//! curves. Quadratic costs can not be, and mixing them with piecewise costs
//! fails with [`ObjectiveError::ConflictingCostModel`].
//!
//! ## Example
//!
//! ```
//! use gencost_algo::{make_objective, ObjectiveInput};
//! use gencost_core::{CostTables, FlatGen, GenLookups, LookupNamespace};
//!
//! let gens = vec![FlatGen::new(0.0, 10.0); 3];
//! let lookups =
//!     GenLookups::new().with_namespace(LookupNamespace::Gen, [Some(0), Some(1), Some(2)]);
//! let costs = CostTables::new();
//!
//! let gencost = make_objective(&ObjectiveInput::new(&gens, &lookups, &costs)).unwrap();
//! assert_eq!(gencost.nrows(), 3);
//! assert_eq!(gencost.get(0, 4), Some(1.0));
//! ```

pub mod opf;

pub use opf::{
    make_objective, CostMatrix, CostPath, GenCostRow, GencostModel, ObjectiveCompiler,
    ObjectiveConfig, ObjectiveError, ObjectiveInput,
};
