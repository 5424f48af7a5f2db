//! # gencost-core: OPF Cost Data Model
//!
//! Data structures shared between the grid model and the cost compiler in
//! `gencost-algo`.
//!
//! ## Two views of the same generators
//!
//! A grid model knows *elements*: generators, static generators, loads,
//! storage units, external grids and DC lines, each addressed by its own table
//! and id. An OPF solver only knows an anonymous array of generator rows
//! `0..G`. The types here describe both sides of that boundary:
//!
//! - [`GridElementRef`] - an `(element type, element id)` lookup key
//! - [`PolynomialCostSpec`] / [`PiecewiseCostSpec`] - cost declarations attached
//!   to elements, collected in [`CostTables`]
//! - [`FlatGen`] / [`FlatGenIndex`] - a row of the solver's generator array
//! - [`GenLookups`] - per element type, which flat row an element landed in
//! - [`OpfGenLayout`] - builds the flat array and its lookups from element tables
//!
//! ## Quick Start
//!
//! ```rust
//! use gencost_core::*;
//!
//! let layout = OpfGenLayout::builder()
//!     .ext_grid(ElementRecord::new(0).with_p_limits_kw(0.0, 1e6))
//!     .gen(ElementRecord::new(0).with_p_limits_kw(0.0, 5e4))
//!     .load(ElementRecord::new(0).controllable().with_p_limits_kw(0.0, 2e4))
//!     .build()
//!     .unwrap();
//! assert_eq!(layout.gen_count(), 3);
//!
//! let mut costs = CostTables::new();
//! costs.add_poly(PolynomialCostSpec::linear(
//!     GridElementRef::new(ElementType::Gen, 0),
//!     PowerChannel::Active,
//!     0.0,
//!     0.05,
//! ));
//! assert_eq!(costs.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

pub mod cost_model;
pub mod costs;
pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod lookup;
pub mod units;

pub use cost_model::CostModel;
pub use costs::{CostDeclaration, CostSegment, CostTables, PiecewiseCostSpec, PolynomialCostSpec};
pub use diagnostics::{DiagnosticIssue, Diagnostics, IssueCategory, Severity};
pub use error::{GencostError, GencostResult};
pub use layout::{DcLineRecord, ElementRecord, OpfGenLayout, OpfGenLayoutBuilder};
pub use lookup::{FlatGen, FlatGenIndex, GenLookups, LookupNamespace};
pub use units::{Kilovars, Kilowatts, Megavars, Megawatts, PowerUnit};

/// Kind of grid element a cost can be attached to.
///
/// Serialized with the short table names of the grid model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementType {
    #[serde(rename = "gen")]
    Gen,
    #[serde(rename = "sgen")]
    Sgen,
    #[serde(rename = "load")]
    Load,
    #[serde(rename = "storage")]
    Storage,
    #[serde(rename = "ext_grid")]
    ExtGrid,
    #[serde(rename = "dcline")]
    DcLine,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Gen,
        ElementType::Sgen,
        ElementType::Load,
        ElementType::Storage,
        ElementType::ExtGrid,
        ElementType::DcLine,
    ];

    /// Table name used by the grid model
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Gen => "gen",
            ElementType::Sgen => "sgen",
            ElementType::Load => "load",
            ElementType::Storage => "storage",
            ElementType::ExtGrid => "ext_grid",
            ElementType::DcLine => "dcline",
        }
    }

    /// Elements whose positive power is consumption rather than injection.
    ///
    /// DC lines count as consumers: their cost is attached to the receiving
    /// pseudo generator, which draws power out of the sending side.
    pub fn is_consumer(self) -> bool {
        matches!(
            self,
            ElementType::Load | ElementType::Storage | ElementType::DcLine
        )
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementType {
    type Err = GencostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gen" | "generator" => Ok(ElementType::Gen),
            "sgen" | "static_generator" => Ok(ElementType::Sgen),
            "load" => Ok(ElementType::Load),
            "storage" => Ok(ElementType::Storage),
            "ext_grid" | "external_grid" => Ok(ElementType::ExtGrid),
            "dcline" | "dc_line" => Ok(ElementType::DcLine),
            _ => Err(GencostError::Parse(format!("unknown element type '{}'", s))),
        }
    }
}

/// Id of an element inside its own element table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl ElementId {
    #[inline]
    pub fn new(value: usize) -> Self {
        ElementId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Identifies a single grid component; a lookup key, not an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridElementRef {
    #[serde(rename = "et")]
    pub element_type: ElementType,
    #[serde(rename = "element")]
    pub element_id: ElementId,
}

impl GridElementRef {
    pub fn new(element_type: ElementType, element_id: usize) -> Self {
        Self {
            element_type,
            element_id: ElementId::new(element_id),
        }
    }
}

impl std::fmt::Display for GridElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.element_type, self.element_id.value())
    }
}

/// Cost dimension: active power rows `[0, G)` or reactive power rows `[G, 2G)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PowerChannel {
    #[default]
    #[serde(rename = "p")]
    Active,
    #[serde(rename = "q")]
    Reactive,
}

impl std::fmt::Display for PowerChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerChannel::Active => write!(f, "p"),
            PowerChannel::Reactive => write!(f, "q"),
        }
    }
}
