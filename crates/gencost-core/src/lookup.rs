//! Element-to-row lookups of the OPF generator array.
//!
//! Every element type that can carry a cost lands in the flat generator array
//! through one of five namespaces. Generators and external grids are always
//! looked up directly; static generators, loads and storage only appear in
//! their `*_controllable` namespace when they were selected as controllable.
//! DC lines have no namespace of their own: each line owns two consecutive
//! pseudo generators at the tail of the `gen` table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ElementId, Megavars, Megawatts};

/// Row of the solver's generator array
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatGenIndex(usize);

impl FlatGenIndex {
    #[inline]
    pub fn new(value: usize) -> Self {
        FlatGenIndex(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Feasible region of one flat generator row, in solver units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatGen {
    pub pmin: Megawatts,
    pub pmax: Megawatts,
    pub qmin: Megavars,
    pub qmax: Megavars,
}

impl Default for FlatGen {
    fn default() -> Self {
        Self {
            pmin: Megawatts(0.0),
            pmax: Megawatts(f64::INFINITY),
            qmin: Megavars(f64::NEG_INFINITY),
            qmax: Megavars(f64::INFINITY),
        }
    }
}

impl FlatGen {
    pub fn new(pmin_mw: f64, pmax_mw: f64) -> Self {
        Self {
            pmin: Megawatts(pmin_mw),
            pmax: Megawatts(pmax_mw),
            ..Self::default()
        }
    }

    pub fn with_q_limits(mut self, qmin_mvar: f64, qmax_mvar: f64) -> Self {
        self.qmin = Megavars(qmin_mvar);
        self.qmax = Megavars(qmax_mvar);
        self
    }
}

/// Lookup namespace of the generator array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupNamespace {
    Gen,
    ExtGrid,
    SgenControllable,
    LoadControllable,
    StorageControllable,
}

impl LookupNamespace {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupNamespace::Gen => "gen",
            LookupNamespace::ExtGrid => "ext_grid",
            LookupNamespace::SgenControllable => "sgen_controllable",
            LookupNamespace::LoadControllable => "load_controllable",
            LookupNamespace::StorageControllable => "storage_controllable",
        }
    }
}

/// Lookup tables of one OPF run.
///
/// Each namespace is an id-indexed table: position `i` holds the flat row of
/// the element with id `i`, or `None` when that element exists but is not part
/// of the generator array (out of service, not controllable).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenLookups {
    #[serde(default)]
    namespaces: HashMap<LookupNamespace, Vec<Option<FlatGenIndex>>>,
    /// DC line ids in table order
    #[serde(default)]
    dclines: Vec<ElementId>,
}

impl GenLookups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) one namespace
    pub fn with_namespace(
        mut self,
        namespace: LookupNamespace,
        table: impl IntoIterator<Item = Option<usize>>,
    ) -> Self {
        self.insert_namespace(namespace, table);
        self
    }

    pub fn insert_namespace(
        &mut self,
        namespace: LookupNamespace,
        table: impl IntoIterator<Item = Option<usize>>,
    ) {
        let table = table
            .into_iter()
            .map(|row| row.map(FlatGenIndex::new))
            .collect();
        self.namespaces.insert(namespace, table);
    }

    /// Set the ordered DC line ids
    pub fn with_dclines(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.dclines = ids.into_iter().map(ElementId::new).collect();
        self
    }

    pub fn namespace(&self, namespace: LookupNamespace) -> Option<&[Option<FlatGenIndex>]> {
        self.namespaces.get(&namespace).map(Vec::as_slice)
    }

    /// Flat row of `id` in `namespace`.
    ///
    /// `None` when the namespace is missing, the id lies beyond the populated
    /// range, or the element is not part of the generator array.
    pub fn lookup(&self, namespace: LookupNamespace, id: usize) -> Option<FlatGenIndex> {
        self.namespace(namespace)?.get(id).copied().flatten()
    }

    /// Length of the `gen` table, DC line pseudo generators included
    pub fn gen_table_len(&self) -> usize {
        self.namespace(LookupNamespace::Gen).map_or(0, <[_]>::len)
    }

    pub fn dclines(&self) -> &[ElementId] {
        &self.dclines
    }

    pub fn dcline_count(&self) -> usize {
        self.dclines.len()
    }

    /// Position of a DC line in table order
    pub fn dcline_position(&self, id: ElementId) -> Option<usize> {
        self.dclines.iter().position(|d| *d == id)
    }
}
