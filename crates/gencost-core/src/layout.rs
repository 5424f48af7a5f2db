//! Construction of the OPF generator array from element tables.
//!
//! The array is ordered: external grids, generators (the `gen` table ends with
//! two pseudo generators per DC line, sending side then receiving side),
//! controllable static generators, controllable loads, controllable storage.
//! Out-of-service elements get no row; neither do static generators, loads or
//! storage units that are not controllable.
//!
//! Element bounds are stated in kW/kvar in each element's own sign convention
//! (consumption positive for loads and storage). The flat array uses MW/Mvar in
//! injection convention, so consumer bounds are negated and swapped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ElementId, FlatGen, GenLookups, GencostError, GencostResult, Kilovars, Kilowatts,
    LookupNamespace, Megawatts,
};

fn in_service_default() -> bool {
    true
}

/// One row of a gen/sgen/load/storage/ext_grid element table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(default = "in_service_default")]
    pub in_service: bool,
    /// Only consulted for sgen, load and storage
    #[serde(default)]
    pub controllable: bool,
    pub min_p: Kilowatts,
    pub max_p: Kilowatts,
    pub min_q: Kilovars,
    pub max_q: Kilovars,
}

impl ElementRecord {
    /// An in-service, non-controllable element with `0 <= P` and unbounded `Q`.
    ///
    /// The upper active bound is infinite until [`with_p_limits_kw`] is called.
    /// A linear cost on such an element can not be folded into a two-point
    /// piecewise curve, so compiling it next to any piecewise cost fails with
    /// `UnboundedLinearCost`. The same holds for reactive linear costs and
    /// [`with_q_limits_kvar`].
    ///
    /// [`with_p_limits_kw`]: ElementRecord::with_p_limits_kw
    /// [`with_q_limits_kvar`]: ElementRecord::with_q_limits_kvar
    pub fn new(id: usize) -> Self {
        Self {
            id: ElementId::new(id),
            in_service: true,
            controllable: false,
            min_p: Kilowatts(0.0),
            max_p: Kilowatts(f64::INFINITY),
            min_q: Kilovars(f64::NEG_INFINITY),
            max_q: Kilovars(f64::INFINITY),
        }
    }

    pub fn controllable(mut self) -> Self {
        self.controllable = true;
        self
    }

    pub fn out_of_service(mut self) -> Self {
        self.in_service = false;
        self
    }

    pub fn with_p_limits_kw(mut self, min_p: f64, max_p: f64) -> Self {
        self.min_p = Kilowatts(min_p);
        self.max_p = Kilowatts(max_p);
        self
    }

    pub fn with_q_limits_kvar(mut self, min_q: f64, max_q: f64) -> Self {
        self.min_q = Kilovars(min_q);
        self.max_q = Kilovars(max_q);
        self
    }

    fn as_producer(&self) -> FlatGen {
        FlatGen {
            pmin: self.min_p.to_megawatts(),
            pmax: self.max_p.to_megawatts(),
            qmin: self.min_q.to_megavars(),
            qmax: self.max_q.to_megavars(),
        }
    }

    fn as_consumer(&self) -> FlatGen {
        FlatGen {
            pmin: -self.max_p.to_megawatts(),
            pmax: -self.min_p.to_megawatts(),
            qmin: -self.max_q.to_megavars(),
            qmax: -self.min_q.to_megavars(),
        }
    }
}

/// One row of the DC line table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcLineRecord {
    pub id: ElementId,
    #[serde(default = "in_service_default")]
    pub in_service: bool,
    pub max_p: Kilowatts,
    pub min_q_from: Kilovars,
    pub max_q_from: Kilovars,
    pub min_q_to: Kilovars,
    pub max_q_to: Kilovars,
}

impl DcLineRecord {
    pub fn new(id: usize, max_p_kw: f64) -> Self {
        Self {
            id: ElementId::new(id),
            in_service: true,
            max_p: Kilowatts(max_p_kw),
            min_q_from: Kilovars(f64::NEG_INFINITY),
            max_q_from: Kilovars(f64::INFINITY),
            min_q_to: Kilovars(f64::NEG_INFINITY),
            max_q_to: Kilovars(f64::INFINITY),
        }
    }

    pub fn out_of_service(mut self) -> Self {
        self.in_service = false;
        self
    }

    /// Sending side draws up to `max_p` from its bus
    fn from_side(&self) -> FlatGen {
        FlatGen {
            pmin: -self.max_p.to_megawatts(),
            pmax: Megawatts(0.0),
            qmin: self.min_q_from.to_megavars(),
            qmax: self.max_q_from.to_megavars(),
        }
    }

    /// Receiving side injects up to `max_p` into its bus
    fn to_side(&self) -> FlatGen {
        FlatGen {
            pmin: Megawatts(0.0),
            pmax: self.max_p.to_megawatts(),
            qmin: self.min_q_to.to_megavars(),
            qmax: self.max_q_to.to_megavars(),
        }
    }
}

/// The solver's generator array with its lookup tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpfGenLayout {
    pub gens: Vec<FlatGen>,
    pub lookups: GenLookups,
}

impl OpfGenLayout {
    pub fn builder() -> OpfGenLayoutBuilder {
        OpfGenLayoutBuilder::default()
    }

    /// Number of flat generator rows (G)
    pub fn gen_count(&self) -> usize {
        self.gens.len()
    }
}

/// Collects element tables and lays out the generator array
#[derive(Debug, Clone, Default)]
pub struct OpfGenLayoutBuilder {
    ext_grids: Vec<ElementRecord>,
    gens: Vec<ElementRecord>,
    sgens: Vec<ElementRecord>,
    loads: Vec<ElementRecord>,
    storages: Vec<ElementRecord>,
    dclines: Vec<DcLineRecord>,
}

impl OpfGenLayoutBuilder {
    pub fn ext_grid(mut self, record: ElementRecord) -> Self {
        self.ext_grids.push(record);
        self
    }

    pub fn gen(mut self, record: ElementRecord) -> Self {
        self.gens.push(record);
        self
    }

    pub fn sgen(mut self, record: ElementRecord) -> Self {
        self.sgens.push(record);
        self
    }

    pub fn load(mut self, record: ElementRecord) -> Self {
        self.loads.push(record);
        self
    }

    pub fn storage(mut self, record: ElementRecord) -> Self {
        self.storages.push(record);
        self
    }

    pub fn dcline(mut self, record: DcLineRecord) -> Self {
        self.dclines.push(record);
        self
    }

    pub fn build(self) -> GencostResult<OpfGenLayout> {
        check_unique("ext_grid", self.ext_grids.iter().map(|r| r.id))?;
        check_unique("gen", self.gens.iter().map(|r| r.id))?;
        check_unique("sgen", self.sgens.iter().map(|r| r.id))?;
        check_unique("load", self.loads.iter().map(|r| r.id))?;
        check_unique("storage", self.storages.iter().map(|r| r.id))?;
        check_unique("dcline", self.dclines.iter().map(|r| r.id))?;

        let mut gens = Vec::new();
        let mut lookups = GenLookups::new();

        let table = place(&mut gens, &self.ext_grids, |r| {
            r.in_service.then(|| r.as_producer())
        });
        lookups.insert_namespace(LookupNamespace::ExtGrid, table);

        // gen table: real generators, then one (from, to) pair per DC line
        let mut gen_table = place(&mut gens, &self.gens, |r| {
            r.in_service.then(|| r.as_producer())
        });
        for dcline in &self.dclines {
            for side in [dcline.from_side(), dcline.to_side()] {
                gen_table.push(dcline.in_service.then(|| {
                    gens.push(side);
                    gens.len() - 1
                }));
            }
        }
        lookups.insert_namespace(LookupNamespace::Gen, gen_table);
        lookups = lookups.with_dclines(self.dclines.iter().map(|d| d.id.value()));

        let controllable = |r: &ElementRecord| r.in_service && r.controllable;
        let table = place(&mut gens, &self.sgens, |r| {
            controllable(r).then(|| r.as_producer())
        });
        lookups.insert_namespace(LookupNamespace::SgenControllable, table);
        let table = place(&mut gens, &self.loads, |r| {
            controllable(r).then(|| r.as_consumer())
        });
        lookups.insert_namespace(LookupNamespace::LoadControllable, table);
        let table = place(&mut gens, &self.storages, |r| {
            controllable(r).then(|| r.as_consumer())
        });
        lookups.insert_namespace(LookupNamespace::StorageControllable, table);

        debug!(
            "OPF generator array: {} rows, {} DC lines",
            gens.len(),
            self.dclines.len()
        );
        Ok(OpfGenLayout { gens, lookups })
    }
}

/// Append the selected records to `gens` in table order and return the
/// id-indexed lookup table for them.
fn place(
    gens: &mut Vec<FlatGen>,
    records: &[ElementRecord],
    select: impl Fn(&ElementRecord) -> Option<FlatGen>,
) -> Vec<Option<usize>> {
    let len = records.iter().map(|r| r.id.value() + 1).max().unwrap_or(0);
    let mut table = vec![None; len];
    for record in records {
        if let Some(flat) = select(record) {
            gens.push(flat);
            table[record.id.value()] = Some(gens.len() - 1);
        }
    }
    table
}

fn check_unique(table: &str, ids: impl Iterator<Item = ElementId>) -> GencostResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(GencostError::Validation(format!(
                "{} table has duplicate id {}",
                table,
                id.value()
            )));
        }
    }
    Ok(())
}
