//! Element reference to generator-array row resolution.

use gencost_core::{ElementType, FlatGenIndex, GenLookups, GridElementRef, LookupNamespace};

/// How an element type finds its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Always present in its namespace while in service
    Direct(LookupNamespace),
    /// Only present when selected as controllable
    ControllableSubset(LookupNamespace),
    /// Receiving-side pseudo generator of a DC line in the `gen` table
    DcLinePair,
}

impl ResolveStrategy {
    pub fn for_element(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Gen => ResolveStrategy::Direct(LookupNamespace::Gen),
            ElementType::ExtGrid => ResolveStrategy::Direct(LookupNamespace::ExtGrid),
            ElementType::Sgen => {
                ResolveStrategy::ControllableSubset(LookupNamespace::SgenControllable)
            }
            ElementType::Load => {
                ResolveStrategy::ControllableSubset(LookupNamespace::LoadControllable)
            }
            ElementType::Storage => {
                ResolveStrategy::ControllableSubset(LookupNamespace::StorageControllable)
            }
            ElementType::DcLine => ResolveStrategy::DcLinePair,
        }
    }
}

/// Resolves element references against the lookup tables of one OPF run.
///
/// `None` means the element does not take part in the OPF problem; callers
/// filter it out rather than treating it as a failure.
#[derive(Debug, Clone, Copy)]
pub struct IndexResolver<'a> {
    lookups: &'a GenLookups,
}

impl<'a> IndexResolver<'a> {
    pub fn new(lookups: &'a GenLookups) -> Self {
        Self { lookups }
    }

    pub fn resolve(&self, element: GridElementRef) -> Option<FlatGenIndex> {
        let id = element.element_id;
        match ResolveStrategy::for_element(element.element_type) {
            ResolveStrategy::Direct(ns) | ResolveStrategy::ControllableSubset(ns) => {
                self.lookups.lookup(ns, id.value())
            }
            ResolveStrategy::DcLinePair => {
                let position = self.lookups.dcline_position(id)?;
                let slot = self.receiving_slot(position)?;
                self.lookups.lookup(LookupNamespace::Gen, slot)
            }
        }
    }

    /// `gen` table id of the receiving pseudo generator of the DC line at
    /// `position`. The table ends with one (sending, receiving) pair per line.
    fn receiving_slot(&self, position: usize) -> Option<usize> {
        let pairs_start = self
            .lookups
            .gen_table_len()
            .checked_sub(2 * self.lookups.dcline_count())?;
        Some(pairs_start + 2 * position + 1)
    }
}
