//! Binding of cost declarations to generator-array rows.

use gencost_core::{CostDeclaration, ElementType, FlatGenIndex};
use tracing::debug;

use super::IndexResolver;

/// Sign applied to a cost of the given element type.
///
/// The solver treats consumption as negative injection, so costs of
/// consuming elements (load, storage, the receiving side of a DC line) are
/// inverted relative to producers.
pub fn cost_sign(element_type: ElementType) -> f64 {
    if element_type.is_consumer() {
        -1.0
    } else {
        1.0
    }
}

/// Declarations that resolved to a row, in input order
#[derive(Debug, Clone)]
pub struct BoundCosts<'a, T> {
    pub indices: Vec<FlatGenIndex>,
    pub costs: Vec<&'a T>,
    pub signs: Vec<f64>,
}

impl<'a, T> BoundCosts<'a, T> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlatGenIndex, &'a T, f64)> + '_ {
        self.indices
            .iter()
            .zip(&self.costs)
            .zip(&self.signs)
            .map(|((index, cost), sign)| (*index, *cost, *sign))
    }
}

/// Resolve every declaration of `batch`, dropping those whose element is not
/// part of the generator array.
pub fn bind<'a, T, I>(resolver: &IndexResolver<'_>, batch: I) -> BoundCosts<'a, T>
where
    T: CostDeclaration + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut bound = BoundCosts {
        indices: Vec::new(),
        costs: Vec::new(),
        signs: Vec::new(),
    };
    for cost in batch {
        let element = cost.element();
        match resolver.resolve(element) {
            Some(index) => {
                bound.indices.push(index);
                bound.costs.push(cost);
                bound.signs.push(cost_sign(element.element_type));
            }
            None => debug!(
                "ignoring {} cost of {}: not in the OPF generator array",
                cost.channel(),
                element
            ),
        }
    }
    bound
}
