//! Cost matrix assembly.
//!
//! One compilation picks exactly one [`CostPath`]:
//!
//! 1. `PiecewiseLinear` if any piecewise declaration exists; linear polynomial
//!    declarations are folded in as two-point curves
//! 2. `Polynomial` if only polynomial declarations exist
//! 3. `NoCosts` otherwise: every generator gets the linear cost `1·P`
//!
//! Any error aborts the compilation and drops the partially written matrix.

use std::collections::BTreeMap;

use gencost_core::{
    CostDeclaration, Diagnostics, ElementType, FlatGenIndex, IssueCategory, PiecewiseCostSpec,
    PolynomialCostSpec, PowerChannel,
};
use tracing::{debug, info, warn};

use super::binder::bind;
use super::gencost::{CostMatrix, GencostModel, COST};
use super::segments::integrate;
use super::{IndexResolver, ObjectiveConfig, ObjectiveError, ObjectiveInput};

/// The global cost model of one compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostPath {
    NoCosts,
    PiecewiseLinear,
    Polynomial,
}

impl CostPath {
    pub fn select(input: &ObjectiveInput<'_>) -> Self {
        if !input.costs.pwl.is_empty() {
            CostPath::PiecewiseLinear
        } else if !input.costs.poly.is_empty() {
            CostPath::Polynomial
        } else {
            CostPath::NoCosts
        }
    }
}

/// Matrix dimensions and flags decided before any row is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixPlan {
    pub path: CostPath,
    pub gen_count: usize,
    pub rows: usize,
    pub cols: usize,
    pub reactive: bool,
    pub quadratic: bool,
}

/// Decide path and matrix shape, rejecting inputs that can not be compiled
/// at all.
pub fn plan(
    input: &ObjectiveInput<'_>,
    config: &ObjectiveConfig,
) -> Result<MatrixPlan, ObjectiveError> {
    let costs = input.costs;
    let path = CostPath::select(input);
    let gen_count = input.gens.len();

    let reactive = costs.poly.iter().any(|c| c.channel == PowerChannel::Reactive)
        || costs.pwl.iter().any(|c| c.channel == PowerChannel::Reactive);
    let quadratic_count = costs.poly.iter().filter(|c| c.is_quadratic()).count();
    let quadratic = quadratic_count > 0;

    let width = match path {
        CostPath::PiecewiseLinear => {
            if quadratic {
                return Err(ObjectiveError::ConflictingCostModel {
                    piecewise: costs.pwl.len(),
                    quadratic: quadratic_count,
                });
            }
            let segments = costs
                .pwl
                .iter()
                .map(PiecewiseCostSpec::segment_count)
                .max()
                .unwrap_or(0)
                .max(config.min_pwl_segments);
            2 * (segments + 1)
        }
        CostPath::Polynomial if quadratic => 3,
        CostPath::Polynomial | CostPath::NoCosts => 2,
    };

    Ok(MatrixPlan {
        path,
        gen_count,
        rows: if reactive { 2 * gen_count } else { gen_count },
        cols: COST + width,
        reactive,
        quadratic,
    })
}

/// Builds the cost matrix of one OPF run
pub struct MatrixAssembler<'a> {
    input: ObjectiveInput<'a>,
    config: &'a ObjectiveConfig,
    resolver: IndexResolver<'a>,
}

impl<'a> MatrixAssembler<'a> {
    pub fn new(input: ObjectiveInput<'a>, config: &'a ObjectiveConfig) -> Self {
        Self {
            resolver: IndexResolver::new(input.lookups),
            input,
            config,
        }
    }

    pub fn assemble(&self, diag: &mut Diagnostics) -> Result<CostMatrix, ObjectiveError> {
        let plan = plan(&self.input, self.config)?;
        let mut matrix = CostMatrix::zeros(plan.rows, plan.cols);

        match plan.path {
            CostPath::PiecewiseLinear => self.fill_piecewise(&plan, &mut matrix)?,
            CostPath::Polynomial => self.fill_polynomial(&plan, &mut matrix)?,
            CostPath::NoCosts => {
                warn!("no costs are given - overall generated power is minimized");
                diag.add_warning(
                    IssueCategory::Objective,
                    "no costs are given, overall generated power is minimized",
                );
                matrix.fill_rows(GencostModel::Polynomial, 2, &[1.0, 0.0])?;
            }
        }

        info!(
            "Cost matrix: {:?}, {} rows x {} columns ({} generators, reactive={})",
            plan.path, plan.rows, plan.cols, plan.gen_count, plan.reactive
        );
        Ok(matrix)
    }

    fn fill_piecewise(
        &self,
        plan: &MatrixPlan,
        matrix: &mut CostMatrix,
    ) -> Result<(), ObjectiveError> {
        // a flat curve through (0, 0) and (1, 0) for generators without costs
        matrix.fill_rows(GencostModel::PiecewiseLinear, 2, &[0.0, 0.0, 1.0, 0.0])?;

        let per_mw = self.config.per_mw();
        for ((channel, element_type), group) in group_by_kind(&self.input.costs.pwl) {
            let bound = bind(&self.resolver, group);
            debug!(
                "{} piecewise {} costs of {} bound",
                bound.len(),
                channel,
                element_type
            );
            for (index, cost, sign) in bound.iter() {
                if cost.segments.is_empty() {
                    continue;
                }
                let row = target_row(index, channel, plan.gen_count)?;
                let breakpoints = integrate(cost.element, &cost.segments, sign, per_mw)?;
                matrix.write_row(
                    row,
                    GencostModel::PiecewiseLinear,
                    breakpoints.len() / 2,
                    &breakpoints,
                )?;
            }
        }

        self.add_linear_as_piecewise(plan, matrix)
    }

    /// Write every linear polynomial cost as a two-point curve between the
    /// generator's bounds. The constant term has no piecewise counterpart.
    fn add_linear_as_piecewise(
        &self,
        plan: &MatrixPlan,
        matrix: &mut CostMatrix,
    ) -> Result<(), ObjectiveError> {
        let per_mw = self.config.per_mw();
        for (channel, group) in group_by_channel(&self.input.costs.poly) {
            let bound = bind(&self.resolver, group);
            for (index, cost, sign) in bound.iter() {
                let row = target_row(index, channel, plan.gen_count)?;
                let gen = &self.input.gens[index.value()];
                let (lower, upper) = match channel {
                    PowerChannel::Active => (gen.pmin.value(), gen.pmax.value()),
                    PowerChannel::Reactive => (gen.qmin.value(), gen.qmax.value()),
                };
                if !(lower.is_finite() && upper.is_finite()) {
                    return Err(ObjectiveError::UnboundedLinearCost {
                        element: cost.element,
                        channel,
                    });
                }
                let slope = cost.c1 * per_mw * sign;
                matrix.write_row(
                    row,
                    GencostModel::PiecewiseLinear,
                    2,
                    &[lower, lower * slope, upper, upper * slope],
                )?;
            }
        }
        Ok(())
    }

    fn fill_polynomial(
        &self,
        plan: &MatrixPlan,
        matrix: &mut CostMatrix,
    ) -> Result<(), ObjectiveError> {
        matrix.set_model(GencostModel::Polynomial);

        let per_mw = self.config.per_mw();
        for (channel, group) in group_by_channel(&self.input.costs.poly) {
            let bound = bind(&self.resolver, group);
            debug!("{} polynomial {} costs bound", bound.len(), channel);
            for (index, cost, sign) in bound.iter() {
                let row = target_row(index, channel, plan.gen_count)?;
                let c1 = cost.c1 * per_mw * sign;
                let c0 = cost.c0 * sign;
                if plan.quadratic {
                    let c2 = cost.c2 * per_mw * per_mw * sign;
                    matrix.write_row(row, GencostModel::Polynomial, 3, &[c2, c1, c0])?;
                } else {
                    matrix.write_row(row, GencostModel::Polynomial, 2, &[c1, c0])?;
                }
            }
        }
        Ok(())
    }
}

/// Matrix row of a bound generator; reactive rows follow all active rows.
fn target_row(
    index: FlatGenIndex,
    channel: PowerChannel,
    gen_count: usize,
) -> Result<usize, ObjectiveError> {
    let index = index.value();
    if index >= gen_count {
        return Err(ObjectiveError::RowOutOfRange {
            row: index,
            rows: gen_count,
        });
    }
    Ok(match channel {
        PowerChannel::Active => index,
        PowerChannel::Reactive => index + gen_count,
    })
}

fn group_by_kind(
    costs: &[PiecewiseCostSpec],
) -> BTreeMap<(PowerChannel, ElementType), Vec<&PiecewiseCostSpec>> {
    let mut groups: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for cost in costs {
        groups
            .entry((cost.channel(), cost.element().element_type))
            .or_default()
            .push(cost);
    }
    groups
}

fn group_by_channel(
    costs: &[PolynomialCostSpec],
) -> BTreeMap<PowerChannel, Vec<&PolynomialCostSpec>> {
    let mut groups: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for cost in costs {
        groups.entry(cost.channel()).or_default().push(cost);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use gencost_core::{CostTables, FlatGen, GenLookups, GridElementRef, LookupNamespace};

    fn gens(n: usize) -> Vec<FlatGen> {
        (0..n).map(|_| FlatGen::new(0.0, 100.0)).collect()
    }

    fn gen_lookups(n: usize) -> GenLookups {
        GenLookups::new().with_namespace(LookupNamespace::Gen, (0..n).map(Some))
    }

    fn gen(id: usize) -> GridElementRef {
        GridElementRef::new(ElementType::Gen, id)
    }

    #[test]
    fn test_plan_selects_path() {
        let gens = gens(2);
        let lookups = gen_lookups(2);
        let config = ObjectiveConfig::default();

        let mut costs = CostTables::new();
        let input = ObjectiveInput::new(&gens, &lookups, &costs);
        assert_eq!(plan(&input, &config).unwrap().path, CostPath::NoCosts);

        costs.add_poly(PolynomialCostSpec::linear(gen(0), PowerChannel::Active, 0.0, 1.0));
        let input = ObjectiveInput::new(&gens, &lookups, &costs);
        let p = plan(&input, &config).unwrap();
        assert_eq!(p.path, CostPath::Polynomial);
        assert_eq!((p.rows, p.cols), (2, COST + 2));

        costs.add_pwl(PiecewiseCostSpec::new(
            gen(1),
            PowerChannel::Reactive,
            [(0.0, 1.0, 1.0), (1.0, 2.0, 1.0), (2.0, 3.0, 1.0)],
        ));
        let input = ObjectiveInput::new(&gens, &lookups, &costs);
        let p = plan(&input, &config).unwrap();
        assert_eq!(p.path, CostPath::PiecewiseLinear);
        assert!(p.reactive);
        assert_eq!((p.rows, p.cols), (4, COST + 8));
    }

    #[test]
    fn test_plan_pwl_width_has_a_floor() {
        let gens = gens(1);
        let lookups = gen_lookups(1);
        let mut costs = CostTables::new();
        costs.add_pwl(PiecewiseCostSpec::new(
            gen(0),
            PowerChannel::Active,
            [(0.0, 1.0, 1.0)],
        ));
        let input = ObjectiveInput::new(&gens, &lookups, &costs);

        let p = plan(&input, &ObjectiveConfig::default()).unwrap();
        assert_eq!(p.cols, COST + 6);

        let config = ObjectiveConfig::default().with_min_pwl_segments(1);
        assert_eq!(plan(&input, &config).unwrap().cols, COST + 4);
    }

    #[test]
    fn test_target_row() {
        assert_eq!(target_row(FlatGenIndex::new(1), PowerChannel::Active, 3), Ok(1));
        assert_eq!(target_row(FlatGenIndex::new(1), PowerChannel::Reactive, 3), Ok(4));
        assert_eq!(
            target_row(FlatGenIndex::new(3), PowerChannel::Active, 3),
            Err(ObjectiveError::RowOutOfRange { row: 3, rows: 3 })
        );
    }

    #[test]
    fn test_out_of_range_lookup_aborts() {
        let gens = gens(1);
        // lookup table disagrees with the generator array
        let lookups = GenLookups::new().with_namespace(LookupNamespace::Gen, [Some(4)]);
        let mut costs = CostTables::new();
        costs.add_poly(PolynomialCostSpec::linear(gen(0), PowerChannel::Active, 0.0, 1.0));
        let input = ObjectiveInput::new(&gens, &lookups, &costs);
        let config = ObjectiveConfig::default();

        let err = MatrixAssembler::new(input, &config)
            .assemble(&mut Diagnostics::new())
            .unwrap_err();
        assert_eq!(err, ObjectiveError::RowOutOfRange { row: 4, rows: 1 });
    }

    #[test]
    fn test_groups_are_ordered() {
        let costs = vec![
            PiecewiseCostSpec::new(
                GridElementRef::new(ElementType::Load, 0),
                PowerChannel::Reactive,
                [(0.0, 1.0, 1.0)],
            ),
            PiecewiseCostSpec::new(gen(0), PowerChannel::Active, [(0.0, 1.0, 1.0)]),
            PiecewiseCostSpec::new(gen(1), PowerChannel::Active, [(0.0, 1.0, 1.0)]),
        ];
        let groups = group_by_kind(&costs);
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                (PowerChannel::Active, ElementType::Gen),
                (PowerChannel::Reactive, ElementType::Load),
            ]
        );
        assert_eq!(groups[&(PowerChannel::Active, ElementType::Gen)].len(), 2);
    }
}
