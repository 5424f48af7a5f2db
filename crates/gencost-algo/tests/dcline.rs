//! DC line cost tests
//!
//! Network: two external grids feeding a load through a DC line (id 4).
//! Flat generator rows: ext_grid 0 | ext_grid 1 | dcline 4 sending | dcline 4 receiving

use gencost_algo::make_objective;
use gencost_algo::opf::{
    gencost::{COST, NCOST},
    IndexResolver, ObjectiveInput,
};
use gencost_core::{
    CostTables, DcLineRecord, ElementRecord, ElementType, FlatGenIndex, GridElementRef,
    OpfGenLayout, PiecewiseCostSpec, PolynomialCostSpec, PowerChannel,
};

fn dcline_layout() -> OpfGenLayout {
    OpfGenLayout::builder()
        .ext_grid(ElementRecord::new(0).with_p_limits_kw(0.0, 1e12))
        .ext_grid(ElementRecord::new(1).with_p_limits_kw(0.0, 1e12))
        .dcline(DcLineRecord::new(4, 1e6))
        .load(ElementRecord::new(0).with_p_limits_kw(800e3, 800e3))
        .build()
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

#[test]
fn test_dcline_resolves_to_receiving_side() {
    let layout = dcline_layout();
    assert_eq!(layout.gen_count(), 4);

    let resolver = IndexResolver::new(&layout.lookups);
    let dcline = GridElementRef::new(ElementType::DcLine, 4);
    assert_eq!(resolver.resolve(dcline), Some(FlatGenIndex::new(3)));
    // the load is not controllable
    assert_eq!(
        resolver.resolve(GridElementRef::new(ElementType::Load, 0)),
        None
    );

    let receiving = layout.gens[3];
    assert_eq!(receiving.pmin.value(), 0.0);
    assert_eq!(receiving.pmax.value(), 1000.0);
}

#[test]
fn test_piecewise_costs_on_external_grids() {
    let layout = dcline_layout();
    let mut costs = CostTables::new();
    costs
        .add_pwl(PiecewiseCostSpec::new(
            GridElementRef::new(ElementType::ExtGrid, 0),
            PowerChannel::Active,
            [(-1e12, 1e12, 0.1)],
        ))
        .add_pwl(PiecewiseCostSpec::new(
            GridElementRef::new(ElementType::ExtGrid, 1),
            PowerChannel::Active,
            [(-1e12, 1e12, 0.08)],
        ));

    let gencost = make_objective(&ObjectiveInput::from_layout(&layout, &costs)).unwrap();

    assert_eq!(gencost.nrows(), 4);
    assert_eq!(gencost.ncols(), COST + 6);

    let expected = [
        [-1e9, -1e11, 1e9, 1e11],
        [-1e9, -8e10, 1e9, 8e10],
    ];
    for (row, exp) in expected.iter().enumerate() {
        let values = gencost.row(row).unwrap();
        assert_eq!(values[NCOST], 2.0);
        for (a, e) in values[COST..COST + 4].iter().zip(exp) {
            assert!(close(*a, *e), "row {}: {:?}", row, values);
        }
    }

    // DC line rows keep the flat placeholder curve
    for row in 2..4 {
        assert_eq!(
            gencost.row(row).unwrap(),
            [1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]
        );
    }
}

#[test]
fn test_polynomial_cost_on_dcline_is_negated() {
    let layout = dcline_layout();
    let mut costs = CostTables::new();
    costs
        .add_poly(PolynomialCostSpec::linear(
            GridElementRef::new(ElementType::DcLine, 4),
            PowerChannel::Active,
            0.0,
            1.5,
        ))
        .add_poly(PolynomialCostSpec::linear(
            GridElementRef::new(ElementType::ExtGrid, 1),
            PowerChannel::Active,
            0.0,
            2.0,
        ));

    let gencost = make_objective(&ObjectiveInput::from_layout(&layout, &costs)).unwrap();

    assert_eq!(gencost.get(3, NCOST), Some(2.0));
    assert!(close(gencost.get(3, COST).unwrap(), -1500.0));
    assert!(close(gencost.get(1, COST).unwrap(), 2000.0));
    // sending side carries no cost
    assert_eq!(gencost.get(2, NCOST), Some(0.0));
}

#[test]
fn test_out_of_service_dcline_cost_is_dropped() {
    let layout = OpfGenLayout::builder()
        .ext_grid(ElementRecord::new(0))
        .gen(ElementRecord::new(0).with_p_limits_kw(0.0, 1e3))
        .dcline(DcLineRecord::new(0, 1e6))
        .dcline(DcLineRecord::new(1, 1e6).out_of_service())
        .build()
        .unwrap();
    // ext_grid 0 | gen 0 | dcline 0 sending | dcline 0 receiving
    assert_eq!(layout.gen_count(), 4);

    let mut costs = CostTables::new();
    costs
        .add_poly(PolynomialCostSpec::linear(
            GridElementRef::new(ElementType::DcLine, 1),
            PowerChannel::Active,
            0.0,
            1.0,
        ))
        .add_poly(PolynomialCostSpec::linear(
            GridElementRef::new(ElementType::DcLine, 0),
            PowerChannel::Active,
            0.0,
            1.0,
        ));

    let gencost = make_objective(&ObjectiveInput::from_layout(&layout, &costs)).unwrap();

    let costed: Vec<usize> = (0..gencost.nrows())
        .filter(|&row| gencost.get(row, NCOST) == Some(2.0))
        .collect();
    assert_eq!(costed, vec![3]);
    assert_eq!(gencost.get(3, COST), Some(-1000.0));
}
