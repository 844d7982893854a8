//! Property tests for the emissions engine.

use proptest::prelude::*;

use carbon_core::calculate::outcome::CalculationResult;
use carbon_core::factors::builtin::default_table;
use carbon_core::factors::EmissionFactorTable;
use carbon_core::model::{CalculationInput, EnergyInput, MaterialInput, TransportInput};
use carbon_core::{calculate, validate_calculation_result};
use rust_decimal::Decimal;

const MATERIAL_TYPES: &[&str] = &["concrete", "Steel", "timber", "unobtainium", ""];
const TRANSPORT_MODES: &[&str] = &["truck", "rail", "sea_freight", "hovercraft"];
const ENERGY_TYPES: &[&str] = &["electricity", "diesel", "Natural Gas", "biomass"];
const INTERLEAVED_KEYS: &[&str] = &["a", "b", "c"];

fn table() -> EmissionFactorTable {
    default_table().unwrap()
}

/// Non-negative decimal with `scale` places, below `max` in whole units.
fn amount(max: i64, scale: u32) -> impl Strategy<Value = Decimal> {
    let mult = 10i64.pow(scale);
    (0..max * mult).prop_map(move |n| Decimal::new(n, scale))
}

/// Positive factor with up to 28 significant digits, spread over many
/// orders of magnitude so sums round.
fn precise_factor() -> impl Strategy<Value = Decimal> {
    (1i128..(1i128 << 90), 0u32..=28)
        .prop_map(|(mantissa, scale)| Decimal::from_i128_with_scale(mantissa, scale))
}

fn material() -> impl Strategy<Value = MaterialInput> {
    (
        prop::sample::select(MATERIAL_TYPES),
        amount(1_000_000, 3),
        prop::option::of(amount(10, 3)),
    )
        .prop_map(|(kind, quantity, factor)| {
            let mut m = MaterialInput::new(kind, quantity);
            m.carbon_footprint = factor;
            m
        })
}

fn leg() -> impl Strategy<Value = TransportInput> {
    (
        prop::option::of(prop::sample::select(TRANSPORT_MODES)),
        amount(10_000, 2),
        prop::option::of(amount(50_000, 1)),
        prop::option::of(amount(3, 2)),
    )
        .prop_map(|(mode, distance, weight, load_factor)| {
            let mut t = TransportInput::new(distance);
            t.mode = mode.map(str::to_string);
            t.weight = weight;
            t.load_factor = load_factor;
            t
        })
}

fn energy_line() -> impl Strategy<Value = EnergyInput> {
    (
        prop::sample::select(ENERGY_TYPES),
        amount(1_000_000, 2),
        prop::option::of(amount(100, 1)),
    )
        .prop_map(|(kind, amount, renewable)| {
            let mut e = EnergyInput::new(kind, amount);
            e.renewable_percentage = renewable;
            e
        })
}

fn input() -> impl Strategy<Value = CalculationInput> {
    (
        prop::collection::vec(material(), 0..6),
        prop::collection::vec(leg(), 0..4),
        prop::collection::vec(energy_line(), 0..4),
    )
        .prop_map(|(materials, transport, energy)| CalculationInput {
            materials,
            transport,
            energy,
        })
}

fn breakdown_sum(result: &CalculationResult) -> Decimal {
    result
        .breakdown_by_material
        .values()
        .chain(result.breakdown_by_transport.values())
        .chain(result.breakdown_by_energy.values())
        .copied()
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The total is exactly the sum of the three category totals.
    #[test]
    fn property_total_is_sum_of_categories(input in input()) {
        let result = calculate(&input, &table());
        prop_assert_eq!(
            result.total_emissions,
            result.material_emissions + result.transport_emissions + result.energy_emissions
        );
        prop_assert!(result.total_emissions >= Decimal::ZERO);
    }

    /// PROPERTY: Each per-type breakdown sums to its category total.
    #[test]
    fn property_breakdowns_sum_to_category_totals(input in input()) {
        let result = calculate(&input, &table());
        let materials: Decimal = result.breakdown_by_material.values().copied().sum();
        let transport: Decimal = result.breakdown_by_transport.values().copied().sum();
        let energy: Decimal = result.breakdown_by_energy.values().copied().sum();
        prop_assert_eq!(materials, result.material_emissions);
        prop_assert_eq!(transport, result.transport_emissions);
        prop_assert_eq!(energy, result.energy_emissions);
        prop_assert_eq!(breakdown_sum(&result), result.total_emissions);
    }

    /// PROPERTY: Computed results always pass the result consistency checks.
    #[test]
    fn property_computed_results_are_consistent(input in input()) {
        let result = calculate(&input, &table());
        let report = validate_calculation_result(&result);
        prop_assert!(!report.has_errors(), "{:?}", report);
    }

    /// PROPERTY: Growing a material quantity never lowers the total.
    #[test]
    fn property_more_material_never_lowers_total(
        input in input(),
        extra in amount(1_000, 3),
    ) {
        prop_assume!(!input.materials.is_empty());
        let table = table();
        let before = calculate(&input, &table);

        let mut grown = input.clone();
        grown.materials[0].quantity += extra;
        let after = calculate(&grown, &table);

        prop_assert!(after.total_emissions >= before.total_emissions);
        prop_assert!(after.material_emissions >= before.material_emissions);
    }

    /// PROPERTY: A longer leg never lowers transport emissions.
    #[test]
    fn property_longer_leg_never_lowers_total(
        leg in leg(),
        extra in amount(1_000, 2),
    ) {
        let table = table();
        let before = CalculationInput { transport: vec![leg.clone()], ..Default::default() };
        let mut longer = leg;
        longer.distance += extra;
        let after = CalculationInput { transport: vec![longer], ..Default::default() };

        let before = calculate(&before, &table);
        let after = calculate(&after, &table);
        prop_assert!(after.transport_emissions >= before.transport_emissions);
        prop_assert!(after.total_emissions >= before.total_emissions);
    }

    /// PROPERTY: A heavier payload never lowers transport emissions.
    #[test]
    fn property_heavier_leg_never_lowers_total(
        leg in leg(),
        extra in amount(10_000, 1),
    ) {
        let table = table();
        let before = CalculationInput { transport: vec![leg.clone()], ..Default::default() };
        let mut heavier = leg;
        let weight = heavier.weight.unwrap_or_else(|| table.payload_kg());
        heavier.weight = Some(weight + extra);
        let after = CalculationInput { transport: vec![heavier], ..Default::default() };

        let before = calculate(&before, &table);
        let after = calculate(&after, &table);
        prop_assert!(after.transport_emissions >= before.transport_emissions);
    }

    /// PROPERTY: More energy consumed never lowers energy emissions.
    #[test]
    fn property_more_energy_never_lowers_total(
        line in energy_line(),
        extra in amount(10_000, 2),
    ) {
        let table = table();
        let before = CalculationInput { energy: vec![line.clone()], ..Default::default() };
        let mut grown = line;
        grown.amount += extra;
        let after = CalculationInput { energy: vec![grown], ..Default::default() };

        let before = calculate(&before, &table);
        let after = calculate(&after, &table);
        prop_assert!(after.energy_emissions >= before.energy_emissions);
        prop_assert!(after.scope1 >= before.scope1);
        prop_assert!(after.scope2 >= before.scope2);
    }

    /// PROPERTY: A higher renewable share never raises energy emissions.
    #[test]
    fn property_more_renewable_never_raises_total(
        line in energy_line(),
        low in amount(100, 1),
        high in amount(100, 1),
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let table = table();
        let less = CalculationInput {
            energy: vec![line.clone().with_renewable_percentage(low)],
            ..Default::default()
        };
        let more = CalculationInput {
            energy: vec![line.with_renewable_percentage(high)],
            ..Default::default()
        };

        let less = calculate(&less, &table);
        let more = calculate(&more, &table);
        prop_assert!(more.energy_emissions <= less.energy_emissions);
        prop_assert!(more.scope2 <= less.scope2);
        prop_assert_eq!(more.scope1, less.scope1);
    }

    /// PROPERTY: Breakdowns match category totals even when sums round.
    #[test]
    fn property_high_precision_breakdowns_stay_consistent(
        lines in prop::collection::vec(
            (prop::sample::select(INTERLEAVED_KEYS), precise_factor()),
            1..8,
        ),
    ) {
        let input = CalculationInput {
            materials: lines
                .into_iter()
                .map(|(kind, factor)| {
                    MaterialInput::new(kind, Decimal::ONE).with_carbon_footprint(factor)
                })
                .collect(),
            ..Default::default()
        };
        let result = calculate(&input, &table());
        let sum = result
            .breakdown_by_material
            .values()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));
        prop_assert_eq!(sum, result.material_emissions);
        let report = validate_calculation_result(&result);
        prop_assert!(!report.has_errors(), "{:?}", report);
    }

    /// PROPERTY: The same input and table always give the same result.
    #[test]
    fn property_calculation_is_deterministic(input in input()) {
        let table = table();
        prop_assert_eq!(calculate(&input, &table), calculate(&input, &table));
    }

    /// PROPERTY: An unknown type contributes quantity times the default factor.
    #[test]
    fn property_unknown_type_uses_default_factor(quantity in amount(1_000_000, 3)) {
        let table = table();
        let input = CalculationInput {
            materials: vec![MaterialInput::new("no_such_material_xyz", quantity)],
            ..Default::default()
        };
        let result = calculate(&input, &table);
        prop_assert_eq!(
            result.material_emissions,
            quantity * table.def().defaults.material_factor
        );
    }

    /// PROPERTY: 100% renewable electricity emits nothing; 0% emits amount times factor.
    #[test]
    fn property_renewable_bounds(amount in amount(1_000_000, 2), factor in amount(2, 3)) {
        let table = table();
        let line = EnergyInput::new("electricity", amount).with_factor(factor);

        let full = CalculationInput {
            energy: vec![line.clone().with_renewable_percentage(Decimal::ONE_HUNDRED)],
            ..Default::default()
        };
        prop_assert_eq!(calculate(&full, &table).energy_emissions, Decimal::ZERO);

        let none = CalculationInput {
            energy: vec![line.with_renewable_percentage(Decimal::ZERO)],
            ..Default::default()
        };
        prop_assert_eq!(calculate(&none, &table).energy_emissions, amount * factor);
    }

    /// PROPERTY: Supplied factors ignore the table entirely.
    #[test]
    fn property_supplied_factor_wins(quantity in amount(1_000_000, 3), factor in amount(10, 3)) {
        let input = CalculationInput {
            materials: vec![MaterialInput::new("concrete", quantity).with_carbon_footprint(factor)],
            ..Default::default()
        };
        let result = calculate(&input, &table());
        prop_assert_eq!(result.material_emissions, quantity * factor);
    }
}
