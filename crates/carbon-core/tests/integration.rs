//! End-to-end tests: JSON documents through parsing, calculation, trace and
//! diagnostics, using explicit factor tables so the numbers are fixed.

use carbon_core::calculate::outcome::CalculationResult;
use carbon_core::factors::builtin::{default_table, load_preset};
use carbon_core::factors::{parse_factor_table_str, EmissionFactorTable};
use carbon_core::model::{Category, LineRef};
use carbon_core::trace::TraceSeverity;
use carbon_core::{
    calculate, calculate_parsed, parse_input, validate_calculation_input,
    validate_calculation_result, InputFormat,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn project_table() -> EmissionFactorTable {
    parse_factor_table_str(
        r#"{
            "name": "Project factors",
            "version": "2025.2",
            "defaults": {
                "material_factor": "0.5",
                "transport_type": "road_transport_heavy_vehicle",
                "energy_factor": "0.5"
            },
            "materials": { "concrete": { "factor": "0.12" } },
            "transport": { "road_transport_heavy_vehicle": { "factor": "0.1" } },
            "energy": {
                "electricity": { "factor": "0.94" },
                "diesel": { "factor": "2.7" }
            }
        }"#,
    )
    .unwrap()
}

fn run(json: &str) -> CalculationResult {
    let parsed = parse_input(json.as_bytes(), InputFormat::Json).unwrap();
    calculate(&parsed.input, &project_table())
}

// ---------------------------------------------------------------------------
// Scenario 1: one material with a supplied factor
// ---------------------------------------------------------------------------
#[test]
fn single_material() {
    let result = run(r#"{ "materials": [{ "type": "concrete", "quantity": 1000, "factor": 0.12 }] }"#);
    assert_eq!(result.material_emissions, dec!(120));
    assert_eq!(result.breakdown_by_material.len(), 1);
    assert_eq!(result.breakdown_by_material["concrete"], dec!(120));
    assert_eq!(result.total_emissions, dec!(120));
}

// ---------------------------------------------------------------------------
// Scenario 2: one weighted freight leg, tonne-km model
// ---------------------------------------------------------------------------
#[test]
fn single_transport_leg_tonne_km() {
    let result = run(r#"{ "transport": [{ "distance": 100, "weight": 1500, "factor": 0.1 }] }"#);
    assert_eq!(result.transport_emissions, dec!(15));
    assert_eq!(
        result.breakdown_by_transport["road_transport_heavy_vehicle"],
        dec!(15)
    );
}

// ---------------------------------------------------------------------------
// Scenario 3: half-renewable electricity lands in scope 2
// ---------------------------------------------------------------------------
#[test]
fn half_renewable_electricity() {
    let result = run(
        r#"{ "energy": [{ "type": "electricity", "amount": 1000, "factor": 0.94, "renewablePercentage": 50 }] }"#,
    );
    assert_eq!(result.energy_emissions, dec!(470));
    assert_eq!(result.scope2, dec!(470));
    assert_eq!(result.scope1, Decimal::ZERO);
    assert_eq!(result.scope3, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Scenario 4: empty input is a zero result, not an error
// ---------------------------------------------------------------------------
#[test]
fn empty_input() {
    let result = run(r#"{ "materials": [], "transport": [], "energy": [] }"#);
    assert_eq!(result.total_emissions, Decimal::ZERO);
    assert_eq!(result.material_emissions, Decimal::ZERO);
    assert_eq!(result.transport_emissions, Decimal::ZERO);
    assert_eq!(result.energy_emissions, Decimal::ZERO);
    assert!(result.breakdown_by_material.is_empty());
    assert!(result.breakdown_by_transport.is_empty());
    assert!(result.breakdown_by_energy.is_empty());
}

// ---------------------------------------------------------------------------
// Scenario 5: unknown material falls back to the default factor
// ---------------------------------------------------------------------------
#[test]
fn unknown_material_uses_default_factor() {
    let result = run(r#"{ "materials": [{ "type": "unobtainium", "quantity": 10 }] }"#);
    assert_eq!(result.material_emissions, dec!(5));
    assert_eq!(result.breakdown_by_material["unobtainium"], dec!(5));
}

#[test]
fn legacy_field_aliases_and_string_numbers() {
    let result = run(
        r#"{
            "materials": [{ "material": "Concrete", "amount": "1,000" }],
            "transport": [{ "mode": "HGV", "distance": "100", "weight": "1500" }],
            "energy": [{ "type": "Diesel", "quantity": "10" }]
        }"#,
    );
    assert_eq!(result.material_emissions, dec!(120));
    assert_eq!(result.transport_emissions, dec!(15));
    assert_eq!(result.energy_emissions, dec!(27));
    assert_eq!(result.scope1, dec!(27));
    assert_eq!(result.total_emissions, dec!(162));
}

#[test]
fn malformed_numbers_degrade_instead_of_failing() {
    let parsed = parse_input(
        br#"{ "materials": [
            { "type": "concrete", "quantity": "about a tonne" },
            { "type": "concrete", "quantity": 100 }
        ] }"#,
        InputFormat::Json,
    )
    .unwrap();
    let report = calculate_parsed(&parsed, &project_table());

    assert_eq!(report.result.material_emissions, dec!(12));
    assert_eq!(report.trace.warnings.len(), 1);
    assert_eq!(
        report.trace.warnings[0].line,
        Some(LineRef::new(Category::Materials, 0))
    );
}

#[test]
fn structurally_malformed_input_fails_loudly() {
    let err = parse_input(br#"{ "materials": { "type": "concrete" } }"#, InputFormat::Json)
        .unwrap_err();
    assert!(err.to_string().contains("must be an array"));
}

#[test]
fn trace_records_default_factor_fallback() {
    let parsed = parse_input(
        br#"{ "materials": [{ "type": "unobtainium", "quantity": 10 }] }"#,
        InputFormat::Json,
    )
    .unwrap();
    let report = calculate_parsed(&parsed, &project_table());

    assert_eq!(report.trace.entries.len(), 1);
    assert_eq!(report.trace.warnings.len(), 1);
    assert_eq!(report.trace.warnings[0].severity, TraceSeverity::Important);
    assert!(report.trace.warnings[0].message.contains("Project factors"));
}

#[test]
fn diagnostics_are_advisory() {
    let parsed = parse_input(
        br#"{ "materials": [{ "type": "unobtainium", "quantity": 0 }] }"#,
        InputFormat::Json,
    )
    .unwrap();
    let table = project_table();
    let input_report = validate_calculation_input(&parsed.input, &table);
    assert!(!input_report.is_clean());

    // Calculation still proceeds and the result is internally consistent.
    let result = calculate(&parsed.input, &table);
    assert_eq!(result.total_emissions, Decimal::ZERO);
    assert!(validate_calculation_result(&result).is_clean());
}

#[test]
fn result_json_uses_stable_field_names() {
    let result = run(r#"{ "materials": [{ "type": "concrete", "quantity": 10 }] }"#);
    let json = serde_json::to_value(&result).unwrap();
    for field in [
        "totalEmissions",
        "materialEmissions",
        "transportEmissions",
        "energyEmissions",
        "breakdownByMaterial",
        "breakdownByTransport",
        "breakdownByEnergy",
        "scope1",
        "scope2",
        "scope3",
        "breakdown",
        "factorTable",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["factorTable"]["version"], "2025.2");
    assert_eq!(json["breakdown"]["materials"], "1.20");
}

#[test]
fn swapping_tables_changes_only_table_driven_lines() {
    let parsed = parse_input(
        br#"{
            "materials": [
                { "type": "concrete", "quantity": 1000 },
                { "type": "custom panel", "quantity": 10, "carbonFootprint": 4 }
            ]
        }"#,
        InputFormat::Json,
    )
    .unwrap();
    let global = calculate(&parsed.input, &default_table().unwrap());
    let au = calculate(&parsed.input, &load_preset("au").unwrap());

    assert_eq!(global.breakdown_by_material["custom_panel"], dec!(40));
    assert_eq!(au.breakdown_by_material["custom_panel"], dec!(40));
    assert_ne!(
        global.breakdown_by_material["concrete"],
        au.breakdown_by_material["concrete"]
    );
    assert_ne!(global.factor_table, au.factor_table);
}
