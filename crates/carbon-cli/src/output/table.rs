use carbon_core::factors::{EmissionFactorTable, FactorSource};
use carbon_core::model::Category;
use carbon_core::parsing::ParsedInput;
use carbon_core::trace::TraceEntry;
use carbon_core::CalculationReport;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::Write;

/// kg CO2e rounded for display.
fn kg(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn share(part: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "-".into();
    }
    match part
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(total))
    {
        Some(pct) => format!("{}%", pct.round_dp(1)),
        None => "-".into(),
    }
}

pub fn print_result(report: &CalculationReport, table: &EmissionFactorTable, verbose: bool) {
    let result = &report.result;

    println!(
        "=== {} (v{}) ===\n",
        result.factor_table.name, result.factor_table.version
    );
    println!("  Total: {} kg CO2e\n", kg(result.total_emissions));

    let categories = [
        ("Materials", result.material_emissions),
        ("Transport", result.transport_emissions),
        ("Energy", result.energy_emissions),
    ];
    for (name, value) in categories {
        println!(
            "  {:<10} {:>14}  {:>7}",
            name,
            kg(value),
            share(value, result.total_emissions)
        );
    }
    println!();

    println!("  Scope 1    {:>14}", kg(result.scope1));
    println!("  Scope 2    {:>14}", kg(result.scope2));
    println!("  Scope 3    {:>14}", kg(result.scope3));
    println!();

    print_breakdown(table, Category::Materials, &result.breakdown_by_material);
    print_breakdown(table, Category::Transport, &result.breakdown_by_transport);
    print_breakdown(table, Category::Energy, &result.breakdown_by_energy);

    if verbose && !report.trace.entries.is_empty() {
        println!("  Line items:");
        for entry in &report.trace.entries {
            print_entry(entry);
        }
        println!();
    }
}

fn print_breakdown(
    table: &EmissionFactorTable,
    category: Category,
    breakdown: &BTreeMap<String, Decimal>,
) {
    if breakdown.is_empty() {
        return;
    }

    println!("  By {}:", category);
    let labels: Vec<(&str, Decimal)> = breakdown
        .iter()
        .map(|(key, value)| (table.label(category, key), *value))
        .collect();
    let max_label = labels.iter().map(|(l, _)| l.len()).max().unwrap_or(10);

    for (label, value) in labels {
        println!("    {:<width$}  {:>14}", label, kg(value), width = max_label);
    }
    println!();
}

fn print_entry(entry: &TraceEntry) {
    let source_marker = match entry.factor_source {
        FactorSource::Supplied => " (supplied)",
        FactorSource::Table => "",
        FactorSource::Default => " (default, ?)",
    };
    println!(
        "    {:<14} {} -> {} kg CO2e  (factor {}{})",
        entry.line.to_string(),
        entry.key,
        kg(entry.emissions),
        entry.factor,
        source_marker
    );
    for step in entry.steps.iter().skip(1) {
        println!("      {}", step.message);
    }
}

/// Plain-text view of parsed line items.
pub fn format_parsed(parsed: &ParsedInput) -> String {
    let mut out = String::new();
    let input = &parsed.input;

    if input.is_empty() {
        let _ = writeln!(out, "No line items.");
    }

    if !input.materials.is_empty() {
        let _ = writeln!(out, "Materials:");
        for (i, m) in input.materials.iter().enumerate() {
            let factor = match m.carbon_footprint {
                Some(f) => format!("  factor {}", f),
                None => String::new(),
            };
            let _ = writeln!(
                out,
                "  [{}] {:<24} {} {}{}",
                i,
                m.material_type,
                m.quantity,
                m.unit.as_deref().unwrap_or(""),
                factor
            );
        }
        let _ = writeln!(out);
    }

    if !input.transport.is_empty() {
        let _ = writeln!(out, "Transport:");
        for (i, t) in input.transport.iter().enumerate() {
            let weight = match t.weight {
                Some(w) => format!("{} kg", w),
                None => "default payload".into(),
            };
            let mut extras = String::new();
            if let Some(f) = t.carbon_footprint {
                let _ = write!(extras, "  factor {}", f);
            }
            if let Some(lf) = t.load_factor {
                let _ = write!(extras, "  load factor {}", lf);
            }
            let _ = writeln!(
                out,
                "  [{}] {:<24} {} km, {}{}",
                i,
                t.mode.as_deref().unwrap_or("(default mode)"),
                t.distance,
                weight,
                extras
            );
        }
        let _ = writeln!(out);
    }

    if !input.energy.is_empty() {
        let _ = writeln!(out, "Energy:");
        for (i, e) in input.energy.iter().enumerate() {
            let mut extras = String::new();
            if let Some(pct) = e.renewable_percentage {
                let _ = write!(extras, "  {}% renewable", pct);
            }
            if let Some(f) = e.factor {
                let _ = write!(extras, "  factor {}", f);
            }
            let _ = writeln!(
                out,
                "  [{}] {:<24} {} {}{}",
                i,
                e.energy_type,
                e.amount,
                e.unit.as_deref().unwrap_or(""),
                extras
            );
        }
        let _ = writeln!(out);
    }

    if !parsed.warnings.is_empty() {
        let _ = writeln!(out, "Warnings:");
        for w in &parsed.warnings {
            let _ = writeln!(out, "  {}: {}: {}", w.line, w.field, w.reason);
        }
    }

    out.trim_end().to_string()
}
