//! Advisory diagnostics for calculation inputs and results.
//!
//! Nothing here blocks a calculation: a degraded result is always preferred
//! over no result. Callers decide what to do with the reported issues.

use crate::calculate::outcome::{sum_breakdown, CalculationResult, Scope};
use crate::calculate::scope::energy_scope;
use crate::factors::{EmissionFactorTable, FactorSource};
use crate::model::{CalculationInput, Category, LineRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    EmptyInput,
    ZeroQuantity,
    NegativeValue,
    UnknownType,
    DefaultTransportType,
    RenewableOutOfRange,
    RenewableOnCombustion,
    NegativeTotal,
    SummationMismatch,
    BreakdownMismatch,
    PercentageMismatch,
    ScopeExceedsTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == IssueSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Append the issues of another report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    fn error(&mut self, code: IssueCode, line: Option<LineRef>, message: String) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Error,
            code,
            message,
            line,
        });
    }

    fn warning(&mut self, code: IssueCode, line: Option<LineRef>, message: String) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Warning,
            code,
            message,
            line,
        });
    }
}

/// Check an input for values that will degrade the result.
pub fn validate_calculation_input(
    input: &CalculationInput,
    table: &EmissionFactorTable,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if input.is_empty() {
        report.warning(
            IssueCode::EmptyInput,
            None,
            "no materials, transport or energy line items".into(),
        );
        return report;
    }

    for (i, m) in input.materials.iter().enumerate() {
        let line = LineRef::new(Category::Materials, i);
        check_quantity(&mut report, line, "quantity", m.quantity);
        check_factor(&mut report, line, "carbonFootprint", m.carbon_footprint);
        check_type(
            &mut report,
            table,
            line,
            Some(&m.material_type),
            m.carbon_footprint,
        );
    }

    for (i, t) in input.transport.iter().enumerate() {
        let line = LineRef::new(Category::Transport, i);
        check_quantity(&mut report, line, "distance", t.distance);
        if let Some(weight) = t.weight {
            check_negative(&mut report, line, "weight", weight);
        }
        if let Some(load_factor) = t.load_factor {
            check_negative(&mut report, line, "loadFactor", load_factor);
        }
        check_factor(&mut report, line, "carbonFootprint", t.carbon_footprint);

        match t.mode.as_deref().map(str::trim) {
            None | Some("") => report.warning(
                IssueCode::DefaultTransportType,
                Some(line),
                format!(
                    "{}: no transport mode, '{}' assumed",
                    line,
                    table.label(Category::Transport, &table.def().defaults.transport_type)
                ),
            ),
            mode => check_type(&mut report, table, line, mode, t.carbon_footprint),
        }
    }

    for (i, e) in input.energy.iter().enumerate() {
        let line = LineRef::new(Category::Energy, i);
        check_quantity(&mut report, line, "amount", e.amount);
        check_factor(&mut report, line, "factor", e.factor);
        check_type(&mut report, table, line, Some(&e.energy_type), e.factor);

        if let Some(pct) = e.renewable_percentage {
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                report.error(
                    IssueCode::RenewableOutOfRange,
                    Some(line),
                    format!("{}: renewable percentage {} outside 0-100", line, pct),
                );
            }
            let key = table.resolve(Category::Energy, Some(&e.energy_type), None).key;
            if energy_scope(&key) == Some(Scope::Scope1) && pct > Decimal::ZERO {
                report.warning(
                    IssueCode::RenewableOnCombustion,
                    Some(line),
                    format!(
                        "{}: renewable percentage on combustion fuel '{}' is not applied to scope 1",
                        line, e.energy_type
                    ),
                );
            }
        }
    }

    report
}

fn check_negative(report: &mut ValidationReport, line: LineRef, field: &str, value: Decimal) {
    if value < Decimal::ZERO {
        report.error(
            IssueCode::NegativeValue,
            Some(line),
            format!("{}: {} {} is negative, read as 0", line, field, value),
        );
    }
}

fn check_quantity(report: &mut ValidationReport, line: LineRef, field: &str, value: Decimal) {
    if value.is_zero() {
        report.warning(
            IssueCode::ZeroQuantity,
            Some(line),
            format!("{}: {} is 0, line contributes nothing", line, field),
        );
    } else {
        check_negative(report, line, field, value);
    }
}

fn check_factor(report: &mut ValidationReport, line: LineRef, field: &str, value: Option<Decimal>) {
    if let Some(v) = value {
        check_negative(report, line, field, v);
    }
}

fn check_type(
    report: &mut ValidationReport,
    table: &EmissionFactorTable,
    line: LineRef,
    raw_type: Option<&str>,
    supplied: Option<Decimal>,
) {
    if supplied.is_some() {
        return;
    }
    let lookup = table.resolve(line.category, raw_type, None);
    if lookup.source == FactorSource::Default {
        report.warning(
            IssueCode::UnknownType,
            Some(line),
            format!(
                "{}: '{}' not in factor table, default factor {} applied",
                line, lookup.key, lookup.factor
            ),
        );
    }
}

fn percentage_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Check a result's totals for internal consistency.
pub fn validate_calculation_result(result: &CalculationResult) -> ValidationReport {
    let mut report = ValidationReport::default();

    let totals = [
        ("totalEmissions", result.total_emissions),
        ("materialEmissions", result.material_emissions),
        ("transportEmissions", result.transport_emissions),
        ("energyEmissions", result.energy_emissions),
        ("scope1", result.scope1),
        ("scope2", result.scope2),
        ("scope3", result.scope3),
    ];
    for (name, value) in totals {
        if value < Decimal::ZERO {
            report.error(
                IssueCode::NegativeTotal,
                None,
                format!("{} is negative ({})", name, value),
            );
        }
    }

    let category_sum = result
        .material_emissions
        .saturating_add(result.transport_emissions)
        .saturating_add(result.energy_emissions);
    if category_sum != result.total_emissions {
        report.error(
            IssueCode::SummationMismatch,
            None,
            format!(
                "totalEmissions {} differs from category sum {}",
                result.total_emissions, category_sum
            ),
        );
    }

    check_breakdown(
        &mut report,
        "breakdownByMaterial",
        &result.breakdown_by_material,
        result.material_emissions,
    );
    check_breakdown(
        &mut report,
        "breakdownByTransport",
        &result.breakdown_by_transport,
        result.transport_emissions,
    );
    check_breakdown(
        &mut report,
        "breakdownByEnergy",
        &result.breakdown_by_energy,
        result.energy_emissions,
    );

    let convenience = &result.breakdown;
    if convenience.materials != result.material_emissions
        || convenience.transport != result.transport_emissions
        || convenience.energy != result.energy_emissions
    {
        report.error(
            IssueCode::BreakdownMismatch,
            None,
            "breakdown totals differ from category emissions".into(),
        );
    }

    if let Some(pct_sum) = share_sum(result) {
        if (pct_sum - Decimal::ONE_HUNDRED).abs() > percentage_tolerance() {
            report.warning(
                IssueCode::PercentageMismatch,
                None,
                format!("category shares sum to {}%, not 100%", pct_sum.round_dp(2)),
            );
        }
    }

    let scope_sum = result
        .scope1
        .saturating_add(result.scope2)
        .saturating_add(result.scope3);
    if scope_sum > result.total_emissions {
        report.warning(
            IssueCode::ScopeExceedsTotal,
            None,
            format!(
                "scope totals {} exceed totalEmissions {}",
                scope_sum, result.total_emissions
            ),
        );
    }

    report
}

/// Sum of the category shares of the total, in percent.
fn share_sum(result: &CalculationResult) -> Option<Decimal> {
    if result.total_emissions <= Decimal::ZERO {
        return None;
    }
    let share = |v: Decimal| {
        v.checked_mul(Decimal::ONE_HUNDRED)?
            .checked_div(result.total_emissions)
    };
    share(result.material_emissions)?
        .checked_add(share(result.transport_emissions)?)?
        .checked_add(share(result.energy_emissions)?)
}

fn check_breakdown(
    report: &mut ValidationReport,
    name: &str,
    breakdown: &BTreeMap<String, Decimal>,
    total: Decimal,
) {
    for (key, value) in breakdown {
        if *value < Decimal::ZERO {
            report.error(
                IssueCode::NegativeTotal,
                None,
                format!("{}['{}'] is negative ({})", name, key, value),
            );
        }
    }

    let sum = sum_breakdown(breakdown);
    if sum != total {
        report.error(
            IssueCode::BreakdownMismatch,
            None,
            format!("{} sums to {}, category total is {}", name, sum, total),
        );
    }
}
