use crate::calculate::engine::EvaluatedLines;
use crate::calculate::outcome::{LineEmission, Scope};
use crate::factors::{EmissionFactorTable, FactorSource, FactorTableStamp};
use crate::model::{CalculationInput, Category, LineRef};
use crate::parsing::ParseWarning;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Critical,
    Important,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceVisibility {
    Always,
    Auto,
    OnDemand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    ResolveFactor,
    ApplyPayload,
    ApplyLoadFactor,
    ApplyRenewableDiscount,
    ClassifyScope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_type: TraceStepType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub entry_id: String,
    pub line: LineRef,
    pub raw_type: String,
    pub key: String,
    pub activity: Decimal,
    pub factor: Decimal,
    pub factor_source: FactorSource,
    pub emissions: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineRef>,
    pub message: String,
    pub severity: TraceSeverity,
    pub visibility: TraceVisibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_table: Option<FactorTableStamp>,
    pub entries: Vec<TraceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            factor_table: None,
            entries: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Build the trace for an evaluated input.
pub fn build_trace(
    input: &CalculationInput,
    lines: &EvaluatedLines,
    table: &EmissionFactorTable,
) -> TraceBundle {
    let mut bundle = TraceBundle {
        factor_table: Some(table.stamp()),
        ..Default::default()
    };

    for line in lines.iter() {
        let entry = build_entry_trace(input, line, table);
        if line.factor_source == FactorSource::Default {
            bundle.warnings.push(TraceWarning {
                line: Some(line.line),
                message: format!(
                    "'{}' is not in factor table '{}' (v{}), default factor {} applied",
                    display_type(&entry.raw_type, &line.key),
                    table.name(),
                    table.version(),
                    line.factor
                ),
                severity: TraceSeverity::Important,
                visibility: TraceVisibility::Always,
            });
        }
        bundle.entries.push(entry);
    }

    bundle
}

/// Convert parse warnings into trace warnings.
pub fn parse_warnings(warnings: &[ParseWarning]) -> Vec<TraceWarning> {
    warnings
        .iter()
        .map(|w| TraceWarning {
            line: Some(w.line),
            message: match &w.raw {
                Some(raw) => format!("{}: '{}' {}", w.field, raw, w.reason),
                None => format!("{}: {}", w.field, w.reason),
            },
            severity: TraceSeverity::Important,
            visibility: TraceVisibility::Auto,
        })
        .collect()
}

pub fn build_entry_trace(
    input: &CalculationInput,
    line: &LineEmission,
    table: &EmissionFactorTable,
) -> TraceEntry {
    let raw_type = raw_type(input, line.line);
    let mut steps = vec![TraceStep {
        step_type: TraceStepType::ResolveFactor,
        message: resolve_message(&raw_type, line, table),
    }];

    match line.line.category {
        Category::Materials => {}
        Category::Transport => {
            let weight = input
                .transport
                .get(line.line.index)
                .and_then(|t| t.weight);
            steps.push(TraceStep {
                step_type: TraceStepType::ApplyPayload,
                message: match weight {
                    Some(w) => format!("Payload {} kg -> {} tonne-km", w, line.activity),
                    None => format!(
                        "No weight given, default payload {} kg -> {} tonne-km",
                        table.payload_kg(),
                        line.activity
                    ),
                },
            });
            if line.multiplier != Decimal::ONE {
                steps.push(TraceStep {
                    step_type: TraceStepType::ApplyLoadFactor,
                    message: format!("Load factor {} applied", line.multiplier),
                });
            }
        }
        Category::Energy => {
            if line.multiplier != Decimal::ONE {
                steps.push(TraceStep {
                    step_type: TraceStepType::ApplyRenewableDiscount,
                    message: format!(
                        "Renewable share discounts emissions to {} of {}",
                        line.multiplier,
                        line.gross_emissions()
                    ),
                });
            }
        }
    }

    steps.push(TraceStep {
        step_type: TraceStepType::ClassifyScope,
        message: match line.scope {
            Some(Scope::Scope1) => "Scope 1: on-site combustion, no renewable discount".into(),
            Some(Scope::Scope2) => "Scope 2: purchased electricity".into(),
            Some(Scope::Scope3) => "Scope 3: value chain".into(),
            None => "No scope: energy type outside scope 1/2 classification".into(),
        },
    });

    TraceEntry {
        entry_id: format!("ent_{}_{}", line.line.category, line.line.index),
        line: line.line,
        raw_type,
        key: line.key.clone(),
        activity: line.activity,
        factor: line.factor,
        factor_source: line.factor_source,
        emissions: line.emissions,
        scope: line.scope,
        steps,
    }
}

fn resolve_message(raw_type: &str, line: &LineEmission, table: &EmissionFactorTable) -> String {
    let shown = display_type(raw_type, &line.key);
    match line.factor_source {
        FactorSource::Supplied => {
            format!("'{}' -> '{}', supplied factor {}", shown, line.key, line.factor)
        }
        FactorSource::Table => format!(
            "'{}' -> '{}', factor {} from '{}' v{}",
            shown,
            line.key,
            line.factor,
            table.name(),
            table.version()
        ),
        FactorSource::Default => format!(
            "'{}' -> '{}', unknown type, default factor {}",
            shown, line.key, line.factor
        ),
    }
}

fn raw_type(input: &CalculationInput, line: LineRef) -> String {
    let raw = match line.category {
        Category::Materials => input
            .materials
            .get(line.index)
            .map(|m| m.material_type.as_str()),
        Category::Transport => input
            .transport
            .get(line.index)
            .and_then(|t| t.mode.as_deref()),
        Category::Energy => input.energy.get(line.index).map(|e| e.energy_type.as_str()),
    };
    raw.unwrap_or_default().to_string()
}

fn display_type<'a>(raw_type: &'a str, key: &'a str) -> &'a str {
    if raw_type.is_empty() {
        key
    } else {
        raw_type
    }
}
