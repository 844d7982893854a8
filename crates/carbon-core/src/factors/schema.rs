use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A versioned table of emission factors, one map per input category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Where the factors come from (dataset, publication year).
    #[serde(default)]
    pub source: Option<String>,
    pub defaults: FactorDefaults,
    /// Canonical material key -> kg CO2e per declared unit.
    #[serde(default)]
    pub materials: BTreeMap<String, FactorDef>,
    /// Canonical transport mode -> kg CO2e per tonne-km.
    #[serde(default)]
    pub transport: BTreeMap<String, FactorDef>,
    /// Canonical energy type -> kg CO2e per unit consumed.
    #[serde(default)]
    pub energy: BTreeMap<String, FactorDef>,
}

/// Fallbacks applied when a line item names an unknown type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDefaults {
    pub material_factor: Decimal,
    /// Transport mode used when a leg names none; must exist in `transport`.
    pub transport_type: String,
    pub energy_factor: Decimal,
    /// Payload assumed for a leg without a weight.
    #[serde(default = "default_payload_kg")]
    pub payload_kg: Decimal,
}

fn default_payload_kg() -> Decimal {
    Decimal::ONE_THOUSAND
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDef {
    pub factor: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Display name, e.g. "Road Transport - Heavy Vehicle".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
