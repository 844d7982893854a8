use crate::factors::{FactorSource, FactorTableStamp};
use crate::model::LineRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// GHG Protocol scope of an emission source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Direct, on-site fuel combustion.
    Scope1,
    /// Purchased electricity.
    Scope2,
    /// Value-chain emissions (materials and freight).
    Scope3,
}

/// The evaluation of one line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineEmission {
    pub line: LineRef,
    /// Canonical key the line is reported under in the breakdown.
    pub key: String,
    pub factor: Decimal,
    pub factor_source: FactorSource,
    /// Activity the factor applies to: material quantity, tonne-km, or energy amount.
    pub activity: Decimal,
    /// Load factor for transport, renewable share remaining for energy, else 1.
    pub multiplier: Decimal,
    /// kg CO2e.
    pub emissions: Decimal,
    /// `None` for energy types outside the scope 1/2 classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

impl LineEmission {
    /// Emissions before the multiplier is applied.
    pub fn gross_emissions(&self) -> Decimal {
        self.activity.saturating_mul(self.factor)
    }
}

/// Total and per-type breakdown for one category, in kg CO2e.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryEmissions {
    pub total: Decimal,
    pub breakdown: BTreeMap<String, Decimal>,
}

impl CategoryEmissions {
    /// Sum lines per key, then take the total from the breakdown.
    ///
    /// Decimal addition rounds past 28 significant digits, so the total is
    /// summed in breakdown order rather than line order. That keeps
    /// `total == breakdown.values().sum()` exact.
    pub fn from_lines(lines: &[LineEmission]) -> Self {
        let mut breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
        for line in lines {
            let entry = breakdown.entry(line.key.clone()).or_insert(Decimal::ZERO);
            *entry = entry.saturating_add(line.emissions);
        }
        Self {
            total: sum_breakdown(&breakdown),
            breakdown,
        }
    }
}

/// Saturating sum of breakdown values in key order.
pub fn sum_breakdown(breakdown: &BTreeMap<String, Decimal>) -> Decimal {
    breakdown
        .values()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeEmissions {
    pub scope1: Decimal,
    pub scope2: Decimal,
    pub scope3: Decimal,
}

/// Category totals, in kg CO2e. Not percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionsBreakdown {
    pub materials: Decimal,
    pub transport: Decimal,
    pub energy: Decimal,
}

/// Emissions for a full set of inputs, in kg CO2e.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub total_emissions: Decimal,
    pub material_emissions: Decimal,
    pub transport_emissions: Decimal,
    pub energy_emissions: Decimal,
    pub breakdown_by_material: BTreeMap<String, Decimal>,
    pub breakdown_by_transport: BTreeMap<String, Decimal>,
    pub breakdown_by_energy: BTreeMap<String, Decimal>,
    pub scope1: Decimal,
    pub scope2: Decimal,
    pub scope3: Decimal,
    pub breakdown: EmissionsBreakdown,
    /// Factor table the result was computed with.
    pub factor_table: FactorTableStamp,
}

impl CalculationResult {
    pub fn from_parts(
        materials: CategoryEmissions,
        transport: CategoryEmissions,
        energy: CategoryEmissions,
        scopes: ScopeEmissions,
        factor_table: FactorTableStamp,
    ) -> Self {
        let total = materials
            .total
            .saturating_add(transport.total)
            .saturating_add(energy.total);

        Self {
            total_emissions: total,
            material_emissions: materials.total,
            transport_emissions: transport.total,
            energy_emissions: energy.total,
            breakdown: EmissionsBreakdown {
                materials: materials.total,
                transport: transport.total,
                energy: energy.total,
            },
            breakdown_by_material: materials.breakdown,
            breakdown_by_transport: transport.breakdown,
            breakdown_by_energy: energy.breakdown,
            scope1: scopes.scope1,
            scope2: scopes.scope2,
            scope3: scopes.scope3,
            factor_table,
        }
    }
}
