use super::outcome::{CalculationResult, CategoryEmissions, LineEmission, Scope};
use super::scope::{energy_scope, scope_split};
use crate::factors::EmissionFactorTable;
use crate::model::{
    CalculationInput, Category, EnergyInput, LineRef, MaterialInput, TransportInput,
};
use rust_decimal::Decimal;

const KG_PER_TONNE: Decimal = Decimal::ONE_THOUSAND;

/// Per-line evaluations for every category of an input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluatedLines {
    pub materials: Vec<LineEmission>,
    pub transport: Vec<LineEmission>,
    pub energy: Vec<LineEmission>,
}

impl EvaluatedLines {
    pub fn iter(&self) -> impl Iterator<Item = &LineEmission> {
        self.materials
            .iter()
            .chain(self.transport.iter())
            .chain(self.energy.iter())
    }
}

/// Sum material emissions: `quantity * factor` per line.
pub fn calculate_material_emissions(
    materials: &[MaterialInput],
    table: &EmissionFactorTable,
) -> CategoryEmissions {
    CategoryEmissions::from_lines(&evaluate_materials(materials, table))
}

/// Sum transport emissions: `distance * tonnes * factor * load_factor` per leg.
pub fn calculate_transport_emissions(
    transport: &[TransportInput],
    table: &EmissionFactorTable,
) -> CategoryEmissions {
    CategoryEmissions::from_lines(&evaluate_transport(transport, table))
}

/// Sum energy emissions: `amount * factor * (1 - renewable% / 100)` per line.
pub fn calculate_energy_emissions(
    energy: &[EnergyInput],
    table: &EmissionFactorTable,
) -> CategoryEmissions {
    CategoryEmissions::from_lines(&evaluate_energy(energy, table))
}

/// Compose the three category calculations and the scope split.
pub fn calculate_total_emissions(
    materials: &[MaterialInput],
    transport: &[TransportInput],
    energy: &[EnergyInput],
    table: &EmissionFactorTable,
) -> CalculationResult {
    let lines = EvaluatedLines {
        materials: evaluate_materials(materials, table),
        transport: evaluate_transport(transport, table),
        energy: evaluate_energy(energy, table),
    };
    result_from_lines(&lines, table)
}

/// [`calculate_total_emissions`] over a `CalculationInput`.
pub fn calculate(input: &CalculationInput, table: &EmissionFactorTable) -> CalculationResult {
    calculate_total_emissions(&input.materials, &input.transport, &input.energy, table)
}

pub fn evaluate_lines(input: &CalculationInput, table: &EmissionFactorTable) -> EvaluatedLines {
    EvaluatedLines {
        materials: evaluate_materials(&input.materials, table),
        transport: evaluate_transport(&input.transport, table),
        energy: evaluate_energy(&input.energy, table),
    }
}

pub fn result_from_lines(lines: &EvaluatedLines, table: &EmissionFactorTable) -> CalculationResult {
    let materials = CategoryEmissions::from_lines(&lines.materials);
    let transport = CategoryEmissions::from_lines(&lines.transport);
    let energy = CategoryEmissions::from_lines(&lines.energy);
    let scopes = scope_split(materials.total, transport.total, &lines.energy);
    CalculationResult::from_parts(materials, transport, energy, scopes, table.stamp())
}

pub fn evaluate_materials(
    materials: &[MaterialInput],
    table: &EmissionFactorTable,
) -> Vec<LineEmission> {
    materials
        .iter()
        .enumerate()
        .map(|(i, m)| evaluate_material(i, m, table))
        .collect()
}

pub fn evaluate_transport(
    transport: &[TransportInput],
    table: &EmissionFactorTable,
) -> Vec<LineEmission> {
    transport
        .iter()
        .enumerate()
        .map(|(i, t)| evaluate_leg(i, t, table))
        .collect()
}

pub fn evaluate_energy(energy: &[EnergyInput], table: &EmissionFactorTable) -> Vec<LineEmission> {
    energy
        .iter()
        .enumerate()
        .map(|(i, e)| evaluate_energy_line(i, e, table))
        .collect()
}

fn evaluate_material(index: usize, m: &MaterialInput, table: &EmissionFactorTable) -> LineEmission {
    let lookup = table.resolve(
        Category::Materials,
        Some(&m.material_type),
        m.carbon_footprint.map(non_negative),
    );
    let activity = non_negative(m.quantity);

    LineEmission {
        line: LineRef::new(Category::Materials, index),
        emissions: activity.saturating_mul(lookup.factor),
        key: lookup.key,
        factor: lookup.factor,
        factor_source: lookup.source,
        activity,
        multiplier: Decimal::ONE,
        scope: Some(Scope::Scope3),
    }
}

fn evaluate_leg(index: usize, t: &TransportInput, table: &EmissionFactorTable) -> LineEmission {
    let lookup = table.resolve(
        Category::Transport,
        t.mode.as_deref(),
        t.carbon_footprint.map(non_negative),
    );
    let weight_kg = t.weight.map(non_negative).unwrap_or_else(|| table.payload_kg());
    let tonne_km = non_negative(t.distance).saturating_mul(weight_kg / KG_PER_TONNE);
    let load_factor = t.load_factor.map(non_negative).unwrap_or(Decimal::ONE);

    LineEmission {
        line: LineRef::new(Category::Transport, index),
        emissions: tonne_km
            .saturating_mul(lookup.factor)
            .saturating_mul(load_factor),
        key: lookup.key,
        factor: lookup.factor,
        factor_source: lookup.source,
        activity: tonne_km,
        multiplier: load_factor,
        scope: Some(Scope::Scope3),
    }
}

fn evaluate_energy_line(
    index: usize,
    e: &EnergyInput,
    table: &EmissionFactorTable,
) -> LineEmission {
    let lookup = table.resolve(
        Category::Energy,
        Some(&e.energy_type),
        e.factor.map(non_negative),
    );
    let activity = non_negative(e.amount);
    let multiplier = Decimal::ONE - renewable_share(e.renewable_percentage);

    LineEmission {
        line: LineRef::new(Category::Energy, index),
        emissions: activity
            .saturating_mul(lookup.factor)
            .saturating_mul(multiplier),
        scope: energy_scope(&lookup.key),
        key: lookup.key,
        factor: lookup.factor,
        factor_source: lookup.source,
        activity,
        multiplier,
    }
}

/// Renewable percentage as a fraction in `[0, 1]`.
fn renewable_share(pct: Option<Decimal>) -> Decimal {
    let pct = pct
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    pct / Decimal::ONE_HUNDRED
}

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
