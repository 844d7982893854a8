use super::engine::{evaluate_energy, evaluate_materials, evaluate_transport};
use super::outcome::{CategoryEmissions, LineEmission, Scope, ScopeEmissions};
use crate::factors::EmissionFactorTable;
use crate::model::{EnergyInput, MaterialInput, TransportInput};
use rust_decimal::Decimal;

/// Energy types burned on site, reported as scope 1.
pub const COMBUSTION_FUELS: &[&str] = &["natural_gas", "lpg", "diesel", "petrol"];

/// Classify a canonical energy key.
///
/// Combustion fuels are scope 1 and anything whose key mentions electricity
/// is scope 2. Other energy types are left unclassified, so the three
/// scopes need not add up to the total.
pub fn energy_scope(key: &str) -> Option<Scope> {
    if COMBUSTION_FUELS.contains(&key) {
        Some(Scope::Scope1)
    } else if key.contains("electricity") {
        Some(Scope::Scope2)
    } else {
        None
    }
}

/// Split emissions into GHG Protocol scopes.
pub fn calculate_scope_emissions(
    materials: &[MaterialInput],
    transport: &[TransportInput],
    energy: &[EnergyInput],
    table: &EmissionFactorTable,
) -> ScopeEmissions {
    let materials = CategoryEmissions::from_lines(&evaluate_materials(materials, table));
    let transport = CategoryEmissions::from_lines(&evaluate_transport(transport, table));
    scope_split(materials.total, transport.total, &evaluate_energy(energy, table))
}

/// Scope totals from category totals and evaluated energy lines.
///
/// Scope 1 ignores the renewable percentage: it only discounts purchased
/// electricity. Scope 2 carries the discounted electricity emissions.
pub(crate) fn scope_split(
    material_total: Decimal,
    transport_total: Decimal,
    energy_lines: &[LineEmission],
) -> ScopeEmissions {
    let mut scopes = ScopeEmissions {
        scope3: material_total.saturating_add(transport_total),
        ..Default::default()
    };

    for line in energy_lines {
        match line.scope {
            Some(Scope::Scope1) => {
                scopes.scope1 = scopes.scope1.saturating_add(line.gross_emissions());
            }
            Some(Scope::Scope2) => {
                scopes.scope2 = scopes.scope2.saturating_add(line.emissions);
            }
            _ => {}
        }
    }

    scopes
}
