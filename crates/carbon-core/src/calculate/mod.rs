pub mod engine;
pub mod outcome;
pub mod scope;

pub use engine::{
    calculate, calculate_energy_emissions, calculate_material_emissions,
    calculate_total_emissions, calculate_transport_emissions,
};
pub use outcome::{
    CalculationResult, CategoryEmissions, EmissionsBreakdown, LineEmission, Scope, ScopeEmissions,
};
pub use scope::calculate_scope_emissions;
