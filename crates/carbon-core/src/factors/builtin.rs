use super::{parse_factor_table_str, EmissionFactorTable};
use crate::error::CarbonError;

const GLOBAL_2024_JSON: &str = include_str!("../../../../factors/global-2024.json");
const AU_2024_JSON: &str = include_str!("../../../../factors/au-2024.json");

/// Available predefined factor tables.
pub const PRESETS: &[&str] = &["global", "au"];

/// Preset used when no table is selected.
pub const DEFAULT_PRESET: &str = "global";

/// Load a predefined factor table by name.
pub fn load_preset(name: &str) -> Result<EmissionFactorTable, CarbonError> {
    match name {
        "global" => parse_factor_table_str(GLOBAL_2024_JSON),
        "au" => parse_factor_table_str(AU_2024_JSON),
        _ => Err(CarbonError::FactorTableInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The default factor table.
pub fn default_table() -> Result<EmissionFactorTable, CarbonError> {
    load_preset(DEFAULT_PRESET)
}
