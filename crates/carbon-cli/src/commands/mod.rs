pub mod calculate;
pub mod factors;
pub mod parse;
pub mod validate;

use carbon_core::error::CarbonError;
use carbon_core::factors::{builtin, load_factor_table, EmissionFactorTable};
use carbon_core::parsing::ParsedInput;
use carbon_core::InputFormat;
use std::path::{Path, PathBuf};

/// Pick the factor table: a custom file wins over a preset, else the default preset.
pub fn resolve_table(
    preset: Option<String>,
    factors: Option<PathBuf>,
) -> Result<EmissionFactorTable, CarbonError> {
    match (factors, preset) {
        (Some(path), _) => load_factor_table(&path),
        (None, Some(name)) => builtin::load_preset(&name),
        (None, None) => builtin::default_table(),
    }
}

/// Read and parse an input file, detecting the format by extension.
pub fn read_input(path: &Path) -> Result<ParsedInput, CarbonError> {
    let format = InputFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    carbon_core::parse_input(&bytes, format)
}
