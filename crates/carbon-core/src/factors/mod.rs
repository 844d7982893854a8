pub mod builtin;
pub mod schema;

use crate::error::CarbonError;
use crate::model::Category;
use crate::parsing::normalize::{is_canonical, normalize_key};
use rust_decimal::Decimal;
use schema::{FactorDef, FactorTableDef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Breakdown key for line items that name no type at all.
pub const UNSPECIFIED_KEY: &str = "unspecified";

/// Load a factor table from a JSON file.
pub fn load_factor_table(path: &Path) -> Result<EmissionFactorTable, CarbonError> {
    let content = std::fs::read_to_string(path).map_err(|e| CarbonError::FactorTableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_factor_table(&content, path)
}

/// Parse a factor table from a JSON string.
pub fn parse_factor_table(json: &str, source: &Path) -> Result<EmissionFactorTable, CarbonError> {
    let def: FactorTableDef =
        serde_json::from_str(json).map_err(|e| CarbonError::FactorTableLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    EmissionFactorTable::new(def)
}

/// Parse a factor table from a JSON string (no file path context).
pub fn parse_factor_table_str(json: &str) -> Result<EmissionFactorTable, CarbonError> {
    let def: FactorTableDef = serde_json::from_str(json).map_err(CarbonError::Json)?;
    EmissionFactorTable::new(def)
}

/// Validate that a factor table is well-formed.
pub fn validate_factor_table(def: &FactorTableDef) -> Result<(), CarbonError> {
    if def.name.trim().is_empty() {
        return Err(CarbonError::FactorTableInvalid(
            "name must not be empty".into(),
        ));
    }

    if def.version.trim().is_empty() {
        return Err(CarbonError::FactorTableInvalid(
            "version must not be empty".into(),
        ));
    }

    for (category, entries) in [
        (Category::Materials, &def.materials),
        (Category::Transport, &def.transport),
        (Category::Energy, &def.energy),
    ] {
        for (key, entry) in entries {
            if !is_canonical(key) {
                return Err(CarbonError::FactorTableInvalid(format!(
                    "{} key '{}' is not canonical (expected '{}')",
                    category,
                    key,
                    normalize_key(key)
                )));
            }
            if entry.factor < Decimal::ZERO {
                return Err(CarbonError::FactorTableInvalid(format!(
                    "{} '{}' has negative factor {}",
                    category, key, entry.factor
                )));
            }
        }
    }

    let defaults = &def.defaults;
    if defaults.material_factor < Decimal::ZERO || defaults.energy_factor < Decimal::ZERO {
        return Err(CarbonError::FactorTableInvalid(
            "default factors must not be negative".into(),
        ));
    }

    if defaults.payload_kg <= Decimal::ZERO {
        return Err(CarbonError::FactorTableInvalid(format!(
            "default payload must be positive, found {}",
            defaults.payload_kg
        )));
    }

    if !def.transport.contains_key(&defaults.transport_type) {
        return Err(CarbonError::FactorTableInvalid(format!(
            "default transport type '{}' is not in the transport table",
            defaults.transport_type
        )));
    }

    Ok(())
}

/// Where a line item's emission factor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorSource {
    /// Supplied on the line item itself.
    Supplied,
    /// Found in the factor table.
    Table,
    /// Type unknown to the table; the table's default factor applies.
    Default,
}

/// A resolved factor for one line item.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorLookup {
    /// Canonical key the line item is reported under.
    pub key: String,
    pub factor: Decimal,
    pub source: FactorSource,
}

/// Identifies the table a result was computed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorTableStamp {
    pub name: String,
    pub version: String,
}

/// A validated, immutable factor table.
///
/// The calculator takes the table as a parameter, so callers can swap in
/// project-specific tables without touching global state.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionFactorTable {
    def: FactorTableDef,
}

impl EmissionFactorTable {
    pub fn new(def: FactorTableDef) -> Result<Self, CarbonError> {
        validate_factor_table(&def)?;
        Ok(Self { def })
    }

    pub fn def(&self) -> &FactorTableDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn version(&self) -> &str {
        &self.def.version
    }

    pub fn stamp(&self) -> FactorTableStamp {
        FactorTableStamp {
            name: self.def.name.clone(),
            version: self.def.version.clone(),
        }
    }

    pub fn payload_kg(&self) -> Decimal {
        self.def.defaults.payload_kg
    }

    pub fn entries(&self, category: Category) -> &BTreeMap<String, FactorDef> {
        match category {
            Category::Materials => &self.def.materials,
            Category::Transport => &self.def.transport,
            Category::Energy => &self.def.energy,
        }
    }

    /// Display label for a canonical key, falling back to the key itself.
    pub fn label<'a>(&'a self, category: Category, key: &'a str) -> &'a str {
        self.entries(category)
            .get(key)
            .and_then(|e| e.label.as_deref())
            .unwrap_or(key)
    }

    /// Resolve the factor for a line item.
    ///
    /// Precedence: the factor supplied on the line, then the table entry for
    /// the type, then the table default. A transport leg without a mode is
    /// reported under the default transport type.
    pub fn resolve(
        &self,
        category: Category,
        raw_type: Option<&str>,
        supplied: Option<Decimal>,
    ) -> FactorLookup {
        let key = self.canonical_key(category, raw_type);

        if let Some(factor) = supplied {
            return FactorLookup {
                key,
                factor,
                source: FactorSource::Supplied,
            };
        }

        if let Some(entry) = self.entries(category).get(&key) {
            return FactorLookup {
                factor: entry.factor,
                key,
                source: FactorSource::Table,
            };
        }

        FactorLookup {
            factor: self.default_factor(category),
            key,
            source: FactorSource::Default,
        }
    }

    fn canonical_key(&self, category: Category, raw_type: Option<&str>) -> String {
        let key = raw_type.map(normalize_key).unwrap_or_default();
        if !key.is_empty() {
            return key;
        }
        match category {
            Category::Transport => self.def.defaults.transport_type.clone(),
            _ => UNSPECIFIED_KEY.to_string(),
        }
    }

    fn default_factor(&self, category: Category) -> Decimal {
        let defaults = &self.def.defaults;
        match category {
            Category::Materials => defaults.material_factor,
            Category::Energy => defaults.energy_factor,
            Category::Transport => self
                .def
                .transport
                .get(&defaults.transport_type)
                .map(|e| e.factor)
                .unwrap_or(Decimal::ZERO),
        }
    }
}
