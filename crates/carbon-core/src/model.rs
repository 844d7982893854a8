use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three input categories a calculation is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Materials,
    Transport,
    Energy,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Materials => write!(f, "materials"),
            Category::Transport => write!(f, "transport"),
            Category::Energy => write!(f, "energy"),
        }
    }
}

/// Points at one line item of a `CalculationInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRef {
    pub category: Category,
    pub index: usize,
}

impl LineRef {
    pub fn new(category: Category, index: usize) -> Self {
        Self { category, index }
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.category, self.index)
    }
}

/// One material line item, e.g. 1000 kg of concrete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInput {
    #[serde(rename = "type")]
    pub material_type: String,
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// kg CO2e per declared unit, overriding the factor table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<Decimal>,
}

impl MaterialInput {
    pub fn new(material_type: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            material_type: material_type.into(),
            quantity,
            unit: None,
            carbon_footprint: None,
        }
    }

    pub fn with_carbon_footprint(mut self, factor: Decimal) -> Self {
        self.carbon_footprint = Some(factor);
        self
    }
}

/// One freight leg. Distance in km, weight in kg, factor in kg CO2e per tonne-km.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportInput {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub distance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_factor: Option<Decimal>,
}

impl TransportInput {
    pub fn new(distance: Decimal) -> Self {
        Self {
            mode: None,
            distance,
            weight: None,
            carbon_footprint: None,
            load_factor: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_weight(mut self, weight_kg: Decimal) -> Self {
        self.weight = Some(weight_kg);
        self
    }

    pub fn with_carbon_footprint(mut self, factor: Decimal) -> Self {
        self.carbon_footprint = Some(factor);
        self
    }

    pub fn with_load_factor(mut self, load_factor: Decimal) -> Self {
        self.load_factor = Some(load_factor);
        self
    }
}

/// One energy consumption line item, e.g. 1000 kWh of grid electricity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyInput {
    #[serde(rename = "type")]
    pub energy_type: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Share of the supply from renewable sources, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewable_percentage: Option<Decimal>,
    /// kg CO2e per unit, overriding the factor table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<Decimal>,
}

impl EnergyInput {
    pub fn new(energy_type: impl Into<String>, amount: Decimal) -> Self {
        Self {
            energy_type: energy_type.into(),
            amount,
            unit: None,
            renewable_percentage: None,
            factor: None,
        }
    }

    pub fn with_renewable_percentage(mut self, pct: Decimal) -> Self {
        self.renewable_percentage = Some(pct);
        self
    }

    pub fn with_factor(mut self, factor: Decimal) -> Self {
        self.factor = Some(factor);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    #[serde(default)]
    pub materials: Vec<MaterialInput>,
    #[serde(default)]
    pub transport: Vec<TransportInput>,
    #[serde(default)]
    pub energy: Vec<EnergyInput>,
}

impl CalculationInput {
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.transport.is_empty() && self.energy.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.materials.len() + self.transport.len() + self.energy.len()
    }
}
