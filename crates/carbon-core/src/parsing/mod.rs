pub mod input;
pub mod normalize;
pub mod values;

use crate::model::{CalculationInput, LineRef};
use serde::{Deserialize, Serialize};

pub use input::{parse_input_json, parse_input_value};

/// A data-quality problem found while coercing a line item. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub line: LineRef,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub reason: String,
}

/// Result of parsing an input document: the canonical input plus warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedInput {
    pub input: CalculationInput,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}
