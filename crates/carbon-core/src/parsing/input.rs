use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::values::{coerce_number, json_kind, Coerced};
use super::{ParseWarning, ParsedInput};
use crate::error::CarbonError;
use crate::model::{
    CalculationInput, Category, EnergyInput, LineRef, MaterialInput, TransportInput,
};

const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

// Field aliases in precedence order: the first present, non-null key wins.
const MATERIAL_TYPE: &[&str] = &["type", "material", "name"];
const MATERIAL_QUANTITY: &[&str] = &["quantity", "amount"];
const MATERIAL_FACTOR: &[&str] = &["carbonFootprint", "factor", "carbon_footprint_kgco2e_kg"];
const TRANSPORT_TYPE: &[&str] = &["type", "mode"];
const TRANSPORT_DISTANCE: &[&str] = &["distance"];
const TRANSPORT_WEIGHT: &[&str] = &["weight"];
const TRANSPORT_FACTOR: &[&str] = &["carbonFootprint", "factor"];
const TRANSPORT_LOAD_FACTOR: &[&str] = &["loadFactor"];
const ENERGY_TYPE: &[&str] = &["type", "source"];
const ENERGY_AMOUNT: &[&str] = &["amount", "quantity"];
const ENERGY_RENEWABLE: &[&str] = &["renewablePercentage"];
const ENERGY_FACTOR: &[&str] = &["factor", "carbonFootprint"];
const UNIT: &[&str] = &["unit"];

/// Parse a JSON document of `{ materials, transport, energy }` line items.
pub fn parse_input_json(json: &str) -> Result<ParsedInput, CarbonError> {
    let root: Value = serde_json::from_str(json)?;
    parse_input_value(&root)
}

/// Parse loosely-typed line items into a canonical `CalculationInput`.
///
/// Numeric fields may arrive as numbers or strings; anything unparsable is
/// read as zero (or as absent for optional fields) and reported as a
/// warning. Only structural problems, where a category is not an array or a
/// line item is not an object, are errors.
pub fn parse_input_value(root: &Value) -> Result<ParsedInput, CarbonError> {
    let obj = root.as_object().ok_or_else(|| {
        CarbonError::InvalidInput(format!(
            "expected an object with materials, transport and energy arrays, found {}",
            json_kind(root)
        ))
    })?;

    let mut warnings = Vec::new();
    let mut input = CalculationInput::default();

    for (i, item) in line_items(obj, Category::Materials)?.iter().enumerate() {
        let mut line = LineParser::new(item, LineRef::new(Category::Materials, i), &mut warnings)?;
        input.materials.push(line.material());
    }
    for (i, item) in line_items(obj, Category::Transport)?.iter().enumerate() {
        let mut line = LineParser::new(item, LineRef::new(Category::Transport, i), &mut warnings)?;
        input.transport.push(line.transport());
    }
    for (i, item) in line_items(obj, Category::Energy)?.iter().enumerate() {
        let mut line = LineParser::new(item, LineRef::new(Category::Energy, i), &mut warnings)?;
        input.energy.push(line.energy());
    }

    Ok(ParsedInput { input, warnings })
}

/// The array stored under a category's key. Absent or `null` reads as empty.
fn line_items(obj: &Map<String, Value>, category: Category) -> Result<&[Value], CarbonError> {
    let key = category.to_string();
    match obj.get(&key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(CarbonError::InvalidInput(format!(
            "'{}' must be an array, found {}",
            key,
            json_kind(other)
        ))),
    }
}

struct LineParser<'a> {
    obj: &'a Map<String, Value>,
    line: LineRef,
    warnings: &'a mut Vec<ParseWarning>,
}

impl<'a> LineParser<'a> {
    fn new(
        item: &'a Value,
        line: LineRef,
        warnings: &'a mut Vec<ParseWarning>,
    ) -> Result<Self, CarbonError> {
        let obj = item.as_object().ok_or_else(|| {
            CarbonError::InvalidInput(format!(
                "{} must be an object, found {}",
                line,
                json_kind(item)
            ))
        })?;
        Ok(Self {
            obj,
            line,
            warnings,
        })
    }

    fn material(&mut self) -> MaterialInput {
        MaterialInput {
            material_type: self.required_text(MATERIAL_TYPE),
            quantity: self.required_number(MATERIAL_QUANTITY),
            unit: self.text(UNIT),
            carbon_footprint: self.optional_number(MATERIAL_FACTOR),
        }
    }

    fn transport(&mut self) -> TransportInput {
        TransportInput {
            mode: self.text(TRANSPORT_TYPE),
            distance: self.required_number(TRANSPORT_DISTANCE),
            weight: self.optional_number(TRANSPORT_WEIGHT),
            carbon_footprint: self.optional_number(TRANSPORT_FACTOR),
            load_factor: self.optional_number(TRANSPORT_LOAD_FACTOR),
        }
    }

    fn energy(&mut self) -> EnergyInput {
        EnergyInput {
            energy_type: self.required_text(ENERGY_TYPE),
            amount: self.required_number(ENERGY_AMOUNT),
            unit: self.text(UNIT),
            renewable_percentage: self.percentage(ENERGY_RENEWABLE),
            factor: self.optional_number(ENERGY_FACTOR),
        }
    }

    /// First alias holding a value. `null` and blank strings fall through
    /// to the next alias.
    fn field(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        keys.iter().find_map(|k| match self.obj.get(*k) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some((*k, v)),
        })
    }

    fn warn(&mut self, field: &str, raw: Option<&Value>, reason: impl Into<String>) {
        self.warnings.push(ParseWarning {
            line: self.line,
            field: field.to_string(),
            raw: raw.map(raw_text),
            reason: reason.into(),
        });
    }

    fn text(&mut self, keys: &[&'static str]) -> Option<String> {
        let (key, value) = self.field(keys)?;
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => {
                self.warn(key, Some(other), format!("expected text, found {}", json_kind(other)));
                None
            }
        }
    }

    fn required_text(&mut self, keys: &[&'static str]) -> String {
        match self.text(keys) {
            Some(s) => s,
            None => {
                // Non-text values were already reported by `text`.
                let reported = matches!(self.field(keys), Some((_, v)) if !v.is_string());
                if !reported {
                    self.warn(keys[0], None, "missing type, default factor applies");
                }
                String::new()
            }
        }
    }

    fn coerce(&mut self, keys: &[&'static str]) -> (&'static str, Option<&'a Value>, Coerced) {
        match self.field(keys) {
            Some((key, value)) => (key, Some(value), coerce_number(Some(value))),
            None => (keys[0], None, Coerced::Missing),
        }
    }

    /// A field the formula needs; missing or invalid values read as zero.
    fn required_number(&mut self, keys: &[&'static str]) -> Decimal {
        let (key, raw, coerced) = self.coerce(keys);
        match &coerced {
            Coerced::Value(v) => *v,
            Coerced::Missing => {
                self.warn(key, raw, "missing value, read as 0");
                Decimal::ZERO
            }
            Coerced::Invalid(reason) => {
                self.warn(key, raw, format!("{reason}, read as 0"));
                Decimal::ZERO
            }
        }
    }

    /// A field with a fallback; invalid values are dropped so the fallback applies.
    fn optional_number(&mut self, keys: &[&'static str]) -> Option<Decimal> {
        let (key, raw, coerced) = self.coerce(keys);
        if let Coerced::Invalid(reason) = &coerced {
            self.warn(key, raw, format!("{reason}, ignored"));
        }
        coerced.value()
    }

    fn percentage(&mut self, keys: &[&'static str]) -> Option<Decimal> {
        let (key, raw, coerced) = self.coerce(keys);
        match coerced {
            Coerced::Value(v) if v > MAX_PERCENTAGE => {
                self.warn(key, raw, "percentage above 100, clamped to 100");
                Some(MAX_PERCENTAGE)
            }
            Coerced::Value(v) => Some(v),
            Coerced::Missing => None,
            Coerced::Invalid(reason) => {
                self.warn(key, raw, format!("{reason}, read as 0"));
                None
            }
        }
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
