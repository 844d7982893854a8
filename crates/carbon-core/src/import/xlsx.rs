use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use serde_json::{Map, Number, Value};

use crate::error::CarbonError;
use crate::model::Category;
use crate::parsing::normalize::normalize_key;
use crate::parsing::{parse_input_value, ParsedInput};

/// Parse a bill-of-quantities workbook into calculation input.
///
/// Reads sheets named `Materials`, `Transport` and `Energy` (any case). The
/// first row of each sheet holds column headers; rows are read until the
/// first blank row. Cells go through the same coercion as JSON input, so a
/// text cell like "1,200" is read as a number.
pub fn parse_input_xlsx(bytes: &[u8]) -> Result<ParsedInput, CarbonError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| CarbonError::ParseError(format!("failed to open xlsx: {e}")))?;

    let sheet_names = workbook.sheet_names();
    let mut root = Map::new();

    for category in [Category::Materials, Category::Transport, Category::Energy] {
        let key = category.to_string();
        let Some(name) = sheet_names
            .iter()
            .find(|n| n.trim().eq_ignore_ascii_case(&key))
        else {
            continue;
        };
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| CarbonError::ParseError(format!("failed to read sheet '{name}': {e}")))?;
        root.insert(key, Value::Array(sheet_rows(&range)));
    }

    if root.is_empty() {
        return Err(CarbonError::ParseError(
            "workbook has no Materials, Transport or Energy sheet".into(),
        ));
    }

    parse_input_value(&Value::Object(root))
}

/// Convert a sheet into JSON line items keyed by input field name.
///
/// Columns whose header is not a recognized field are ignored.
pub fn sheet_rows(range: &Range<Data>) -> Vec<Value> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let fields: Vec<Option<&'static str>> = header
        .iter()
        .map(|cell| cell_as_string(cell).and_then(|h| header_field(&h)))
        .collect();

    let mut items = Vec::new();
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            break; // Blank row = end of data
        }
        let mut item = Map::new();
        for (cell, field) in row.iter().zip(&fields) {
            if let Some(field) = field {
                item.insert(field.to_string(), cell_as_json(cell));
            }
        }
        items.push(Value::Object(item));
    }
    items
}

/// Map a column header to the JSON field name it feeds.
fn header_field(header: &str) -> Option<&'static str> {
    let field = match normalize_key(header).as_str() {
        "type" => "type",
        "material" => "material",
        "name" | "description" => "name",
        "mode" | "transport_mode" => "mode",
        "source" | "energy_source" => "source",
        "quantity" | "qty" => "quantity",
        "amount" => "amount",
        "unit" | "units" => "unit",
        "distance" | "distance_km" => "distance",
        "weight" | "weight_kg" => "weight",
        "carbon_footprint" | "carbonfootprint" => "carbonFootprint",
        "factor" | "emission_factor" => "factor",
        "carbon_footprint_kgco2e_kg" => "carbon_footprint_kgco2e_kg",
        "load_factor" | "loadfactor" => "loadFactor",
        "renewable_percentage" | "renewablepercentage" | "renewable" => "renewablePercentage",
        _ => return None,
    };
    Some(field)
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn cell_as_json(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.trim().to_string()),
        other => Value::String(format!("{other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.into())
    }

    #[test]
    fn header_aliases() {
        assert_eq!(header_field("Carbon Footprint"), Some("carbonFootprint"));
        assert_eq!(header_field("Renewable %"), Some("renewablePercentage"));
        assert_eq!(header_field("Distance (km)"), Some("distance"));
        assert_eq!(header_field("Notes"), None);
    }

    #[test]
    fn rows_become_line_items() {
        let range = sheet(&[
            &[s("Material"), s("Quantity"), s("Unit"), s("Notes")],
            &[s("Concrete"), Data::Float(1000.0), s("kg"), s("slab")],
            &[s("Rebar"), s("2,500"), s("kg"), Data::Empty],
        ]);
        let items = sheet_rows(&range);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["material"], "Concrete");
        assert_eq!(items[1]["quantity"], "2,500");
        assert!(items[0].get("Notes").is_none());
    }

    #[test]
    fn blank_row_ends_sheet() {
        let range = sheet(&[
            &[s("Type"), s("Amount")],
            &[s("electricity"), Data::Int(100)],
            &[Data::Empty, Data::Empty],
            &[s("diesel"), Data::Int(5)],
        ]);
        assert_eq!(sheet_rows(&range).len(), 1);
    }

    #[test]
    fn sheet_rows_feed_input_parser() {
        let materials = sheet(&[
            &[s("Material"), s("Quantity"), s("Carbon Footprint")],
            &[s("Concrete"), Data::Float(1000.0), Data::Float(0.12)],
        ]);
        let energy = sheet(&[
            &[s("Type"), s("Amount"), s("Renewable %")],
            &[s("Electricity"), Data::Int(1000), Data::Int(50)],
        ]);
        let mut root = Map::new();
        root.insert("materials".into(), Value::Array(sheet_rows(&materials)));
        root.insert("energy".into(), Value::Array(sheet_rows(&energy)));

        let parsed = parse_input_value(&Value::Object(root)).unwrap();
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.input.materials[0].quantity, dec!(1000));
        assert_eq!(parsed.input.materials[0].carbon_footprint, Some(dec!(0.12)));
        assert_eq!(parsed.input.energy[0].renewable_percentage, Some(dec!(50)));
    }

    #[test]
    fn invalid_bytes_rejected() {
        let err = parse_input_xlsx(b"not a workbook").unwrap_err();
        assert!(matches!(err, CarbonError::ParseError(_)));
    }
}
