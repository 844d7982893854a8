use carbon_core::error::CarbonError;
use carbon_core::factors::builtin;
use carbon_core::factors::EmissionFactorTable;
use carbon_core::model::Category;
use std::path::Path;

const CATEGORIES: [Category; 3] = [Category::Materials, Category::Transport, Category::Energy];

pub fn list() -> Result<(), CarbonError> {
    println!("Available factor tables:\n");
    for name in builtin::PRESETS {
        let table = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<8} {} (v{}){}",
            name,
            table.name(),
            table.version(),
            default_marker
        );
        if let Some(ref desc) = table.def().description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), CarbonError> {
    let table = builtin::load_preset(preset)?;
    let def = table.def();

    println!("{} (version {})\n", def.name, def.version);
    if let Some(ref desc) = def.description {
        println!("{}\n", desc);
    }
    if let Some(ref source) = def.source {
        println!("Source: {}\n", source);
    }

    println!("Defaults for unrecognized types:");
    println!("  material factor   {} kg CO2e per unit", def.defaults.material_factor);
    println!("  energy factor     {} kg CO2e per unit", def.defaults.energy_factor);
    println!("  transport type    {}", def.defaults.transport_type);
    println!("  payload           {} kg (legs without a weight)", def.defaults.payload_kg);
    println!();

    for category in CATEGORIES {
        print_entries(&table, category);
    }

    println!("Energy lines for natural_gas, lpg, diesel and petrol are scope 1;");
    println!("electricity is scope 2; materials and transport are scope 3.");
    println!("The renewable percentage discounts the energy total and scope 2,");
    println!("but scope 1 always reports gross combustion emissions.\n");

    Ok(())
}

fn print_entries(table: &EmissionFactorTable, category: Category) {
    let entries = table.entries(category);
    println!("{} ({} entries):", capitalize(&category.to_string()), entries.len());
    if entries.is_empty() {
        println!();
        return;
    }

    let max_key_len = entries.keys().map(|k| k.len()).max().unwrap_or(20);

    println!(
        "  {:<width$}  {:<10}  {:<6}  Label",
        "Key",
        "Factor",
        "Unit",
        width = max_key_len
    );
    println!("  {}", "-".repeat(max_key_len + 2 + 10 + 2 + 6 + 2 + 30));

    for (key, entry) in entries {
        println!(
            "  {:<width$}  {:<10}  {:<6}  {}",
            key,
            entry.factor.to_string(),
            entry.unit.as_deref().unwrap_or("-"),
            table.label(category, key),
            width = max_key_len
        );
    }
    println!();
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn schema() -> Result<(), CarbonError> {
    print!(
        r#"JSON Factor Table Schema
========================

A factor table maps material, transport and energy types to emission
factors in kg CO2e. When you run `carbon calculate`, each line item
without its own factor is looked up in the table by its normalized type.

Top-level fields:
  name          (string, required)  Human-readable name of the table
  description   (string, optional)  What this table is for
  version       (string, required)  Version identifier (e.g., "2024.1")
  source        (string, optional)  Dataset or publication the factors come from
  defaults      (object, required)  Fallbacks for unrecognized types (see below)
  materials     (object, optional)  Material key -> factor entry (kg CO2e per unit)
  transport     (object, optional)  Transport mode -> factor entry (kg CO2e per tonne-km)
  energy        (object, optional)  Energy type -> factor entry (kg CO2e per unit)

The "defaults" object:
  material_factor  (string, required)  Factor for unknown materials
  transport_type   (string, required)  Mode used for legs without one.
                                       Must be a key in "transport".
  energy_factor    (string, required)  Factor for unknown energy types
  payload_kg       (string, optional)  Payload for legs without a weight.
                                       Default: "1000"

Each factor entry:
  factor        (string, required)  Non-negative decimal factor
  unit          (string, optional)  Declared unit, for display
  label         (string, optional)  Display name
  note          (string, optional)  Reference or explanation

Keys must be canonical: lowercase letters, digits and single underscores
(e.g., "reinforcing_steel"). Input types are normalized the same way, so
"Reinforcing Steel" and "reinforcing-steel" both match.

Example:
{{
  "name": "Project factors",
  "version": "1.0",
  "defaults": {{
    "material_factor": "0.5",
    "transport_type": "road_transport_heavy_vehicle",
    "energy_factor": "0.5"
  }},
  "materials": {{
    "concrete": {{ "factor": "0.12", "unit": "kg", "label": "Concrete" }}
  }},
  "transport": {{
    "road_transport_heavy_vehicle": {{ "factor": "0.107", "unit": "tkm" }}
  }},
  "energy": {{
    "electricity": {{ "factor": "0.94", "unit": "kWh", "note": "State grid" }}
  }}
}}

Note: factor values must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "0.12" not 0.12).
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), CarbonError> {
    let table = carbon_core::factors::load_factor_table(file)?;
    let def = table.def();

    println!("Factor table '{}' (v{}) is valid.", def.name, def.version);
    for category in CATEGORIES {
        println!(
            "  {}: {} entries",
            capitalize(&category.to_string()),
            table.entries(category).len()
        );
    }

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for category in CATEGORIES {
        for (key, entry) in table.entries(category) {
            if entry.factor.is_zero() {
                warnings.push(format!("{} '{}' has a zero factor", category, key));
            }
            if entry.unit.is_none() {
                warnings.push(format!("{} '{}' declares no unit", category, key));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
