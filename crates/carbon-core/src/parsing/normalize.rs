use std::collections::HashMap;
use std::sync::LazyLock;

/// Normalize a material, transport or energy type name to a canonical key.
///
/// Steps:
/// 1. Lowercase
/// 2. Replace anything that is not a letter or digit with underscores
/// 3. Collapse multiple underscores and trim them from both ends
/// 4. Look up in alias map
pub fn normalize_key(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();

    let mut result = String::with_capacity(lower.len());
    let mut prev_underscore = true; // start true to skip leading underscores
    for c in lower.chars() {
        if c.is_alphanumeric() {
            result.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            result.push('_');
            prev_underscore = true;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }

    match ALIASES.get(result.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => result,
    }
}

/// Returns true if `key` is already in canonical form.
pub fn is_canonical(key: &str) -> bool {
    !key.is_empty() && normalize_key(key) == key
}

static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Materials
    m.insert("concrete_general", "concrete");
    m.insert("ready_mix_concrete", "concrete");
    m.insert("readymix_concrete", "concrete");
    m.insert("steel_reinforcing", "reinforcing_steel");
    m.insert("rebar", "reinforcing_steel");
    m.insert("reinforcement", "reinforcing_steel");
    m.insert("steel_structural", "structural_steel");
    m.insert("steel_section", "structural_steel");
    m.insert("aluminum", "aluminium");
    m.insert("timber_softwood", "timber");
    m.insert("softwood", "timber");
    m.insert("sawn_timber", "timber");
    m.insert("clt", "cross_laminated_timber");
    m.insert("glulam", "glued_laminated_timber");
    m.insert("plasterboard", "gypsum_board");
    m.insert("drywall", "gypsum_board");
    m.insert("portland_cement", "cement");
    m.insert("opc", "cement");
    m.insert("bricks", "brick");
    m.insert("clay_brick", "brick");
    m.insert("float_glass", "glass");
    m.insert("gravel", "aggregate");
    m.insert("crushed_rock", "aggregate");

    // Transport
    m.insert("road_transport_heavy_vehicle", "road_transport_heavy_vehicle");
    m.insert("truck", "road_transport_heavy_vehicle");
    m.insert("lorry", "road_transport_heavy_vehicle");
    m.insert("hgv", "road_transport_heavy_vehicle");
    m.insert("heavy_vehicle", "road_transport_heavy_vehicle");
    m.insert("road", "road_transport_heavy_vehicle");
    m.insert("van", "road_transport_light_vehicle");
    m.insert("light_vehicle", "road_transport_light_vehicle");
    m.insert("road_transport_light_vehicle", "road_transport_light_vehicle");
    m.insert("train", "rail_freight");
    m.insert("rail", "rail_freight");
    m.insert("ship", "sea_freight");
    m.insert("sea", "sea_freight");
    m.insert("shipping", "sea_freight");
    m.insert("plane", "air_freight");
    m.insert("air", "air_freight");

    // Energy
    m.insert("grid_electricity", "electricity");
    m.insert("electricity_grid", "electricity");
    m.insert("power", "electricity");
    m.insert("gas", "natural_gas");
    m.insert("natural_gas_pipeline", "natural_gas");
    m.insert("lpg_gas", "lpg");
    m.insert("liquefied_petroleum_gas", "lpg");
    m.insert("propane", "lpg");
    m.insert("gasoline", "petrol");
    m.insert("unleaded_petrol", "petrol");
    m.insert("diesel_oil", "diesel");
    m.insert("gas_oil", "diesel");

    m
});
