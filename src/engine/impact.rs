use serde::{Deserialize, Serialize};

/// Number of people the personal total is extrapolated to
pub const POPULATION_SCALE: f64 = 10_000_000.0;
/// Glacier area lost per ton of CO2e (m2)
pub const GLACIER_M2_PER_TON: f64 = 3.0;
/// Global temperature rise per kg of CO2e (degC)
pub const TEMP_DELTA_PER_KG: f64 = 1.5e-12;
/// CO2e absorbed by one tree in a year (kg)
pub const KG_ABSORBED_PER_TREE: f64 = 22.0;
/// Acidified sea water per kg of CO2e (m3)
pub const SEA_ACID_M3_PER_KG: f64 = 0.05;
/// Social cost of carbon per ton (currency units)
pub const SOCIAL_COST_PER_TON: f64 = 6500.0;
/// Hours of electricity equivalent to one kg of CO2e
pub const POWER_HOURS_PER_KG: f64 = 1.2;

/// Projection parameters. Defaults to the constants above; the config
/// file's `impact:` section can override any of them.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ImpactConstants {
    pub population_scale: f64,
    pub glacier_m2_per_ton: f64,
    pub temp_delta_per_kg: f64,
    pub kg_absorbed_per_tree: f64,
    pub sea_acid_m3_per_kg: f64,
    pub social_cost_per_ton: f64,
    pub power_hours_per_kg: f64,
}

impl Default for ImpactConstants {
    fn default() -> Self {
        Self {
            population_scale: POPULATION_SCALE,
            glacier_m2_per_ton: GLACIER_M2_PER_TON,
            temp_delta_per_kg: TEMP_DELTA_PER_KG,
            kg_absorbed_per_tree: KG_ABSORBED_PER_TREE,
            sea_acid_m3_per_kg: SEA_ACID_M3_PER_KG,
            social_cost_per_ton: SOCIAL_COST_PER_TON,
            power_hours_per_kg: POWER_HOURS_PER_KG,
        }
    }
}

impl ImpactConstants {
    /// Startup check, same shape as factor validation
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if !self.population_scale.is_finite() || self.population_scale < 0.0 {
            errors.push("impact.population_scale: must be non-negative".to_string());
        }
        if !self.kg_absorbed_per_tree.is_finite() || self.kg_absorbed_per_tree <= 0.0 {
            errors.push("impact.kg_absorbed_per_tree: must be positive".to_string());
        }
        for (field, value) in [
            ("glacier_m2_per_ton", self.glacier_m2_per_ton),
            ("temp_delta_per_kg", self.temp_delta_per_kg),
            ("sea_acid_m3_per_kg", self.sea_acid_m3_per_kg),
            ("social_cost_per_ton", self.social_cost_per_ton),
            ("power_hours_per_kg", self.power_hours_per_kg),
        ] {
            if !value.is_finite() {
                errors.push(format!("impact.{}: must be a finite number", field));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// What-if extrapolation of one person's daily total
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactProjection {
    pub scaled_kg: f64,
    pub scaled_tons: f64,
    pub glacier_area_m2: f64,
    pub temp_delta_c: f64,
    pub trees_needed: f64,
    pub sea_acid_volume_m3: f64,
    pub social_cost: f64,
    pub power_hours: f64,
}

impl ImpactProjection {
    /// (label, value, unit) triples in display order
    pub fn metrics(&self) -> [(&'static str, f64, &'static str); 6] {
        [
            ("Glacier area lost", self.glacier_area_m2, "m²"),
            ("Temperature rise", self.temp_delta_c, "°C"),
            ("Trees needed for a year", self.trees_needed, "trees"),
            ("Acidified sea water", self.sea_acid_volume_m3, "m³"),
            ("Social cost", self.social_cost, "$"),
            ("Equivalent power use", self.power_hours, "hours"),
        ]
    }
}

pub fn project(total: f64, constants: &ImpactConstants) -> ImpactProjection {
    let scaled_kg = total * constants.population_scale;
    let scaled_tons = scaled_kg / 1000.0;

    ImpactProjection {
        scaled_kg,
        scaled_tons,
        glacier_area_m2: scaled_tons * constants.glacier_m2_per_ton,
        temp_delta_c: scaled_kg * constants.temp_delta_per_kg,
        trees_needed: scaled_kg / constants.kg_absorbed_per_tree,
        sea_acid_volume_m3: scaled_kg * constants.sea_acid_m3_per_kg,
        social_cost: scaled_tons * constants.social_cost_per_ton,
        power_hours: scaled_kg * constants.power_hours_per_kg,
    }
}
