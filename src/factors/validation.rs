use std::collections::HashSet;

use super::config::FactorConfig;
use super::table::{Category, EmissionFactorTable};

/// Validate factor overrides at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_factors(config: &FactorConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("grid_factor", config.grid_factor),
        ("gas_factor", config.gas_factor),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                errors.push(format!("factors.{}: must be a positive number, got {}", field, v));
            }
        }
    }

    for category in Category::ALL {
        let Some(entries) = config.entries(category) else {
            continue;
        };

        let mut seen = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            let name = entry.name.trim();
            if name.is_empty() {
                errors.push(format!("factors.{}[{}].name: must not be empty", category, i));
            } else if !seen.insert(name) {
                errors.push(format!(
                    "factors.{}[{}].name: duplicate item '{}'",
                    category, i, name
                ));
            }

            if !entry.factor.is_finite() || entry.factor < 0.0 {
                errors.push(format!(
                    "factors.{}[{}].factor: must be non-negative, got {}",
                    category, i, entry.factor
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and build the effective table from optional overrides
pub fn build_table(config: Option<&FactorConfig>) -> Result<EmissionFactorTable, Vec<String>> {
    let defaults = EmissionFactorTable::default();
    match config {
        Some(config) => {
            validate_factors(config)?;
            Ok(config.apply(&defaults))
        }
        None => Ok(defaults),
    }
}
