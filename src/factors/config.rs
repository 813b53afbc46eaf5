use serde::{Deserialize, Serialize};

use super::table::{Category, EmissionFactorTable, Factor, FactorSet};

/// Emission factor overrides.
///
/// Every field is optional. A category list replaces the built-in list for
/// that category wholesale; omitted categories keep their defaults.
///
/// Example YAML:
/// ```yaml
/// factors:
///   grid_factor: 0.49
///   food:
///     - { name: 牛肉, factor: 60 }
///     - { name: 蔬菜, factor: 2.2 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FactorConfig {
    /// Multiplier for electric home items (default: 0.52)
    #[serde(default)]
    pub grid_factor: Option<f64>,

    /// Multiplier for gas-fired home items (default: 2.0)
    #[serde(default)]
    pub gas_factor: Option<f64>,

    #[serde(default)]
    pub food: Option<Vec<FactorEntry>>,

    #[serde(default)]
    pub clothing: Option<Vec<FactorEntry>>,

    #[serde(default)]
    pub power: Option<Vec<FactorEntry>>,

    #[serde(default)]
    pub gas: Option<Vec<FactorEntry>>,

    #[serde(default)]
    pub transport: Option<Vec<FactorEntry>>,
}

/// One item and its coefficient (kgCO2e per unit)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FactorEntry {
    pub name: String,
    pub factor: f64,
}

impl FactorConfig {
    pub fn entries(&self, category: Category) -> Option<&[FactorEntry]> {
        let entries = match category {
            Category::Food => &self.food,
            Category::Clothing => &self.clothing,
            Category::Power => &self.power,
            Category::Gas => &self.gas,
            Category::Transport => &self.transport,
        };
        entries.as_deref()
    }

    /// Apply the overrides on top of the built-in table.
    /// Call `validate_factors` first; this does no checking of its own.
    pub fn apply(&self, defaults: &EmissionFactorTable) -> EmissionFactorTable {
        let set_for = |category: Category| match self.entries(category) {
            Some(entries) => FactorSet::new(
                entries
                    .iter()
                    .map(|e| Factor {
                        name: e.name.trim().to_string(),
                        coefficient: e.factor,
                    })
                    .collect(),
            ),
            None => defaults.category(category).clone(),
        };

        EmissionFactorTable::new(
            set_for(Category::Food),
            set_for(Category::Clothing),
            set_for(Category::Power),
            set_for(Category::Gas),
            set_for(Category::Transport),
            self.grid_factor.unwrap_or(defaults.grid_factor()),
            self.gas_factor.unwrap_or(defaults.gas_factor()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_factor_config_parse() {
        let config: FactorConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, FactorConfig::default());
    }

    #[test]
    fn test_partial_factor_config_parse() {
        let yaml = r#"
grid_factor: 0.49
food:
  - name: 牛肉
    factor: 55
  - { name: 蔬菜, factor: 2.2 }
"#;
        let config: FactorConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.grid_factor, Some(0.49));
        assert!(config.gas_factor.is_none());
        let food = config.food.unwrap();
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].name, "牛肉");
        assert_eq!(food[0].factor, 55.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "electricity: 0.5\n";
        assert!(serde_saphyr::from_str::<FactorConfig>(yaml).is_err());
    }

    #[test]
    fn test_apply_replaces_only_given_categories() {
        let defaults = EmissionFactorTable::default();
        let config = FactorConfig {
            grid_factor: Some(0.4),
            transport: Some(vec![FactorEntry {
                name: "電動車".to_string(),
                factor: 0.05,
            }]),
            ..FactorConfig::default()
        };

        let table = config.apply(&defaults);
        assert_eq!(table.grid_factor(), 0.4);
        assert_eq!(table.gas_factor(), defaults.gas_factor());
        assert_eq!(table.category(Category::Transport).len(), 1);
        assert_eq!(table.category(Category::Transport).get("電動車"), Some(0.05));
        assert_eq!(
            table.category(Category::Food),
            defaults.category(Category::Food)
        );
    }
}
