use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Grid emission factor (kgCO2e per kWh-equivalent) applied to electric home items.
pub const EF_GRID: f64 = 0.52;

/// Gas emission factor applied to gas-fired home items.
pub const EF_GAS: f64 = 2.0;

const FOOD: &[(&str, f64)] = &[
    ("牛肉", 60.0),
    ("羊肉", 24.0),
    ("豬肉", 7.0),
    ("雞肉", 6.0),
    ("魚肉", 6.0),
    ("牛奶", 3.0),
    ("蛋", 4.5),
    ("起司", 9.0),
    ("植物奶", 1.2),
    ("穀物", 2.0),
    ("蔬菜", 2.2),
    ("水果", 1.5),
    ("豆腐", 2.0),
    ("豆類", 1.8),
];

const CLOTHING: &[(&str, f64)] = &[
    ("T恤", 6.5),
    ("牛仔褲", 33.0),
    ("外套", 20.0),
    ("襪子", 1.0),
    ("鞋子", 14.0),
    ("二手衣", 1.0),
    ("修補再用", 0.5),
];

const POWER: &[(&str, f64)] = &[
    ("冷氣", 1.2),
    ("電風扇", 0.05),
    ("電燈", 0.01),
    ("電視", 0.10),
    ("電腦", 0.15),
    ("手機充電", 0.015),
    ("洗衣", 0.5),
    ("烘衣", 1.2),
    ("煮飯_電", 0.4),
    ("暖氣_電", 2.0),
];

const GAS: &[(&str, f64)] = &[("洗澡_瓦斯", 0.2), ("煮飯_瓦斯", 0.2)];

const TRANSPORT: &[(&str, f64)] = &[
    ("汽車", 0.21),
    ("機車", 0.07),
    ("公車", 0.08),
    ("捷運", 0.05),
    ("火車", 0.04),
    ("高鐵", 0.03),
    ("飛機", 0.15),
    ("船", 0.25),
    ("自行車", 0.0),
    ("走路", 0.0),
];

/// Input category. Power and gas are the two halves of "home".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Clothing,
    Power,
    Gas,
    Transport,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Clothing,
        Category::Power,
        Category::Gas,
        Category::Transport,
    ];

    /// Key used in config files, quantity sheets and `--set` assignments
    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Clothing => "clothing",
            Category::Power => "power",
            Category::Gas => "gas",
            Category::Transport => "transport",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Clothing => "Clothing",
            Category::Power => "Home (electric)",
            Category::Gas => "Home (gas)",
            Category::Transport => "Transport",
        }
    }

    /// Unit the quantity is measured in
    pub fn unit(&self) -> &'static str {
        match self {
            Category::Food => "kg",
            Category::Clothing => "items",
            Category::Power | Category::Gas => "hours",
            Category::Transport => "km",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "clothing" | "clothes" => Ok(Category::Clothing),
            "power" | "electric" => Ok(Category::Power),
            "gas" => Ok(Category::Gas),
            "transport" | "traffic" => Ok(Category::Transport),
            other => bail!(
                "Unknown category '{}'. Expected one of: food, clothing, power, gas, transport",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub name: String,
    pub coefficient: f64,
}

/// Ordered item -> coefficient list for one category.
/// Declaration order is iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorSet {
    factors: Vec<Factor>,
}

impl FactorSet {
    pub fn new(factors: Vec<Factor>) -> Self {
        Self { factors }
    }

    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            factors: pairs
                .iter()
                .map(|(name, coefficient)| Factor {
                    name: name.to_string(),
                    coefficient: *coefficient,
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Factor> {
        self.factors.iter()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.factors
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.coefficient)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Process-wide emission factor table.
///
/// Built once at startup (defaults, then config overrides) and shared by
/// reference afterwards. There are no mutating methods.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionFactorTable {
    food: FactorSet,
    clothing: FactorSet,
    power: FactorSet,
    gas: FactorSet,
    transport: FactorSet,
    grid_factor: f64,
    gas_factor: f64,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self {
            food: FactorSet::from_pairs(FOOD),
            clothing: FactorSet::from_pairs(CLOTHING),
            power: FactorSet::from_pairs(POWER),
            gas: FactorSet::from_pairs(GAS),
            transport: FactorSet::from_pairs(TRANSPORT),
            grid_factor: EF_GRID,
            gas_factor: EF_GAS,
        }
    }
}

impl EmissionFactorTable {
    pub fn new(
        food: FactorSet,
        clothing: FactorSet,
        power: FactorSet,
        gas: FactorSet,
        transport: FactorSet,
        grid_factor: f64,
        gas_factor: f64,
    ) -> Self {
        Self {
            food,
            clothing,
            power,
            gas,
            transport,
            grid_factor,
            gas_factor,
        }
    }

    pub fn category(&self, category: Category) -> &FactorSet {
        match category {
            Category::Food => &self.food,
            Category::Clothing => &self.clothing,
            Category::Power => &self.power,
            Category::Gas => &self.gas,
            Category::Transport => &self.transport,
        }
    }

    /// Conversion multipliers chained onto every item of a category
    pub fn multipliers(&self, category: Category) -> Vec<f64> {
        match category {
            Category::Power => vec![self.grid_factor],
            Category::Gas => vec![self.gas_factor],
            _ => Vec::new(),
        }
    }

    pub fn grid_factor(&self) -> f64 {
        self.grid_factor
    }

    pub fn gas_factor(&self) -> f64 {
        self.gas_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_keeps_declared_order() {
        let table = EmissionFactorTable::default();
        let names: Vec<&str> = table
            .category(Category::Food)
            .iter()
            .take(3)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["牛肉", "羊肉", "豬肉"]);
    }

    #[test]
    fn test_default_coefficients_non_negative() {
        let table = EmissionFactorTable::default();
        for category in Category::ALL {
            for factor in table.category(category).iter() {
                assert!(factor.coefficient >= 0.0, "{} is negative", factor.name);
            }
        }
    }

    #[test]
    fn test_multipliers_per_category() {
        let table = EmissionFactorTable::default();
        assert_eq!(table.multipliers(Category::Power), vec![EF_GRID]);
        assert_eq!(table.multipliers(Category::Gas), vec![EF_GAS]);
        assert!(table.multipliers(Category::Food).is_empty());
        assert!(table.multipliers(Category::Transport).is_empty());
    }

    #[test]
    fn test_home_items_split_by_source() {
        let table = EmissionFactorTable::default();
        assert!(table.category(Category::Gas).iter().all(|f| f.name.contains("瓦斯")));
        assert!(!table.category(Category::Power).iter().any(|f| f.name.contains("瓦斯")));
    }

    #[test]
    fn test_factor_set_lookup() {
        let set = FactorSet::from_pairs(&[("a", 1.5), ("b", 0.0)]);
        assert_eq!(set.get("a"), Some(1.5));
        assert_eq!(set.get("b"), Some(0.0));
        assert_eq!(set.get("c"), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_parse_category_aliases() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("Clothes".parse::<Category>().unwrap(), Category::Clothing);
        assert_eq!("traffic".parse::<Category>().unwrap(), Category::Transport);
        assert!("home".parse::<Category>().is_err());
    }
}
