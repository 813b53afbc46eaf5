use super::aggregate::{aggregate, round2, Contribution};
use super::classify::{classify, EfficiencyScore};
use crate::factors::{Category, EmissionFactorTable};
use crate::input::QuantitySheet;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySubtotal {
    pub category: Category,
    /// kgCO2e, rounded to 2 decimals
    pub value: f64,
    pub contributing: Vec<Contribution>,
}

/// One day's footprint, every figure rounded at its own composition step
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub food: CategorySubtotal,
    pub clothing: CategorySubtotal,
    pub power: CategorySubtotal,
    pub gas: CategorySubtotal,
    /// power + gas, rounded
    pub home: f64,
    pub transport: CategorySubtotal,
    /// food + clothing + home + transport, rounded
    pub total: f64,
}

impl Footprint {
    pub fn score(&self) -> EfficiencyScore {
        classify(self.total)
    }

    pub fn subtotal(&self, category: Category) -> &CategorySubtotal {
        match category {
            Category::Food => &self.food,
            Category::Clothing => &self.clothing,
            Category::Power => &self.power,
            Category::Gas => &self.gas,
            Category::Transport => &self.transport,
        }
    }
}

/// Sum subtotals left to right and round the result
pub fn compose_total(subtotals: &[f64]) -> f64 {
    round2(subtotals.iter().fold(0.0, |acc, v| acc + v))
}

pub fn category_subtotal(
    table: &EmissionFactorTable,
    sheet: &QuantitySheet,
    category: Category,
) -> CategorySubtotal {
    let result = aggregate(
        table.category(category),
        sheet.get(category),
        &table.multipliers(category),
    );
    CategorySubtotal {
        category,
        value: result.subtotal,
        contributing: result.contributing,
    }
}

/// Run the whole engine over one sheet of quantities
pub fn calculate_footprint(table: &EmissionFactorTable, sheet: &QuantitySheet) -> Footprint {
    let food = category_subtotal(table, sheet, Category::Food);
    let clothing = category_subtotal(table, sheet, Category::Clothing);
    let power = category_subtotal(table, sheet, Category::Power);
    let gas = category_subtotal(table, sheet, Category::Gas);
    let transport = category_subtotal(table, sheet, Category::Transport);

    let home = compose_total(&[power.value, gas.value]);
    let total = compose_total(&[food.value, clothing.value, home, transport.value]);

    Footprint {
        food,
        clothing,
        power,
        gas,
        home,
        transport,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_total_rounds() {
        assert_eq!(compose_total(&[0.62, 0.4]), 1.02);
        assert_eq!(compose_total(&[1.111, 2.222]), 3.33);
        assert_eq!(compose_total(&[]), 0.0);
    }

    #[test]
    fn test_compose_total_order_independent() {
        let a = compose_total(&[12.34, 0.62, 7.5, 3.01]);
        let b = compose_total(&[3.01, 7.5, 0.62, 12.34]);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_per_step_close_to_unrounded() {
        let table = EmissionFactorTable::default();
        let mut sheet = QuantitySheet::new();
        sheet.set(Category::Power, "手機充電", 1.0); // 0.0078
        sheet.set(Category::Power, "電燈", 1.0); // 0.0052
        sheet.set(Category::Gas, "煮飯_瓦斯", 0.333);
        sheet.set(Category::Transport, "汽車", 3.333);

        let footprint = calculate_footprint(&table, &sheet);
        let unrounded = (0.015 + 0.01) * 0.52 + 0.333 * 0.2 * 2.0 + 3.333 * 0.21;
        // At most a few hundredths per category
        assert!((footprint.total - unrounded).abs() <= 0.05);
    }

    #[test]
    fn test_beef_scenario() {
        let table = EmissionFactorTable::default();
        let mut sheet = QuantitySheet::new();
        sheet.set(Category::Food, "牛肉", 1.0);

        let footprint = calculate_footprint(&table, &sheet);
        assert_eq!(footprint.food.value, 60.0);
        assert_eq!(footprint.clothing.value, 0.0);
        assert_eq!(footprint.home, 0.0);
        assert_eq!(footprint.transport.value, 0.0);
        assert_eq!(footprint.total, 60.0);
        assert_eq!(footprint.score().value(), 1);
    }

    #[test]
    fn test_air_conditioner_scenario() {
        let table = EmissionFactorTable::default();
        let mut sheet = QuantitySheet::new();
        sheet.set(Category::Power, "冷氣", 1.0);

        let footprint = calculate_footprint(&table, &sheet);
        assert_eq!(footprint.power.value, 0.62);
        assert_eq!(footprint.home, 0.62);
        assert_eq!(footprint.total, 0.62);
    }

    #[test]
    fn test_all_zero_scenario() {
        let table = EmissionFactorTable::default();
        let footprint = calculate_footprint(&table, &QuantitySheet::new());
        assert_eq!(footprint.total, 0.0);
        assert_eq!(footprint.score().value(), 5);
        for category in Category::ALL {
            assert!(footprint.subtotal(category).contributing.is_empty());
        }
    }

    #[test]
    fn test_home_combines_power_and_gas() {
        let table = EmissionFactorTable::default();
        let mut sheet = QuantitySheet::new();
        sheet.set(Category::Power, "暖氣_電", 2.0); // 2 * 2.0 * 0.52 = 2.08
        sheet.set(Category::Gas, "洗澡_瓦斯", 1.0); // 0.2 * 2.0 = 0.4

        let footprint = calculate_footprint(&table, &sheet);
        assert_eq!(footprint.power.value, 2.08);
        assert_eq!(footprint.gas.value, 0.4);
        assert_eq!(footprint.home, 2.48);
        assert_eq!(footprint.total, 2.48);
    }

    #[test]
    fn test_mixed_day() {
        let table = EmissionFactorTable::default();
        let mut sheet = QuantitySheet::new();
        sheet.set(Category::Food, "雞肉", 0.2); // 1.2
        sheet.set(Category::Food, "蔬菜", 0.5); // 1.1
        sheet.set(Category::Clothing, "襪子", 1.0); // 1.0
        sheet.set(Category::Transport, "捷運", 10.0); // 0.5

        let footprint = calculate_footprint(&table, &sheet);
        assert_eq!(footprint.food.value, 2.3);
        assert_eq!(footprint.clothing.value, 1.0);
        assert_eq!(footprint.transport.value, 0.5);
        assert_eq!(footprint.total, 3.8);
        assert_eq!(footprint.score().value(), 5);
    }
}
