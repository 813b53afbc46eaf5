use crate::factors::FactorSet;
use crate::input::Quantities;

/// An item that had a positive quantity in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub item: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Weighted sum, rounded to 2 decimals
    pub subtotal: f64,
    /// Items with quantity > 0, in factor declaration order
    pub contributing: Vec<Contribution>,
}

/// Round half away from zero to 2 decimals.
/// Values too large to scale are returned as they are.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Weighted subtotal for one category.
///
/// Each item's `quantity * coefficient` is multiplied by every entry of
/// `multipliers` in order before being accumulated. Items missing from
/// `quantities` count as 0. Negative quantities are not filtered here and
/// reduce the subtotal.
pub fn aggregate(factors: &FactorSet, quantities: &Quantities, multipliers: &[f64]) -> Aggregate {
    let mut subtotal = 0.0;
    let mut contributing = Vec::new();

    for factor in factors.iter() {
        let quantity = quantities.get(&factor.name);
        if quantity > 0.0 {
            contributing.push(Contribution {
                item: factor.name.clone(),
                quantity,
            });
        }

        let value = multipliers
            .iter()
            .fold(quantity * factor.coefficient, |acc, m| acc * m);
        subtotal += value;
    }

    Aggregate {
        subtotal: round2(subtotal),
        contributing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{Category, EmissionFactorTable, EF_GRID};

    fn quantities(pairs: &[(&str, f64)]) -> Quantities {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.624), 0.62);
        assert_eq!(round2(0.626), 0.63);
        assert_eq!(round2(60.0), 60.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_empty_table() {
        let result = aggregate(&FactorSet::default(), &quantities(&[("牛肉", 3.0)]), &[]);
        assert_eq!(result.subtotal, 0.0);
        assert!(result.contributing.is_empty());
    }

    #[test]
    fn test_single_item() {
        let table = EmissionFactorTable::default();
        let result = aggregate(
            table.category(Category::Food),
            &quantities(&[("牛肉", 1.0)]),
            &[],
        );
        assert_eq!(result.subtotal, 60.0);
        assert_eq!(
            result.contributing,
            vec![Contribution {
                item: "牛肉".to_string(),
                quantity: 1.0
            }]
        );
    }

    #[test]
    fn test_grid_multiplier() {
        let table = EmissionFactorTable::default();
        let result = aggregate(
            table.category(Category::Power),
            &quantities(&[("冷氣", 1.0)]),
            &[EF_GRID],
        );
        assert_eq!(result.subtotal, 0.62);
    }

    #[test]
    fn test_contributing_follows_table_order() {
        let factors = FactorSet::from_pairs(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]);
        let result = aggregate(
            &factors,
            &quantities(&[("d", 1.0), ("a", 2.0), ("c", 0.0)]),
            &[],
        );
        let items: Vec<&str> = result.contributing.iter().map(|c| c.item.as_str()).collect();
        assert_eq!(items, vec!["a", "d"]);
        assert_eq!(result.subtotal, 6.0);
    }

    #[test]
    fn test_items_outside_table_ignored() {
        let factors = FactorSet::from_pairs(&[("a", 1.0)]);
        let result = aggregate(&factors, &quantities(&[("zzz", 100.0)]), &[]);
        assert_eq!(result.subtotal, 0.0);
        assert!(result.contributing.is_empty());
    }

    #[test]
    fn test_multipliers_chain() {
        let factors = FactorSet::from_pairs(&[("a", 2.0)]);
        let result = aggregate(&factors, &quantities(&[("a", 3.0)]), &[0.5, 10.0]);
        assert_eq!(result.subtotal, 30.0);
    }

    #[test]
    fn test_multiplier_is_linear() {
        let table = EmissionFactorTable::default();
        let input = quantities(&[("冷氣", 3.0), ("電腦", 5.0), ("洗衣", 1.0)]);
        let plain = aggregate(table.category(Category::Power), &input, &[]);
        let converted = aggregate(table.category(Category::Power), &input, &[EF_GRID]);
        assert!((converted.subtotal - plain.subtotal * EF_GRID).abs() < 0.01);
    }

    #[test]
    fn test_negative_quantity_reduces_subtotal() {
        let factors = FactorSet::from_pairs(&[("a", 1.0), ("b", 1.0)]);
        let result = aggregate(&factors, &quantities(&[("a", 5.0), ("b", -2.0)]), &[]);
        assert_eq!(result.subtotal, 3.0);
        assert_eq!(result.contributing.len(), 1);
    }

    #[test]
    fn test_non_negative_inputs_give_non_negative_subtotal() {
        let table = EmissionFactorTable::default();
        for category in Category::ALL {
            let input: Quantities = table
                .category(category)
                .iter()
                .enumerate()
                .map(|(i, f)| (f.name.clone(), (i % 3) as f64 * 0.7))
                .collect();
            let result = aggregate(table.category(category), &input, &table.multipliers(category));
            assert!(result.subtotal >= 0.0);
            let expected = table
                .category(category)
                .iter()
                .filter(|f| input.get(&f.name) > 0.0)
                .count();
            assert_eq!(result.contributing.len(), expected);
        }
    }

    #[test]
    fn test_round2_keeps_huge_values_finite() {
        assert_eq!(round2(6e307), 6e307);
        assert_eq!(round2(-6e307), -6e307);
        assert!(round2(f64::INFINITY).is_infinite());
    }
}
