use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::quantity::{coerce_quantity, CoercionReason, Quantities, RawQuantity};
use crate::factors::{Category, EmissionFactorTable};

/// One day's quantities as written in a YAML sheet.
///
/// Example:
/// ```yaml
/// date: 2026-10-18
/// user: alice
/// food:
///   牛肉: 0.2
///   蔬菜: 0.5
/// transport:
///   捷運: 12
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSheet {
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub food: BTreeMap<String, Option<RawQuantity>>,

    #[serde(default, alias = "clothes")]
    pub clothing: BTreeMap<String, Option<RawQuantity>>,

    #[serde(default)]
    pub power: BTreeMap<String, Option<RawQuantity>>,

    #[serde(default)]
    pub gas: BTreeMap<String, Option<RawQuantity>>,

    #[serde(default, alias = "traffic")]
    pub transport: BTreeMap<String, Option<RawQuantity>>,
}

impl RawSheet {
    fn raw(&self, category: Category) -> &BTreeMap<String, Option<RawQuantity>> {
        match category {
            Category::Food => &self.food,
            Category::Clothing => &self.clothing,
            Category::Power => &self.power,
            Category::Gas => &self.gas,
            Category::Transport => &self.transport,
        }
    }
}

/// A value that was replaced by 0.0 while reading input
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionNote {
    pub category: Category,
    pub item: String,
    pub reason: CoercionReason,
}

/// Validated per-category quantities for one submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantitySheet {
    food: Quantities,
    clothing: Quantities,
    power: Quantities,
    gas: Quantities,
    transport: Quantities,
}

impl QuantitySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &Quantities {
        match category {
            Category::Food => &self.food,
            Category::Clothing => &self.clothing,
            Category::Power => &self.power,
            Category::Gas => &self.gas,
            Category::Transport => &self.transport,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Quantities {
        match category {
            Category::Food => &mut self.food,
            Category::Clothing => &mut self.clothing,
            Category::Power => &mut self.power,
            Category::Gas => &mut self.gas,
            Category::Transport => &mut self.transport,
        }
    }

    pub fn set(&mut self, category: Category, item: impl Into<String>, quantity: f64) {
        self.get_mut(category).set(item, quantity);
    }

    /// Coerce a raw value and store it. Returns the note if the value was replaced.
    pub fn set_raw(
        &mut self,
        category: Category,
        item: &str,
        raw: Option<&RawQuantity>,
    ) -> Option<CoercionNote> {
        let (value, reason) = coerce_quantity(raw);
        self.set(category, item, value);
        reason.map(|reason| CoercionNote {
            category,
            item: item.to_string(),
            reason,
        })
    }

    /// Build a sheet from parsed YAML, collecting a note for every coerced value
    pub fn from_raw(raw: &RawSheet) -> (Self, Vec<CoercionNote>) {
        let mut sheet = Self::new();
        let mut notes = Vec::new();
        for category in Category::ALL {
            for (item, value) in raw.raw(category) {
                if let Some(note) = sheet.set_raw(category, item.trim(), value.as_ref()) {
                    notes.push(note);
                }
            }
        }
        (sheet, notes)
    }

    /// Items with a quantity that have no emission factor and will be ignored
    pub fn unknown_items(&self, table: &EmissionFactorTable) -> Vec<(Category, String)> {
        let mut unknown = Vec::new();
        for category in Category::ALL {
            let factors = table.category(category);
            let mut names: Vec<&str> = self
                .get(category)
                .items()
                .filter(|(name, _)| !factors.contains(name))
                .map(|(name, _)| name)
                .collect();
            names.sort_unstable();
            unknown.extend(names.into_iter().map(|n| (category, n.to_string())));
        }
        unknown
    }
}

/// Load a quantity sheet from a YAML file
pub fn load_sheet(path: &Path) -> Result<(RawSheet, QuantitySheet, Vec<CoercionNote>)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read quantity sheet at {}", path.display()))?;

    let raw: RawSheet = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse quantity sheet: invalid YAML in {}", path.display()))?;

    let (sheet, notes) = QuantitySheet::from_raw(&raw);
    Ok((raw, sheet, notes))
}

/// Parse a `category.item=quantity` assignment (e.g. `food.牛肉=0.3`).
/// The quantity itself is left raw; coercion happens when it is applied.
pub fn parse_assignment(s: &str) -> Result<(Category, String, RawQuantity)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("Invalid assignment '{}': expected category.item=quantity", s);
    };
    let Some((category, item)) = key.split_once('.') else {
        bail!("Invalid assignment '{}': expected category.item=quantity", s);
    };

    let category: Category = category.parse()?;
    let item = item.trim();
    if item.is_empty() {
        bail!("Invalid assignment '{}': item name is empty", s);
    }

    Ok((category, item.to_string(), RawQuantity::Text(value.to_string())))
}
