use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use super::quantity::RawQuantity;
use super::sheet::{CoercionNote, QuantitySheet};
use crate::factors::{Category, EmissionFactorTable};

/// Prompt user with a message and return their trimmed input.
pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
pub fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
pub fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Walk every item of every category and ask for a quantity.
///
/// Enter on an empty line means 0. Anything that isn't a usable number is
/// also taken as 0 and reported back in the returned notes.
pub fn prompt_sheet(table: &EmissionFactorTable) -> Result<(QuantitySheet, Vec<CoercionNote>)> {
    let mut sheet = QuantitySheet::new();
    let mut notes = Vec::new();

    for category in Category::ALL {
        let factors = table.category(category);
        if factors.is_empty() {
            continue;
        }

        println!();
        println!("{} ({})", category.label(), category.unit());
        for factor in factors.iter() {
            let input = prompt(&format!("  {}: ", factor.name))?;
            if input.is_empty() {
                continue;
            }
            let raw = RawQuantity::Text(input);
            if let Some(note) = sheet.set_raw(category, &factor.name, Some(&raw)) {
                println!("    not a usable quantity ({}), counted as 0", note.reason);
                notes.push(note);
            }
        }
    }

    Ok((sheet, notes))
}
