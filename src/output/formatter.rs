use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::engine::{EfficiencyScore, Footprint, ImpactProjection};
use crate::factors::{Category, EmissionFactorTable};
use crate::records::{DailyRecord, HistorySummary};

pub const NO_RECORDS: &str = "No records yet.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a large figure in compact notation (1.5k, 2.3M, 4.1B).
/// Very small non-zero values use scientific notation.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let formatted = if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else if abs > 0.0 && abs < 0.01 {
        format!("{:.2e}", value)
    } else {
        format!("{:.2}", value)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted
        .replace(".0B", "B")
        .replace(".0M", "M")
        .replace(".0k", "k")
}

fn format_score_colored(score: EfficiencyScore, use_colors: bool) -> String {
    let text = format!("{} {} ({})", score.stars(), score, score.label());
    if !use_colors {
        return text;
    }
    match score.value() {
        4..=5 => text.green().to_string(),
        3 => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}

/// Category subtotals, total and score for one day
pub fn format_footprint(footprint: &Footprint, use_colors: bool) -> String {
    let breakdown = format!(
        "Food: {:.2} | Clothing: {:.2} | Home: {:.2} | Transport: {:.2}",
        footprint.food.value, footprint.clothing.value, footprint.home, footprint.transport.value
    );
    let total = format!("Total: {:.2} kgCO2e", footprint.total);
    let score = format!("Score: {}", format_score_colored(footprint.score(), use_colors));

    if use_colors {
        format!("{}\n{}\n{}", breakdown, total.bold(), score)
    } else {
        format!("{}\n{}\n{}", breakdown, total, score)
    }
}

/// Per-item detail (verbose / --detail): quantity, coefficient and emissions
pub fn format_contributions(
    footprint: &Footprint,
    table: &EmissionFactorTable,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();
    for category in Category::ALL {
        let subtotal = footprint.subtotal(category);
        if subtotal.contributing.is_empty() {
            continue;
        }

        let header = format!("{}: {:.2} kgCO2e", category.label(), subtotal.value);
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });

        let factors = table.category(category);
        let multiplier: f64 = table.multipliers(category).iter().product();
        for c in &subtotal.contributing {
            let coefficient = factors.get(&c.item).unwrap_or(0.0);
            let kg = c.quantity * coefficient * multiplier;
            let factor_text = if multiplier != 1.0 {
                format!("{} x {}", coefficient, multiplier)
            } else {
                coefficient.to_string()
            };
            lines.push(format!(
                "  {} {} {} x {} = {:.3}",
                c.item,
                c.quantity,
                category.unit(),
                factor_text,
                kg
            ));
        }
    }

    if lines.is_empty() {
        "Nothing entered.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Collective-impact metrics for a day's total
pub fn format_impact(projection: &ImpactProjection, population_scale: f64, use_colors: bool) -> String {
    let heading = format!(
        "If {} people lived like this for a day ({} kgCO2e):",
        format_compact(population_scale),
        format_compact(projection.scaled_kg)
    );
    let mut lines = vec![if use_colors {
        heading.bold().to_string()
    } else {
        heading
    }];

    let metrics = projection.metrics();
    let label_width = metrics.iter().map(|(l, _, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value, unit) in metrics {
        lines.push(format!(
            "  {:<width$}  {} {}",
            label,
            format_compact(value),
            unit,
            width = label_width
        ));
    }
    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Records as a table, one row per day.
/// With `show_user`, a user column is added and truncated to fit the terminal.
/// Column widths count chars, not terminal cells, so wide (CJK) user names
/// can push the row past the column edge.
pub fn format_records_table(records: &[DailyRecord], show_user: bool, use_colors: bool) -> String {
    if records.is_empty() {
        return NO_RECORDS.to_string();
    }

    // Date: 10, five figures at 9 each plus separators, score: 5 stars
    let fixed_width = 10 + 5 * 11 + 2 + 5;
    let user_width = if show_user {
        let longest = records
            .iter()
            .map(|r| r.user_id.chars().count())
            .max()
            .unwrap_or(4)
            .max(4);
        match get_terminal_width() {
            Some(width) if width > fixed_width + 8 => longest.min(width - fixed_width - 2),
            Some(_) => longest.min(8),
            None => longest,
        }
    } else {
        0
    };

    let mut header = format!("{:<10}", "Date");
    if show_user {
        header.push_str(&format!("  {:<width$}", "User", width = user_width));
    }
    header.push_str(&format!(
        "  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  Score",
        "Food", "Clothes", "Home", "Transport", "Total"
    ));

    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for r in records {
        let mut line = r.date.format("%Y-%m-%d").to_string();
        if show_user {
            line.push_str(&format!(
                "  {:<width$}",
                truncate(&r.user_id, user_width),
                width = user_width
            ));
        }
        let total = format!("{:>9.2}", r.total);
        line.push_str(&format!(
            "  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}  {}  {}",
            r.food,
            r.clothes,
            r.home,
            r.transport,
            if use_colors {
                total.bold().to_string()
            } else {
                total
            },
            r.score().stars()
        ));
        lines.push(line);
    }

    lines.join("\n")
}

/// Tabs and line breaks would split the row, so they become spaces
fn tsv_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

/// Records as tab-separated values for scripting
/// Columns: date, user_id, food, clothes, home, transport, total, score (no headers, no colors)
pub fn format_tsv(records: &[DailyRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}",
                r.date.format("%Y-%m-%d"),
                tsv_field(&r.user_id),
                r.food,
                r.clothes,
                r.home,
                r.transport,
                r.total,
                r.score().value()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_summary(summary: &HistorySummary, use_colors: bool) -> String {
    format!(
        "{} days, average {:.2} kgCO2e/day\nAverage score: {}\nLightest: {} ({:.2})  Heaviest: {} ({:.2})",
        summary.days,
        summary.average_total,
        format_score_colored(summary.average_score, use_colors),
        summary.lightest.0.format("%Y-%m-%d"),
        summary.lightest.1,
        summary.heaviest.0.format("%Y-%m-%d"),
        summary.heaviest.1
    )
}

/// The effective emission factor table
pub fn format_factor_table(table: &EmissionFactorTable, use_colors: bool) -> String {
    let mut lines = Vec::new();
    for category in Category::ALL {
        let header = match category {
            Category::Power => format!(
                "{} (kgCO2e per {}, x grid factor {})",
                category.label(),
                category.unit(),
                table.grid_factor()
            ),
            Category::Gas => format!(
                "{} (kgCO2e per {}, x gas factor {})",
                category.label(),
                category.unit(),
                table.gas_factor()
            ),
            _ => format!("{} (kgCO2e per {})", category.label(), category.unit()),
        };
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });

        for factor in table.category(category).iter() {
            lines.push(format!("  {}  {}", factor.name, factor.coefficient));
        }
    }
    lines.join("\n")
}
