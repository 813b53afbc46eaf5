use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::types::DailyRecord;

pub const CSV_HEADER: &str = "date,user_id,food,clothes,home,transport,total";

/// Quote a field if it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render records as CSV with a header row
pub fn to_csv(records: &[DailyRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            r.date.format("%Y-%m-%d"),
            csv_field(&r.user_id),
            r.food,
            r.clothes,
            r.home,
            r.transport,
            r.total
        ));
    }
    out
}

/// Write a CSV backup atomically; the target is either fully written or untouched
pub fn export_csv(path: &Path, records: &[DailyRecord]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(to_csv(records).as_bytes())
        .context("Failed to write CSV backup")?;

    file.commit().context("Failed to save CSV backup")?;

    Ok(())
}
