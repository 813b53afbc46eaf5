use chrono::NaiveDate;
use std::time::{Duration, Instant};

use crate::engine::{calculate_footprint, Footprint};
use crate::factors::EmissionFactorTable;
use crate::input::QuantitySheet;
use crate::records::{DailyRecord, RecordStore, StoreError, SubmitGuard, SubmitRejected};

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(Duration),
    /// Saving was turned off for this submission
    Skipped,
    Failed(StoreError),
}

/// Result of one submit. The footprint is always present, even when saving failed.
#[derive(Debug)]
pub struct Submission {
    pub footprint: Footprint,
    pub record: DailyRecord,
    pub outcome: SaveOutcome,
}

/// Calculate one day's footprint and append it to the store.
///
/// Only one submission may run per guard; a second call while the first is
/// still saving is rejected before anything is calculated. Store failures do
/// not discard the calculation; they come back as `SaveOutcome::Failed`.
/// There is no retry: a timed-out save is reported, not repeated.
pub async fn submit(
    store: Option<&RecordStore>,
    guard: &SubmitGuard,
    table: &EmissionFactorTable,
    sheet: &QuantitySheet,
    date: NaiveDate,
    user_id: &str,
    verbose: bool,
) -> Result<Submission, SubmitRejected> {
    let _ticket = guard.try_begin()?;

    let footprint = calculate_footprint(table, sheet);
    let record = DailyRecord::from_footprint(&footprint, date, user_id);

    let outcome = match store {
        None => SaveOutcome::Skipped,
        Some(store) => {
            if verbose {
                eprintln!("Saving record to {}", store.describe());
            }
            let start = Instant::now();
            match store.append(&record).await {
                Ok(()) => {
                    let elapsed = start.elapsed();
                    if verbose {
                        eprintln!("  Saved in {:?}", elapsed);
                    }
                    SaveOutcome::Saved(elapsed)
                }
                Err(e) => {
                    if verbose {
                        eprintln!("  Save failed after {:?}", start.elapsed());
                    }
                    SaveOutcome::Failed(e)
                }
            }
        }
    };

    Ok(Submission {
        footprint,
        record,
        outcome,
    })
}
