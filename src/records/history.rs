use chrono::NaiveDate;

use super::types::DailyRecord;
use crate::engine::{classify, round2, EfficiencyScore};

/// Aggregate view over a user's stored days
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub days: usize,
    pub average_total: f64,
    /// Score of the average, not an average of scores
    pub average_score: EfficiencyScore,
    pub lightest: (NaiveDate, f64),
    pub heaviest: (NaiveDate, f64),
}

impl HistorySummary {
    /// `None` for an empty history
    pub fn from_records(records: &[DailyRecord]) -> Option<Self> {
        let first = records.first()?;

        let mut sum = 0.0;
        let mut lightest = (first.date, first.total);
        let mut heaviest = (first.date, first.total);
        for r in records {
            sum += r.total;
            if r.total < lightest.1 {
                lightest = (r.date, r.total);
            }
            if r.total > heaviest.1 {
                heaviest = (r.date, r.total);
            }
        }

        let average_total = round2(sum / records.len() as f64);
        Some(Self {
            days: records.len(),
            average_total,
            average_score: classify(average_total),
            lightest,
            heaviest,
        })
    }
}
