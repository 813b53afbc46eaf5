use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::StoreError;
use crate::engine::{classify, EfficiencyScore, Footprint};

/// One stored day. Column names match the `carbon_records` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Rows written before users were tracked have no user; they read back as ""
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    pub food: f64,
    pub clothes: f64,
    pub home: f64,
    pub transport: f64,
    pub total: f64,
}

impl DailyRecord {
    pub fn from_footprint(footprint: &Footprint, date: NaiveDate, user_id: &str) -> Self {
        Self {
            date,
            user_id: user_id.to_string(),
            food: footprint.food.value,
            clothes: footprint.clothing.value,
            home: footprint.home,
            transport: footprint.transport.value,
            total: footprint.total,
        }
    }

    /// Reject a record that would not survive a JSON round trip.
    /// serde_json writes NaN and infinities as `null`, which cannot be read back.
    pub fn check_finite(&self) -> Result<(), StoreError> {
        let figures = [
            ("food", self.food),
            ("clothes", self.clothes),
            ("home", self.home),
            ("transport", self.transport),
            ("total", self.total),
        ];
        match figures.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(StoreError::InvalidRecord(format!(
                "{} is {} (a quantity is too large)",
                name, value
            ))),
            None => Ok(()),
        }
    }

    /// Recomputed on every read; scores are never stored
    pub fn score(&self) -> EfficiencyScore {
        classify(self.total)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculate_footprint;
    use crate::factors::{Category, EmissionFactorTable};
    use crate::input::QuantitySheet;

    #[test]
    fn test_from_footprint() {
        let table = EmissionFactorTable::default();
        let mut sheet = QuantitySheet::new();
        sheet.set(Category::Food, "牛肉", 1.0);
        sheet.set(Category::Power, "冷氣", 1.0);
        let footprint = calculate_footprint(&table, &sheet);

        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let record = DailyRecord::from_footprint(&footprint, date, "alice");
        assert_eq!(record.food, 60.0);
        assert_eq!(record.clothes, 0.0);
        assert_eq!(record.home, 0.62);
        assert_eq!(record.transport, 0.0);
        assert_eq!(record.total, 60.62);
        assert_eq!(record.score().value(), 1);
    }

    #[test]
    fn test_json_columns() {
        let record = DailyRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            user_id: "bob".to_string(),
            food: 1.5,
            clothes: 0.0,
            home: 2.0,
            transport: 0.5,
            total: 4.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2026-01-02");
        assert_eq!(json["user_id"], "bob");
        assert_eq!(json["clothes"], 0.0);

        let parsed: DailyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_legacy_row_without_user() {
        let rows = r#"[
            {"id":1,"created_at":"2025-03-01T08:00:00+00:00","date":"2025-03-01","user_id":null,"food":1.5,"clothes":0.0,"home":2.0,"transport":0.5,"total":4.0},
            {"id":2,"date":"2025-03-02","food":0.0,"clothes":0.0,"home":0.0,"transport":0.0,"total":0.0}
        ]"#;
        let records: Vec<DailyRecord> = serde_json::from_str(rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, "");
        assert_eq!(records[0].total, 4.0);
        assert_eq!(records[1].user_id, "");
    }

    #[test]
    fn test_check_finite() {
        let mut record = DailyRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            user_id: "bob".to_string(),
            food: 6e307,
            clothes: 0.0,
            home: 0.0,
            transport: 0.0,
            total: 6e307,
        };
        assert!(record.check_finite().is_ok());

        record.total = f64::INFINITY;
        match record.check_finite() {
            Err(StoreError::InvalidRecord(msg)) => assert!(msg.starts_with("total is inf")),
            other => panic!("unexpected {:?}", other),
        }

        record.total = 1.0;
        record.home = f64::NAN;
        assert!(record.check_finite().is_err());
    }
}
