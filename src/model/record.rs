use crate::model::Amount;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The kinds of rows the remote endpoint stores, each in its own sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Expense,
    Investment,
    Config,
}

serde_plain::derive_display_from_serialize!(RecordKind);
serde_plain::derive_fromstr_from_deserialize!(RecordKind);

/// One contribution towards a goal. `category` holds the goal label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total: Amount,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub place: String,
}

impl InvestmentRecord {
    /// Parses rows returned by the endpoint. The sheet is edited by hand, so a row whose total is
    /// not a number counts as zero and a row that is not an object at all is skipped.
    pub fn parse_rows(rows: Vec<serde_json::Value>) -> Vec<InvestmentRecord> {
        rows.into_iter()
            .enumerate()
            .filter_map(|(ix, row)| match serde_json::from_value(row.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    let serde_json::Value::Object(mut map) = row else {
                        warn!("Skipping investment row {ix}, it is not an object: {e}");
                        return None;
                    };
                    warn!("Investment row {ix} has an unreadable total, counting it as zero: {e}");
                    map.remove("total");
                    serde_json::from_value(serde_json::Value::Object(map)).ok()
                }
            })
            .collect()
    }
}

/// One write to the configuration log. `value` is a serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(default)]
    pub date: String,
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rows() {
        let rows = vec![
            json!({"date": "01/02/2025", "total": 500, "category": "ETFs", "place": "Nu"}),
            json!({"date": "02/02/2025", "total": "$1,000.00", "category": "Anillo", "place": "Cetes"}),
            json!({"date": "03/02/2025", "total": "mucho", "category": "Anillo", "place": "Cetes"}),
            json!("not a row"),
        ];
        let records = InvestmentRecord::parse_rows(rows);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].total, Amount::from(500));
        assert_eq!(records[1].total, Amount::from(1000));
        assert!(records[2].total.is_zero());
        assert_eq!(records[2].category, "Anillo");
    }

    #[test]
    fn test_record_kind_strings() {
        assert_eq!(RecordKind::Investment.to_string(), "investment");
        assert_eq!("config".parse::<RecordKind>().unwrap(), RecordKind::Config);
    }
}
