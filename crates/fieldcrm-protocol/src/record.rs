//! Persisted call record and generic table rows.

use crate::id::{CallDate, CallId};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One analyzed visit, as written to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: CallId,
    pub hcp_id: String,
    pub rep_id: String,
    pub call_date: CallDate,
    /// Dictated note, kept verbatim for audit.
    pub raw_note: String,
    pub summary: String,
    pub sentiment: String,
    pub topics: String,
    pub next_action: String,
    pub risk_flag: String,
    pub coaching_tip: String,
}

impl CallRecord {
    /// Column order of the record table.
    pub const COLUMNS: [&'static str; 11] = [
        "call_id",
        "hcp_id",
        "rep_id",
        "call_date",
        "raw_note",
        "summary",
        "sentiment",
        "topics",
        "next_action",
        "risk_flag",
        "coaching_tip",
    ];

    /// Default for `topics` when the model leaves it out.
    pub const DEFAULT_TOPICS: &'static str = "General";

    /// Render the record as a row in `COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.call_id.to_string(),
            self.hcp_id.clone(),
            self.rep_id.clone(),
            self.call_date.to_string(),
            self.raw_note.clone(),
            self.summary.clone(),
            self.sentiment.clone(),
            self.topics.clone(),
            self.next_action.clone(),
            self.risk_flag.clone(),
            self.coaching_tip.clone(),
        ]
    }
}

/// A table row keyed by column name, preserving column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<(String, String)>,
}

impl SheetRow {
    /// Zip a header with row values. Missing trailing cells read as empty.
    pub fn from_header(header: &[String], values: &[String]) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), values.get(idx).cloned().unwrap_or_default()))
            .collect();
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for SheetRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CallRecord {
        CallRecord {
            call_id: CallId::from_sequence(3),
            hcp_id: "HCP_00123".to_string(),
            rep_id: "REP_048".to_string(),
            call_date: CallDate::parse("01/02/2024").expect("date"),
            raw_note: "note".to_string(),
            summary: "summary".to_string(),
            sentiment: "High".to_string(),
            topics: "Efficacy".to_string(),
            next_action: "follow up".to_string(),
            risk_flag: "FALSE".to_string(),
            coaching_tip: "tip".to_string(),
        }
    }

    #[test]
    fn row_follows_column_order() {
        let row = sample().to_row();
        assert_eq!(row.len(), CallRecord::COLUMNS.len());
        assert_eq!(row[0], "CALL_000003");
        assert_eq!(row[3], "01/02/2024");
        assert_eq!(row[4], "note");
        assert_eq!(row[10], "tip");
    }

    #[test]
    fn sheet_row_serializes_in_column_order() {
        let header = vec!["b".to_string(), "a".to_string()];
        let row = SheetRow::from_header(&header, &["1".to_string()]);
        assert_eq!(row.get("a"), Some(""));
        let json = serde_json::to_string(&row).expect("json");
        assert_eq!(json, r#"{"b":"1","a":""}"#);
    }
}
