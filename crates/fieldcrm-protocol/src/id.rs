//! Call identifiers and call dates.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Prefix shared by every allocated call identifier.
pub const CALL_ID_PREFIX: &str = "CALL_";
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Sequential call identifier of the form `CALL_NNNNNN`.
///
/// `CALL_000000` is reserved for "store unreachable" and is never a real
/// allocation; real sequences start at `CALL_000001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Sentinel returned when the store cannot be reached.
    pub fn offline() -> Self {
        Self::from_sequence(0)
    }

    /// First identifier of an empty store.
    pub fn first() -> Self {
        Self::from_sequence(1)
    }

    /// Render a sequence number, zero-padded to six digits.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{CALL_ID_PREFIX}{sequence:06}"))
    }

    /// Parse a stored identifier, returning `None` unless it is `CALL_` followed
    /// by a decimal counter.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let suffix = raw.strip_prefix(CALL_ID_PREFIX)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        suffix.parse::<u64>().ok()?;
        Some(Self(raw.to_string()))
    }

    /// Numeric counter of the identifier, if it has one.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(CALL_ID_PREFIX)?.parse().ok()
    }

    /// Identifier following this one, or `None` if this one carries no counter.
    pub fn next(&self) -> Option<Self> {
        let sequence = self.sequence()?.checked_add(1)?;
        Some(Self::from_sequence(sequence))
    }

    pub fn is_offline(&self) -> bool {
        self.sequence() == Some(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calendar date of a visit, stored as `DD/MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallDate(NaiveDate);

impl CallDate {
    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parse `DD/MM/YYYY`, falling back to ISO `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for CallDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_DATE_FORMAT))
    }
}

impl From<NaiveDate> for CallDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CallDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CallDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CallDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid call date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sequence_is_zero_padded() {
        assert_eq!(CallId::from_sequence(7).as_str(), "CALL_000007");
        assert_eq!(CallId::offline().as_str(), "CALL_000000");
        assert_eq!(CallId::first().as_str(), "CALL_000001");
    }

    #[test]
    fn next_increments_parsed_counter() {
        let id = CallId::parse("CALL_000041").expect("parse");
        assert_eq!(id.next(), Some(CallId::from_sequence(42)));
        assert_eq!(CallId::from_sequence(999_999).next().expect("next").as_str(), "CALL_1000000");
    }

    #[test]
    fn parse_rejects_foreign_shapes() {
        assert_eq!(CallId::parse("call_id"), None);
        assert_eq!(CallId::parse("CALL_"), None);
        assert_eq!(CallId::parse("CALL_12a"), None);
        assert_eq!(CallId::parse("VISIT_000001"), None);
        let foreign: CallId = serde_json::from_str("\"CALL_x\"").expect("json");
        assert_eq!(foreign.next(), None);
    }

    #[test]
    fn offline_sentinel_is_detected() {
        assert!(CallId::offline().is_offline());
        assert!(!CallId::first().is_offline());
    }

    #[test]
    fn call_date_accepts_display_and_iso_forms() {
        let display = CallDate::parse("01/02/2024").expect("display");
        let iso = CallDate::parse("2024-02-01").expect("iso");
        assert_eq!(display, iso);
        assert_eq!(display.to_string(), "01/02/2024");
        assert_eq!(CallDate::parse("2024/31/31"), None);
    }

    #[test]
    fn call_date_serializes_as_display_string() {
        let date = CallDate::parse("2024-12-09").expect("date");
        let json = serde_json::to_string(&date).expect("json");
        assert_eq!(json, "\"09/12/2024\"");
        let back: CallDate = serde_json::from_str(&json).expect("back");
        assert_eq!(back, date);
    }
}
