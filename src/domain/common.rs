//! Shared value types for dated bookkeeping records.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ValidationError;

/// Identifies records that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// A dated money movement that the aggregation engine can bucket and sum.
pub trait LedgerEntry: Identifiable {
    fn date(&self) -> &RecordDate;
    fn amount(&self) -> f64;
    fn description(&self) -> &str;
    fn category_label(&self) -> &'static str;
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Timestamp as stored in the persisted document: `YYYY-MM-DD` or
/// `YYYY-MM-DDTHH:MM[:SS]`. Kept verbatim so older payloads round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordDate(String);

impl RecordDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self(value.format("%Y-%m-%dT%H:%M").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `YYYY-MM` grouping prefix.
    pub fn month_key(&self) -> &str {
        prefix(&self.0, 7)
    }

    /// `YYYY-MM-DD` prefix used for daily bucketing.
    pub fn day_key(&self) -> &str {
        prefix(&self.0, 10)
    }

    /// Parses the timestamp; date-only values resolve to midnight.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let raw = self.0.as_str();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.naive_utc());
        }
        for format in DATETIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(parsed);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_datetime().map(|value| value.date())
    }

    /// Rejects empty or unparseable timestamps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        if self.to_datetime().is_none() {
            return Err(ValidationError::InvalidDate(self.0.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<&str> for RecordDate {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

fn prefix(value: &str, len: usize) -> &str {
    value.get(..len).unwrap_or(value)
}

const MONTH_NAMES_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const MAX_YEAR: i32 = 9999;

/// Calendar month used as the aggregation key, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(0..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonthKey(format!(
                "{year:04}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(0, MAX_YEAR),
            month: date.month(),
        }
    }

    /// Month of the local clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day 0 of the following month, i.e. the last day of this one.
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    /// `YYYY-MM-DD` key for a day of this month.
    pub fn day_key(&self, day: u32) -> String {
        format!("{self}-{day:02}")
    }

    /// Moves by `offset` months; negative values go back in time.
    pub fn shift(&self, offset: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + offset;
        let index = index.clamp(0, MAX_YEAR * 12 + 11);
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// Long pt-BR label, e.g. `março de 2024`.
    pub fn label_pt(&self) -> String {
        let name = MONTH_NAMES_PT[(self.month - 1) as usize];
        format!("{name} de {}", self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonthKey(value.to_string());
        let trimmed = value.trim();
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Accepts a JSON number or `null` (how `NaN` ends up after a browser
/// serialized it) and yields `0.0` for anything that is not a finite number.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Quantities arrive as JSON numbers, occasionally fractional or `null`.
pub(crate) fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.trunc().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_date_prefixes() {
        let date = RecordDate::new("2024-03-05T14:30");
        assert_eq!(date.month_key(), "2024-03");
        assert_eq!(date.day_key(), "2024-03-05");
        assert_eq!(RecordDate::new("2024").month_key(), "2024");
    }

    #[test]
    fn record_date_parses_date_only_as_midnight() {
        let parsed = RecordDate::new("2024-03-05").to_datetime().unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "00:00");
        assert!(RecordDate::new("2024-03-05T09:15").to_datetime().is_some());
        assert!(RecordDate::new("2024-03-05T09:15:00.000Z")
            .to_datetime()
            .is_some());
        assert!(RecordDate::new("ontem").to_datetime().is_none());
    }

    #[test]
    fn record_date_validation() {
        assert_eq!(
            RecordDate::new("  ").validate(),
            Err(ValidationError::MissingDate)
        );
        assert!(matches!(
            RecordDate::new("2024-13-01").validate(),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(RecordDate::new("2024-02-29").validate().is_ok());
    }

    #[test]
    fn month_key_days_in_month() {
        assert_eq!("2024-02".parse::<MonthKey>().unwrap().days_in_month(), 29);
        assert_eq!("2023-02".parse::<MonthKey>().unwrap().days_in_month(), 28);
        assert_eq!("2024-04".parse::<MonthKey>().unwrap().days_in_month(), 30);
        assert_eq!("2024-12".parse::<MonthKey>().unwrap().days_in_month(), 31);
    }

    #[test]
    fn month_key_rejects_malformed_values() {
        for raw in ["2024-3", "24-03", "2024-13", "2024-00", "abcd-ef", "2024/03"] {
            assert!(raw.parse::<MonthKey>().is_err(), "{raw} should fail");
        }
    }

    #[test]
    fn month_key_shift_crosses_years() {
        let january = MonthKey::new(2024, 1).unwrap();
        assert_eq!(january.previous().to_string(), "2023-12");
        assert_eq!(january.shift(13).to_string(), "2025-02");
        assert_eq!(MonthKey::new(2023, 12).unwrap().next().to_string(), "2024-01");
    }

    #[test]
    fn month_key_serializes_as_string() {
        let key = MonthKey::new(2024, 3).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert_eq!(key.label_pt(), "março de 2024");
    }
}
