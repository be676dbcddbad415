//! Price series types for charting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// DATE KEYS
// ============================================================================

/// Calendar-day key used to anchor annotations onto observations.
///
/// Accepts plain ISO dates (`2024-01-05`) as well as timestamps
/// (`2024-01-05T14:30:00Z`, `2024-01-05 09:30`); the time part is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Normalize a date string to its calendar day
    pub fn parse(raw: &str) -> Option<Self> {
        let day = raw.trim().split(['T', ' ']).next()?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok().map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Short axis label ("Jan 05")
    pub fn short_label(&self) -> String {
        self.0.format("%b %d").to_string()
    }

    /// Long tooltip label ("Jan 05, 2024")
    pub fn long_label(&self) -> String {
        self.0.format("%b %d, %Y").to_string()
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// ============================================================================
// PRICE POINT
// ============================================================================

/// Single observation from the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// ISO-8601 calendar date
    pub date: String,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }

    pub fn with_ohlc(mut self, open: f64, high: f64, low: f64) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn key(&self) -> Option<DateKey> {
        DateKey::parse(&self.date)
    }

    /// Human label for tooltips, falls back to the raw string
    pub fn date_label(&self) -> String {
        self.key()
            .map(|k| k.long_label())
            .unwrap_or_else(|| self.date.clone())
    }
}

// ============================================================================
// PRICE SERIES
// ============================================================================

/// Ordered observations plus the `date -> index` lookup built once per load.
///
/// Points are taken as handed over: never re-sorted or de-duplicated. Points
/// whose date cannot be parsed are still plotted but cannot anchor events; on a
/// duplicate day the first observation wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    index: HashMap<DateKey, usize>,
}

impl PriceSeries {
    /// Minimum number of points needed to draw a line
    pub const MIN_RENDERABLE: usize = 2;

    pub fn new(points: Vec<PricePoint>) -> Self {
        let mut index = HashMap::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            match point.key() {
                Some(key) => {
                    index.entry(key).or_insert(i);
                }
                None => tracing::debug!(date = %point.date, "unparseable point date"),
            }
        }

        Self { points, index }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enough points to draw a line
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= Self::MIN_RENDERABLE
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// Min/max close, ignoring non-finite values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.closes()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    /// Resolve a date string to the index of its observation
    pub fn index_of(&self, date: &str) -> Option<usize> {
        DateKey::parse(date).and_then(|key| self.index_of_key(&key))
    }

    pub fn index_of_key(&self, key: &DateKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn first_close(&self) -> Option<f64> {
        self.points.first().map(|p| p.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Absolute change from the first observation to `index`
    pub fn change_at(&self, index: usize) -> Option<f64> {
        Some(self.get(index)?.close - self.first_close()?)
    }

    /// Percentage change from the first observation to `index`
    pub fn change_percent_at(&self, index: usize) -> Option<f64> {
        let first = self.first_close()?;
        if first == 0.0 {
            return None;
        }
        Some(self.change_at(index)? / first * 100.0)
    }

    /// Last close at or above the first one
    pub fn is_positive(&self) -> bool {
        match (self.first_close(), self.last_close()) {
            (Some(first), Some(last)) => last >= first,
            _ => true,
        }
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint::new(format!("2024-01-{:02}", i + 1), c))
                .collect(),
        )
    }

    #[test]
    fn test_date_key_normalization() {
        let plain = DateKey::parse("2024-03-15").unwrap();
        assert_eq!(DateKey::parse("2024-03-15T21:45:00Z"), Some(plain));
        assert_eq!(DateKey::parse(" 2024-03-15 09:30 "), Some(plain));
        assert_eq!(DateKey::parse("15/03/2024"), None);
        assert_eq!(plain.to_string(), "2024-03-15");
        assert_eq!(plain.short_label(), "Mar 15");
    }

    #[test]
    fn test_index_lookup() {
        let s = series(&[100.0, 110.0, 90.0]);
        assert_eq!(s.index_of("2024-01-02"), Some(1));
        assert_eq!(s.index_of("2024-01-02T16:00:00Z"), Some(1));
        assert_eq!(s.index_of("2024-01-04"), None);
        assert_eq!(s.index_of("garbage"), None);
    }

    #[test]
    fn test_duplicate_day_keeps_first() {
        let s = PriceSeries::new(vec![
            PricePoint::new("2024-01-01T09:30:00Z", 1.0),
            PricePoint::new("2024-01-01T16:00:00Z", 2.0),
        ]);
        assert_eq!(s.index_of("2024-01-01"), Some(0));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_value_range_skips_non_finite() {
        let s = series(&[100.0, f64::NAN, 90.0, f64::INFINITY, 120.0]);
        assert_eq!(s.value_range(), Some((90.0, 120.0)));
        assert_eq!(series(&[]).value_range(), None);
    }

    #[test]
    fn test_renderable_threshold() {
        assert!(!series(&[100.0]).is_renderable());
        assert!(series(&[100.0, 101.0]).is_renderable());
    }

    #[test]
    fn test_change() {
        let s = series(&[100.0, 110.0, 90.0]);
        assert_eq!(s.change_at(1), Some(10.0));
        assert_eq!(s.change_percent_at(2), Some(-10.0));
        assert!(!s.is_positive());
    }

    #[test]
    fn test_point_deserialize_optional_ohlc() {
        let p: PricePoint = serde_json::from_str(r#"{"date":"2024-01-01","close":100}"#).unwrap();
        assert_eq!(p.close, 100.0);
        assert!(p.open.is_none());

        let p: PricePoint = serde_json::from_str(
            r#"{"date":"2024-01-01","close":100,"open":98,"high":101,"low":97,"volume":1200}"#,
        )
        .unwrap();
        assert_eq!(p.high, Some(101.0));
        assert_eq!(p.volume, Some(1200.0));
    }
}
