//! Watchlist of symbols rendered as sparklines

use insight_core::{format_percent, PricePoint, PriceSeries};
use leptos::prelude::*;

/// One watchlist row
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub name: String,
    pub points: Vec<PricePoint>,
}

impl WatchlistEntry {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        points: Vec<PricePoint>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            points,
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Change over the whole window, formatted for display
    pub fn change_label(&self) -> String {
        let series = PriceSeries::new(self.points.clone());
        match series.len().checked_sub(1).and_then(|i| series.change_percent_at(i)) {
            Some(pct) if series.is_renderable() => format_percent(pct),
            _ => "--".to_string(),
        }
    }

    pub fn is_positive(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.close >= first.close,
            _ => true,
        }
    }
}

/// Reactive watchlist with a selected row
#[derive(Debug, Clone, Copy)]
pub struct WatchlistState {
    pub entries: RwSignal<Vec<WatchlistEntry>>,
    pub selected: RwSignal<Option<String>>,
}

impl WatchlistState {
    pub fn new() -> Self {
        Self {
            entries: RwSignal::new(Vec::new()),
            selected: RwSignal::new(None),
        }
    }

    pub fn set_entries(&self, entries: Vec<WatchlistEntry>) {
        self.entries.set(entries);
    }

    /// Insert or replace by symbol, keeping list order
    pub fn upsert(&self, entry: WatchlistEntry) {
        self.entries.update(|entries| {
            match entries.iter_mut().find(|e| e.symbol == entry.symbol) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        });
    }

    pub fn select(&self, symbol: impl Into<String>) {
        self.selected.set(Some(symbol.into()));
    }

    pub fn selected_entry(&self) -> Option<WatchlistEntry> {
        let selected = self.selected.get()?;
        self.entries
            .with(|entries| entries.iter().find(|e| e.symbol == selected).cloned())
    }

    /// Points for one symbol as a derived signal, for sparkline rows
    pub fn points_for(&self, symbol: String) -> Signal<Vec<PricePoint>> {
        let entries = self.entries;
        Signal::derive(move || {
            entries.with(|entries| {
                entries
                    .iter()
                    .find(|e| e.symbol == symbol)
                    .map(|e| e.points.clone())
                    .unwrap_or_default()
            })
        })
    }
}

impl Default for WatchlistState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: &str, closes: &[f64]) -> WatchlistEntry {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(format!("2024-02-{:02}", i + 1), c))
            .collect();
        WatchlistEntry::new(symbol, symbol, points)
    }

    #[test]
    fn test_change_label() {
        assert_eq!(entry("UP", &[100.0, 105.0]).change_label(), "+5.00%");
        assert_eq!(entry("DN", &[100.0, 90.0]).change_label(), "-10.00%");
        assert_eq!(entry("ONE", &[100.0]).change_label(), "--");
        assert!(!entry("DN", &[100.0, 90.0]).is_positive());
    }

    #[test]
    fn test_upsert_and_select() {
        Owner::new().with(|| {
            let state = WatchlistState::new();
            state.set_entries(vec![entry("AAA", &[1.0, 2.0]), entry("BBB", &[3.0, 4.0])]);
            state.upsert(entry("AAA", &[5.0, 6.0, 7.0]));
            state.upsert(entry("CCC", &[8.0, 9.0]));

            let symbols: Vec<String> = state
                .entries
                .with_untracked(|e| e.iter().map(|e| e.symbol.clone()).collect());
            assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);

            state.select("AAA");
            assert_eq!(state.selected_entry().map(|e| e.points.len()), Some(3));
            assert_eq!(state.points_for("BBB".to_string()).get_untracked().len(), 2);
        });
    }
}
