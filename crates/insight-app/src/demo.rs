//! Deterministic demo data
//!
//! Seeded random walks over trading days, plus annotations derived from the
//! walk itself so markers always land on real observations.

use chrono::{Datelike, NaiveDate, Weekday};
use insight_core::{
    AnalysisPayload, Annotation, Direction, EventKind, LevelKind, PricePoint, Strength,
};
use insight_state::WatchlistEntry;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const ANALYSIS_DAYS: usize = 90;

const BREAKOUT_LOOKBACK: usize = 20;
const FAST_MA: usize = 5;
const SLOW_MA: usize = 20;

/// (symbol, name, start price, daily volatility)
const WATCHLIST: &[(&str, &str, f64, f64)] = &[
    ("ACME", "Acme Corp", 182.4, 0.018),
    ("GLBX", "Globex", 64.1, 0.024),
    ("INIT", "Initech", 23.75, 0.03),
    ("UMBR", "Umbrella", 412.0, 0.012),
    ("HOOL", "Hooli", 1290.0, 0.015),
];

fn seed_for(symbol: &str) -> u64 {
    // FNV-1a
    symbol
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn first_session() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default()
}

/// Weekdays starting at `start`
pub fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .collect()
}

/// Seeded daily OHLCV walk; the same symbol always yields the same series
pub fn random_walk(
    symbol: &str,
    start_price: f64,
    days: usize,
    volatility: f64,
) -> Vec<PricePoint> {
    let mut rng = StdRng::seed_from_u64(seed_for(symbol));
    let mut close = start_price;
    let mut trend = 0.0;

    trading_days(first_session(), days)
        .into_iter()
        .map(|date| {
            if rng.gen_bool(0.08) {
                trend = (rng.r#gen::<f64>() - 0.5) * volatility;
            }

            let open = close;
            let shock = (rng.r#gen::<f64>() + rng.r#gen::<f64>() - 1.0) * volatility;
            close = (open * (1.0 + trend + shock)).max(1.0);

            let high = open.max(close) * (1.0 + rng.r#gen::<f64>() * volatility);
            let low = open.min(close) * (1.0 - rng.r#gen::<f64>() * volatility);
            let volume = (0.6 + rng.r#gen::<f64>() * 0.8)
                * 1_000_000.0
                * (1.0 + shock.abs() / volatility);

            PricePoint::new(date.format("%Y-%m-%d").to_string(), round2(close))
                .with_ohlc(round2(open), round2(high), round2(low))
                .with_volume(volume.round())
        })
        .collect()
}

fn sma(closes: &[f64], end: usize, window: usize) -> Option<f64> {
    let start = (end + 1).checked_sub(window)?;
    let slice = closes.get(start..=end)?;
    Some(slice.iter().sum::<f64>() / window as f64)
}

fn index_of_extreme(values: &[f64], greater: bool) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .reduce(|best, cur| {
            let better = if greater { cur.1 > best.1 } else { cur.1 < best.1 };
            if better { cur } else { best }
        })
        .map(|(i, _)| i)
}

/// Levels and events a simple technical screen would find in `points`
pub fn annotate(points: &[PricePoint]) -> Vec<Annotation> {
    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
    let lowest = index_of_extreme(&closes, false);
    let highest = index_of_extreme(&closes, true);
    let (Some(lo_idx), Some(hi_idx)) = (lowest, highest) else {
        return Vec::new();
    };
    let (lo, hi) = (closes[lo_idx], closes[hi_idx]);

    let mut annotations = vec![
        Annotation::level(LevelKind::Support, round2(lo * 1.005), Strength::Strong),
        Annotation::level(LevelKind::Resistance, round2(hi * 0.995), Strength::Moderate),
        Annotation::level(LevelKind::Support, round2(lo + (hi - lo) * 0.35), Strength::Weak),
    ];

    let breakout = (BREAKOUT_LOOKBACK..closes.len()).find_map(|i| {
        let window = &closes[i - BREAKOUT_LOOKBACK..i];
        let max = window.iter().cloned().fold(f64::MIN, f64::max);
        let min = window.iter().cloned().fold(f64::MAX, f64::min);
        if closes[i] > max {
            Some((i, Direction::Bullish, "Close above the 20-day range high"))
        } else if closes[i] < min {
            Some((i, Direction::Bearish, "Close below the 20-day range low"))
        } else {
            None
        }
    });
    if let Some((i, direction, text)) = breakout {
        annotations.push(
            Annotation::event(EventKind::Breakout, points[i].date.clone(), text)
                .with_direction(direction),
        );
    }

    let crossover = (SLOW_MA..closes.len()).find_map(|i| {
        let before = sma(&closes, i - 1, FAST_MA)? - sma(&closes, i - 1, SLOW_MA)?;
        let after = sma(&closes, i, FAST_MA)? - sma(&closes, i, SLOW_MA)?;
        match (before <= 0.0, after > 0.0) {
            (true, true) => Some((i, Direction::Bullish)),
            (false, false) => Some((i, Direction::Bearish)),
            _ => None,
        }
    });
    if let Some((i, direction)) = crossover {
        let text = match direction {
            Direction::Bullish => "5-day average crossed above the 20-day average",
            Direction::Bearish => "5-day average crossed below the 20-day average",
        };
        annotations.push(
            Annotation::event(EventKind::MovingAverageCrossover, points[i].date.clone(), text)
                .with_direction(direction),
        );
    }

    let volumes: Vec<f64> = points.iter().map(|p| p.volume.unwrap_or(0.0)).collect();
    if let Some(i) = index_of_extreme(&volumes, true) {
        annotations.push(Annotation::event(
            EventKind::VolumeSpike,
            points[i].date.clone(),
            "Heaviest session in the window",
        ));
    }

    annotations.push(
        Annotation::event(
            EventKind::MomentumShift,
            points[lo_idx].date.clone(),
            "Selling pressure exhausted at the window low; momentum turned positive",
        )
        .with_price(lo)
        .with_direction(Direction::Bullish),
    );

    annotations
}

/// Analysis document for one symbol, as the analysis service would send it.
///
/// Carries one deliberately malformed annotation (a level without a price) to
/// exercise per-annotation validation.
pub fn analysis_json(
    symbol: &str,
    start_price: f64,
    volatility: f64,
) -> Result<String, serde_json::Error> {
    let points = random_walk(symbol, start_price, ANALYSIS_DAYS, volatility);
    let annotations = annotate(&points);
    let mut payload = AnalysisPayload::new(points, annotations);
    payload.symbol = Some(symbol.to_string());

    let mut value = serde_json::to_value(&payload)?;
    if let Some(list) = value.get_mut("annotations").and_then(|a| a.as_array_mut()) {
        list.push(serde_json::json!({ "kind": "RESISTANCE", "strength": "weak" }));
    }
    serde_json::to_string(&value)
}

/// Default analysis document (first watchlist symbol)
pub fn default_analysis_json() -> Result<String, serde_json::Error> {
    let (symbol, _, price, vol) = WATCHLIST[0];
    analysis_json(symbol, price, vol)
}

/// Start price and volatility of a watchlist symbol
pub fn profile(symbol: &str) -> Option<(f64, f64)> {
    WATCHLIST
        .iter()
        .find(|(s, ..)| *s == symbol)
        .map(|&(_, _, price, vol)| (price, vol))
}

/// Watchlist rows, including a fresh listing with a single observation
pub fn watchlist() -> Vec<WatchlistEntry> {
    let mut entries: Vec<WatchlistEntry> = WATCHLIST
        .iter()
        .map(|&(symbol, name, price, vol)| {
            WatchlistEntry::new(symbol, name, random_walk(symbol, price, ANALYSIS_DAYS, vol))
        })
        .collect();

    entries.push(WatchlistEntry::new(
        "NEWCO",
        "NewCo (listed today)",
        vec![PricePoint::new("2024-05-06", 18.0)],
    ));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::PriceSeries;

    #[test]
    fn test_walk_is_deterministic() {
        let a = random_walk("ACME", 100.0, 30, 0.02);
        let b = random_walk("ACME", 100.0, 30, 0.02);
        let c = random_walk("GLBX", 100.0, 30, 0.02);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|p| p.close.is_finite() && p.close >= 1.0));
    }

    #[test]
    fn test_trading_days_skip_weekends() {
        // 2024-01-05 is a Friday
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let days = trading_days(start, 3);
        assert_eq!(days[1], NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn test_annotations_anchor_to_series() {
        let points = random_walk("UMBR", 412.0, ANALYSIS_DAYS, 0.012);
        let series = PriceSeries::new(points.clone());
        let annotations = annotate(&points);

        assert!(annotations.iter().filter(|a| a.as_level().is_some()).count() == 3);
        for event in annotations.iter().filter_map(Annotation::as_event) {
            assert!(series.index_of(&event.date).is_some(), "{} not in series", event.date);
        }
    }

    #[test]
    fn test_analysis_json_drops_malformed_entry() {
        let json = default_analysis_json().unwrap();
        let payload = AnalysisPayload::from_json(&json).unwrap();
        let expected = annotate(&payload.points);

        assert_eq!(payload.symbol.as_deref(), Some("ACME"));
        assert_eq!(payload.points.len(), ANALYSIS_DAYS);
        assert_eq!(payload.annotations, expected);
    }

    #[test]
    fn test_watchlist_has_single_point_listing() {
        let entries = watchlist();
        assert_eq!(entries.len(), WATCHLIST.len() + 1);
        assert_eq!(entries.last().map(|e| e.points.len()), Some(1));
    }

    #[test]
    fn test_sma() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(sma(&closes, 3, 2), Some(3.5));
        assert_eq!(sma(&closes, 0, 2), None);
    }
}
