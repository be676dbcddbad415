//! # insight-core
//!
//! Core domain types for the Stock Insight dashboard.
//! Price series, analysis annotations and the payload handed over by the
//! analysis service. Display formatting goes through the [`ValueFormat`]
//! strategy.

pub mod annotation;
pub mod payload;
pub mod series;

pub use annotation::*;
pub use payload::*;
pub use series::*;

// ============================================================================
// STRATEGY PATTERN: Display formats
// ============================================================================

/// Strategy for turning a number into a label
pub trait ValueFormat: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Closing prices: fixed decimals, four places for sub-unit quotes
#[derive(Debug, Clone, Copy)]
pub struct PriceFormat {
    pub decimals: usize,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl ValueFormat for PriceFormat {
    fn format(&self, value: f64) -> String {
        match value {
            v if !v.is_finite() => "--".to_string(),
            v if v.abs() < 1.0 => format!("{:.4}", v),
            v => format!("{:.prec$}", v, prec = self.decimals),
        }
    }
}

/// Share volumes with K/M/B suffixes
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeFormat;

impl ValueFormat for VolumeFormat {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return "--".to_string();
        }

        const SUFFIXES: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];
        SUFFIXES
            .iter()
            .find(|(scale, _)| value.abs() >= *scale)
            .map(|(scale, suffix)| format!("{:.2}{}", value / scale, suffix))
            .unwrap_or_else(|| format!("{:.0}", value))
    }
}

/// Signed percentage ("+1.25%", "-0.40%")
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    format!("{:+.2}%", value)
}

// ============================================================================
// PALETTE
// ============================================================================

pub mod colors {
    pub const BULL: &str = "#22c55e";
    pub const BEAR: &str = "#ef4444";
    pub const WARN: &str = "#fbbf24";
    pub const INFO: &str = "#38bdf8";
    pub const ACCENT: &str = "#a78bfa";

    pub const BG_PANEL: &str = "#141414";
    pub const BG_ELEVATED: &str = "#1a1a1a";
    pub const BORDER: &str = "#2a2a2a";
    pub const GRID: &str = "#1f1f1f";
    pub const TEXT_PRIMARY: &str = "#fafafa";
    pub const TEXT_MUTED: &str = "#888888";

    const BULL_RGB: (u8, u8, u8) = (34, 197, 94);
    const BEAR_RGB: (u8, u8, u8) = (239, 68, 68);

    /// Translucent trend color for fills
    pub fn trend_alpha(positive: bool, alpha: f64) -> String {
        let (r, g, b) = if positive { BULL_RGB } else { BEAR_RGB };
        format!("rgba({}, {}, {}, {:.2})", r, g, b, alpha.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_format() {
        let fmt = PriceFormat::default();
        assert_eq!(fmt.format(110.0), "110.00");
        assert_eq!(fmt.format(0.123456), "0.1235");
        assert_eq!(fmt.format(f64::NAN), "--");
        assert_eq!(PriceFormat { decimals: 0 }.format(99.6), "100");
    }

    #[test]
    fn test_volume_format() {
        assert_eq!(VolumeFormat.format(1_500_000.0), "1.50M");
        assert_eq!(VolumeFormat.format(2_500.0), "2.50K");
        assert_eq!(VolumeFormat.format(3_200_000_000.0), "3.20B");
        assert_eq!(VolumeFormat.format(512.0), "512");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1.254), "+1.25%");
        assert_eq!(format_percent(-0.4), "-0.40%");
        assert_eq!(format_percent(f64::INFINITY), "--");
    }

    #[test]
    fn test_trend_alpha() {
        assert_eq!(colors::trend_alpha(true, 0.15), "rgba(34, 197, 94, 0.15)");
        assert_eq!(colors::trend_alpha(false, 2.0), "rgba(239, 68, 68, 1.00)");
    }
}
