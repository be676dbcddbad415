//! # chartkit
//!
//! Core chart primitives: scales, the index/value scale mapper, axis helpers
//! and label formatters. Implements Strategy pattern for scale behaviors.

use crate::ViewportGeometry;
use insight_core::PriceSeries;

/// Fraction of the data range added above and below the series
pub const DOMAIN_PADDING_RATIO: f64 = 0.1;

/// Half-range substituted when every value is identical
pub const FLAT_DOMAIN_HALF_RANGE: f64 = 1.0;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;

    /// Generate tick values
    fn ticks(&self, count: usize) -> Vec<f64>;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            clamp: false,
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Get domain bounds
    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let mut normalized = (value - d_min) / (d_max - d_min);

        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }

        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.domain;
        if count <= 1 {
            return vec![min];
        }

        let step = (max - min) / (count - 1) as f64;
        (0..count).map(|i| min + step * i as f64).collect()
    }
}

// ============================================================================
// DOMAIN POLICY
// ============================================================================

/// Data min/max widened by 10% of the range on both ends.
///
/// A flat series gets an artificial ±1 range so the line sits mid-plot.
pub fn padded_domain(min: f64, max: f64) -> (f64, f64) {
    let (min, max) = safe_domain(min, max);
    let range = max - min;
    let padding = if range > f64::EPSILON {
        range * DOMAIN_PADDING_RATIO
    } else {
        FLAT_DOMAIN_HALF_RANGE
    };
    (min - padding, max + padding)
}

/// Finite, ordered bounds
fn safe_domain(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (-FLAT_DOMAIN_HALF_RANGE, FLAT_DOMAIN_HALF_RANGE);
    }

    if min <= max { (min, max) } else { (max, min) }
}

// ============================================================================
// SCALE MAPPER
// ============================================================================

/// Index/value → pixel mapping for one series inside one viewport.
///
/// `x` spreads indices evenly across the plot width; `y` maps values onto the
/// plot height, inverted so higher prices sit higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapper {
    point_count: usize,
    geometry: ViewportGeometry,
    y_scale: LinearScale,
}

impl ScaleMapper {
    /// Mapper over an explicit value domain
    pub fn new(point_count: usize, domain: (f64, f64), geometry: ViewportGeometry) -> Self {
        let (lo, hi) = safe_domain(domain.0, domain.1);
        let (lo, hi) = if hi - lo > f64::EPSILON {
            (lo, hi)
        } else {
            (lo - FLAT_DOMAIN_HALF_RANGE, hi + FLAT_DOMAIN_HALF_RANGE)
        };

        let y_scale = LinearScale::new()
            .domain(lo, hi)
            .range(geometry.plot_bottom(), geometry.plot_top());

        Self {
            point_count,
            geometry,
            y_scale,
        }
    }

    /// Mapper over the padded domain of a series (None when empty)
    pub fn for_series(series: &PriceSeries, geometry: ViewportGeometry) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let (min, max) = series.value_range().unwrap_or((0.0, 0.0));
        Some(Self::new(series.len(), padded_domain(min, max), geometry))
    }

    /// Same series and domain, new viewport
    pub fn with_geometry(&self, geometry: ViewportGeometry) -> Self {
        let (lo, hi) = self.domain();
        Self::new(self.point_count, (lo, hi), geometry)
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub fn domain(&self) -> (f64, f64) {
        self.y_scale.domain_bounds()
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// Horizontal distance between consecutive points
    pub fn spacing(&self) -> f64 {
        if self.point_count < 2 {
            return 0.0;
        }
        self.geometry.inner_width() / (self.point_count - 1) as f64
    }

    /// Pixel x of a data index (a single point pins to the left edge)
    pub fn x(&self, index: usize) -> f64 {
        self.geometry.plot_left() + index as f64 * self.spacing()
    }

    /// Pixel y of a value; non-finite values pin to the plot bottom
    pub fn y(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.geometry.plot_bottom();
        }
        self.y_scale.scale(value)
    }

    /// Pixel y of a value, pinned inside the plot when it falls off scale
    pub fn y_clamped(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.geometry.plot_bottom();
        }
        self.y_scale.clamp(true).scale(value)
    }

    pub fn point(&self, index: usize, value: f64) -> (f64, f64) {
        (self.x(index), self.y(value))
    }

    /// Nearest data index for a pixel x, clamped to the series
    pub fn index_at(&self, px: f64) -> Option<usize> {
        if self.point_count == 0 {
            return None;
        }

        let spacing = self.spacing();
        if spacing <= 0.0 || !px.is_finite() {
            return Some(0);
        }

        let last = (self.point_count - 1) as f64;
        let raw = ((px - self.geometry.plot_left()) / spacing).round();
        Some(raw.clamp(0.0, last) as usize)
    }

    /// Project every close of a series
    pub fn project(&self, series: &PriceSeries) -> Vec<(f64, f64)> {
        series
            .closes()
            .enumerate()
            .map(|(i, close)| self.point(i, close))
            .collect()
    }
}

// ============================================================================
// AXIS HELPERS
// ============================================================================

/// At most `max_ticks` evenly spread indices, first and last included
pub fn thinned_indices(count: usize, max_ticks: usize) -> Vec<usize> {
    if count == 0 || max_ticks == 0 {
        return Vec::new();
    }
    if count <= max_ticks {
        return (0..count).collect();
    }
    if max_ticks == 1 {
        return vec![count - 1];
    }

    let last = (count - 1) as f64;
    let intervals = (max_ticks - 1) as f64;
    let mut indices: Vec<usize> = (0..max_ticks)
        .map(|i| (i as f64 * last / intervals).round() as usize)
        .collect();
    indices.dedup();
    indices
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Format price for axis labels
pub fn format_price(price: f64, decimals: usize) -> String {
    if !price.is_finite() {
        return "--".to_string();
    }

    let abs = price.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", price / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.0}", price)
    } else if abs >= 1_000.0 {
        format!("{:.1}", price)
    } else if abs >= 1.0 {
        format!("{:.prec$}", price, prec = decimals)
    } else {
        format!("{:.4}", price)
    }
}

// ============================================================================
// TESTS
// ============================================================================
