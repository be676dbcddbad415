//! # insight-charts
//!
//! D3.js-style SVG time-series charting built with Leptos.
//! Turns a price series and its analysis annotations into a scaled,
//! pointer-interactive drawing, plus a compact sparkline variant.
//!
//! ## Architecture
//!
//! The math is platform-agnostic and renders into a [`scene::Surface`]:
//! - Scale computation (`ScaleMapper` over linear scales)
//! - Path generation (line, area, Catmull-Rom smoothing)
//! - Annotation placement and hover state
//!
//! Browser bindings (resize observation, pointer input) live in `surface`.
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, scale mapper, formatters
//! - `path` - Path builder and path generators
//! - `scene` - Drawing primitives and the surface adapter
//! - `annotation` - Support/resistance lines and event markers
//! - `interaction` - Hover state machine and resize coalescing
//! - `surface` - DOM bindings: resize observer, pointer position
//! - `price_chart` - Full chart with grid, axes and overlay
//! - `sparkline` - Compact smoothed chart

pub mod annotation;
pub mod chartkit;
pub mod interaction;
pub mod path;
pub mod price_chart;
pub mod scene;
pub mod sparkline;
pub mod surface;

pub use annotation::*;
pub use chartkit::*;
pub use interaction::*;
pub use path::*;
pub use price_chart::*;
pub use scene::*;
pub use sparkline::*;
pub use surface::*;

// Re-export colors from insight-core for convenience
pub use insight_core::colors;

/// Pixel margins reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(padding: f64) -> Self {
        Self::new(padding, padding, padding, padding)
    }

    /// Compact padding for sparklines
    pub const fn compact() -> Self {
        Self::new(4.0, 4.0, 4.0, 4.0)
    }

    /// Right Y-axis layout (price labels on right, dates below)
    pub const fn right_axis() -> Self {
        Self::new(16.0, 64.0, 28.0, 12.0)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::right_axis()
    }
}

/// Container size plus padding, owned by a single chart instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl ViewportGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            padding: Padding::default(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Same padding, new container size
    pub fn resized(&self, width: f64, height: f64) -> Self {
        Self::new(width, height).with_padding(self.padding)
    }

    /// Inner width (excluding padding)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    /// Inner height (excluding padding)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    pub fn plot_left(&self) -> f64 {
        self.padding.left
    }

    pub fn plot_right(&self) -> f64 {
        self.padding.left + self.inner_width()
    }

    pub fn plot_top(&self) -> f64 {
        self.padding.top
    }

    pub fn plot_bottom(&self) -> f64 {
        self.padding.top + self.inner_height()
    }

    /// Horizontal midpoint of the whole drawing
    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ViewportGeometry {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
