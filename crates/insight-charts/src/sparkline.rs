//! Sparkline charts for compact inline visualizations
//!
//! Smoothed line, no axes or grid. Hover shows a dot, a vertical guide and a
//! value tooltip kept inside the drawing so it stays legible at ~80px.

use crate::{
    chartkit::{format_price, ScaleMapper},
    colors,
    interaction::{InteractionController, PointerKind},
    path::{smooth_path, Path, DEFAULT_SMOOTHING},
    scene::{Shape, Stroke, Surface, SvgSurface, TextAnchor},
    surface::{pointer_x, shapes_view, use_container_size},
    Padding, ViewportGeometry,
};
use insight_core::{PricePoint, PriceSeries};
use leptos::{html, prelude::*};
use web_sys::PointerEvent;

const TOOLTIP_FONT_SIZE: f64 = 9.0;
const TOOLTIP_CHAR_WIDTH: f64 = 5.6;
const TOOLTIP_HEIGHT: f64 = 13.0;
const TOOLTIP_GAP: f64 = 4.0;

// ============================================================================
// CONFIG
// ============================================================================

/// Sparkline configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineConfig {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub stroke_width: f64,
    pub smoothing: f64,
    pub show_endpoint: bool,
    pub endpoint_radius: f64,
    pub show_tooltip: bool,
    pub positive: Option<bool>,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 32.0,
            padding: Padding::compact(),
            stroke_width: 1.5,
            smoothing: DEFAULT_SMOOTHING,
            show_endpoint: true,
            endpoint_radius: 2.5,
            show_tooltip: true,
            positive: None,
        }
    }
}

impl SparklineConfig {
    /// Table-cell sized variant
    pub fn mini() -> Self {
        Self {
            width: 80.0,
            height: 24.0,
            padding: Padding::uniform(3.0),
            stroke_width: 1.25,
            ..Self::default()
        }
    }

    pub fn geometry(&self) -> ViewportGeometry {
        ViewportGeometry::new(self.width, self.height).with_padding(self.padding)
    }
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SparklineModel {
    pub series: PriceSeries,
    pub mapper: ScaleMapper,
    pub positive: bool,
    pub path: Path,
    config: SparklineConfig,
}

impl SparklineModel {
    /// None when the series is too short to draw a line
    pub fn build(series: &PriceSeries, config: &SparklineConfig) -> Option<Self> {
        Self::build_in(series, config, config.geometry())
    }

    /// Same as [`SparklineModel::build`] for a measured container
    pub fn build_in(
        series: &PriceSeries,
        config: &SparklineConfig,
        geometry: ViewportGeometry,
    ) -> Option<Self> {
        if !series.is_renderable() {
            return None;
        }
        let mapper = ScaleMapper::for_series(series, geometry)?;

        Some(Self {
            series: series.clone(),
            mapper,
            positive: config.positive.unwrap_or_else(|| series.is_positive()),
            path: smooth_path(&mapper.project(series), config.smoothing),
            config: *config,
        })
    }

    pub fn color(&self) -> &'static str {
        if self.positive { colors::BULL } else { colors::BEAR }
    }

    pub fn line_shape(&self) -> Shape {
        Shape::stroked_path(&self.path, Stroke::new(self.color(), self.config.stroke_width))
    }

    /// Dot on the last point, shown while nothing is hovered
    pub fn endpoint_shapes(&self) -> Vec<Shape> {
        if !self.config.show_endpoint {
            return Vec::new();
        }
        let last = self.series.len().saturating_sub(1);
        self.series
            .get(last)
            .map(|p| {
                let (x, y) = self.mapper.point(last, p.close);
                vec![Shape::dot(x, y, self.config.endpoint_radius, self.color())]
            })
            .unwrap_or_default()
    }

    /// Guide, dot and value tooltip for `index`
    pub fn hover_shapes(&self, index: usize) -> Vec<Shape> {
        let Some(point) = self.series.get(index) else {
            return Vec::new();
        };
        let geo = self.mapper.geometry();
        let (x, y) = self.mapper.point(index, point.close);

        let mut shapes = vec![
            Shape::line(
                x,
                0.0,
                x,
                geo.height,
                Stroke::new(colors::TEXT_MUTED, 1.0).opacity(0.5),
            ),
            Shape::dot(x, y, self.config.endpoint_radius + 0.5, self.color()),
        ];

        if self.config.show_tooltip {
            shapes.extend(tooltip_shapes(geo, x, y, &format_price(point.close, 2)));
        }
        shapes
    }

    pub fn render<S: Surface>(&self, surface: &mut S, hovered: Option<usize>) {
        surface.draw(&self.line_shape());
        match hovered {
            Some(index) => surface.draw_all(&self.hover_shapes(index)),
            None => surface.draw_all(&self.endpoint_shapes()),
        }
    }
}

/// Value label box, clamped inside the drawing on every side
fn tooltip_shapes(geo: &ViewportGeometry, x: f64, y: f64, label: &str) -> Vec<Shape> {
    let width = (label.chars().count() as f64 * TOOLTIP_CHAR_WIDTH + 6.0).min(geo.width);
    let left = (x - width / 2.0).clamp(0.0, (geo.width - width).max(0.0));

    // Above the point when there is room, otherwise below
    let above = y - TOOLTIP_GAP - TOOLTIP_HEIGHT;
    let top = if above >= 0.0 { above } else { y + TOOLTIP_GAP };
    let top = top.clamp(0.0, (geo.height - TOOLTIP_HEIGHT).max(0.0));

    vec![
        Shape::Rect {
            x: left,
            y: top,
            width,
            height: TOOLTIP_HEIGHT,
            fill: colors::BG_ELEVATED.to_string(),
            stroke: Some(Stroke::new(colors::BORDER, 0.5)),
            rx: 2.0,
        },
        Shape::text(
            left + width / 2.0,
            top + TOOLTIP_HEIGHT - 3.5,
            label,
            TextAnchor::Middle,
            colors::TEXT_PRIMARY,
            TOOLTIP_FONT_SIZE,
        ),
    ]
}

/// Deterministic placeholder: a faint dashed midline, no series path
pub fn empty_sparkline_shapes(geometry: &ViewportGeometry) -> Vec<Shape> {
    let mid = geometry.height / 2.0;
    vec![Shape::line(
        geometry.plot_left(),
        mid,
        geometry.plot_right(),
        mid,
        Stroke::new(colors::BORDER, 1.0).dashed("2,3"),
    )]
}

/// Standalone SVG document for a sparkline
pub fn render_sparkline_svg(points: &[PricePoint], config: &SparklineConfig) -> String {
    let series = PriceSeries::new(points.to_vec());
    let geometry = config.geometry();
    let mut svg = SvgSurface::new(geometry.width, geometry.height).with_class("sparkline");

    match SparklineModel::build(&series, config) {
        Some(model) => model.render(&mut svg, None),
        None => svg.draw_all(&empty_sparkline_shapes(&geometry)),
    }
    svg.finish()
}

// ============================================================================
// COMPONENT
// ============================================================================

/// Sparkline component.
///
/// Follows its container size so the viewBox always matches device pixels;
/// dots and tooltip text keep their shape whatever the cell's aspect ratio.
#[component]
pub fn Sparkline(
    #[prop(into)] points: Signal<Vec<PricePoint>>,
    #[prop(optional)] config: Option<SparklineConfig>,
    #[prop(optional)] on_hover: Option<Callback<Option<usize>>>,
) -> impl IntoView {
    let config = config.unwrap_or_default();

    let container = NodeRef::<html::Div>::new();
    let size = use_container_size(container, (config.width, config.height));
    let geometry = Memo::new(move |_| {
        let (width, height) = size.get();
        config.geometry().resized(width, height)
    });

    let series = Memo::new(move |_| PriceSeries::new(points.get()));
    let model = Memo::new(move |_| {
        let geometry = geometry.get();
        series.with(|s| SparklineModel::build_in(s, &config, geometry))
    });

    let controller = RwSignal::new(InteractionController::new(config.geometry()));
    Effect::new(move |_| series.with(|s| controller.update(|c| c.set_series(s))));
    Effect::new(move |_| {
        let geo = geometry.get();
        controller.update(|c| {
            c.resize(geo.width, geo.height);
        });
    });

    let hovered = Memo::new(move |_| controller.with(|c| c.hovered()));
    if let Some(on_hover) = on_hover {
        Effect::new(move |_| on_hover.run(hovered.get()));
    }

    let on_pointer = move |ev: PointerEvent| {
        if let Some(x) = pointer_x(&ev, geometry.get_untracked().width) {
            controller.update(|c| {
                c.pointer_move(x);
            });
        }
    };
    let on_leave = move |ev: PointerEvent| {
        let kind = PointerKind::from(ev.pointer_type().as_str());
        controller.update(|c| c.pointer_leave(kind));
    };

    view! {
        <div class="sparkline-container" node_ref=container style="width: 100%; height: 100%;">
            <svg
                class="sparkline"
                viewBox=move || geometry.get().viewbox()
                style="width: 100%; height: 100%; display: block; touch-action: none;"
                on:pointermove=on_pointer
                on:pointerdown=on_pointer
                on:pointerleave=on_leave
            >
                {move || match model.get() {
                    None => shapes_view(empty_sparkline_shapes(&geometry.get())).into_any(),
                    Some(model) => {
                        let line = model.line_shape();
                        view! {
                            <>
                                {shapes_view(vec![line])}
                                {move || {
                                    let shapes = match hovered.get() {
                                        Some(index) => model.hover_shapes(index),
                                        None => model.endpoint_shapes(),
                                    };
                                    shapes_view(shapes)
                                }}
                            </>
                        }
                        .into_any()
                    }
                }}
            </svg>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(format!("2024-01-{:02}", i + 1), c))
            .collect()
    }

    fn model(closes: &[f64], config: &SparklineConfig) -> SparklineModel {
        SparklineModel::build(&PriceSeries::new(points(closes)), config).unwrap()
    }

    #[test]
    fn test_single_point_renders_placeholder() {
        let config = SparklineConfig::default();
        assert!(SparklineModel::build(&PriceSeries::new(points(&[100.0])), &config).is_none());

        let svg = render_sparkline_svg(&points(&[100.0]), &config);
        assert!(!svg.contains("<path"));
        assert!(svg.contains("stroke-dasharray"));
        assert_eq!(svg, render_sparkline_svg(&[], &config));
    }

    #[test]
    fn test_path_is_smoothed() {
        let svg = render_sparkline_svg(&points(&[100.0, 110.0, 90.0]), &SparklineConfig::default());
        assert!(svg.contains("<path d=\"M"));
        assert!(svg.contains('C'));
    }

    #[test]
    fn test_hover_tooltip_value() {
        let m = model(&[100.0, 110.0, 90.0], &SparklineConfig::default());
        let mut ctl = InteractionController::new(SparklineConfig::default().geometry());
        ctl.set_series(&m.series);
        let index = ctl.pointer_move(m.mapper.x(1)).unwrap();

        let labels: Vec<String> = m
            .hover_shapes(index)
            .into_iter()
            .filter_map(|s| match s {
                Shape::Text { content, .. } => Some(content),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["110.00".to_string()]);
    }

    #[test]
    fn test_tooltip_clamped_at_narrow_width() {
        let config = SparklineConfig::mini();
        let m = model(&[12_345.0, 9_876.5, 11_000.0], &config);
        for index in 0..3 {
            for shape in m.hover_shapes(index) {
                if let Shape::Rect { x, y, width, height, .. } = shape {
                    assert!(x >= 0.0 && x + width <= config.width + 1e-9);
                    assert!(y >= 0.0 && y + height <= config.height + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_marks_keep_pixel_size_in_wide_cell() {
        let config = SparklineConfig::mini();
        let series = PriceSeries::new(points(&[100.0, 110.0, 90.0]));
        let wide = config.geometry().resized(240.0, 24.0);
        let narrow = SparklineModel::build(&series, &config).unwrap();
        let stretched = SparklineModel::build_in(&series, &config, wide).unwrap();

        assert!((stretched.mapper.x(2) - (240.0 - config.padding.right)).abs() < 1e-9);
        assert_eq!(stretched.mapper.y(110.0), narrow.mapper.y(110.0));

        let sizes = |m: &SparklineModel| -> Vec<(f64, f64)> {
            m.hover_shapes(1)
                .into_iter()
                .filter_map(|s| match s {
                    Shape::Circle { r, .. } => Some((r, r)),
                    Shape::Rect { width, height, .. } => Some((width, height)),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(sizes(&narrow), sizes(&stretched));
    }

    #[test]
    fn test_endpoint_only_when_idle() {
        let m = model(&[100.0, 105.0], &SparklineConfig::default());
        let mut idle: Vec<Shape> = Vec::new();
        m.render(&mut idle, None);
        assert_eq!(idle.len(), 2);

        let endpoint = &m.endpoint_shapes()[0];
        let (x, y) = m.mapper.point(1, 105.0);
        assert_eq!(endpoint, &Shape::dot(x, y, 2.5, colors::BULL));

        let no_dot = SparklineConfig {
            show_endpoint: false,
            ..SparklineConfig::default()
        };
        assert!(model(&[100.0, 105.0], &no_dot).endpoint_shapes().is_empty());
    }

    #[test]
    fn test_no_axes_or_text_when_idle() {
        let svg = render_sparkline_svg(&points(&[3.0, 1.0, 2.0, 5.0]), &SparklineConfig::mini());
        assert!(!svg.contains("<text"));
        assert!(!svg.contains("NaN"));
    }
}
