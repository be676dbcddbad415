//! Full price chart: grid, axes, line/area, annotation overlay, crosshair
//!
//! [`PriceChartModel`] holds everything derivable from data plus viewport and
//! is rendered through any [`Surface`]. The [`PriceChart`] component wires it
//! to container size and pointer input.

use crate::{
    annotation::AnnotationLayer,
    chartkit::{format_price, thinned_indices, Scale, ScaleMapper},
    colors,
    interaction::{InteractionController, PointerKind},
    path::{area_path, line_path, Path},
    scene::{Shape, Stroke, Surface, SvgSurface, TextAnchor},
    surface::{pointer_x, shapes_view, use_container_size, ViewSurface},
    Padding, ViewportGeometry,
};
use insight_core::{format_percent, Annotation, PricePoint, PriceSeries};
use leptos::{html, prelude::*};
use web_sys::PointerEvent;

const TOOLTIP_WIDTH: f64 = 136.0;
const TOOLTIP_HEIGHT: f64 = 54.0;
const TOOLTIP_OFFSET: f64 = 12.0;

/// Price chart configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChartConfig {
    /// Size used before the container is measured, and for static export
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub grid_lines: usize,
    pub max_date_ticks: usize,
    pub show_area: bool,
    pub show_crosshair: bool,
    pub stroke_width: f64,
    /// Force trend coloring instead of comparing last vs first close
    pub positive: Option<bool>,
}

impl Default for PriceChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding: Padding::right_axis(),
            grid_lines: 5,
            max_date_ticks: 5,
            show_area: true,
            show_crosshair: true,
            stroke_width: 2.0,
            positive: None,
        }
    }
}

impl PriceChartConfig {
    pub fn compact() -> Self {
        Self {
            width: 400.0,
            height: 200.0,
            padding: Padding::new(8.0, 56.0, 24.0, 8.0),
            grid_lines: 3,
            max_date_ticks: 3,
            show_area: false,
            ..Self::default()
        }
    }

    pub fn geometry(&self) -> ViewportGeometry {
        ViewportGeometry::new(self.width, self.height).with_padding(self.padding)
    }
}

/// Positioned axis label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Geometry for one renderable series in one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChartModel {
    pub series: PriceSeries,
    pub mapper: ScaleMapper,
    pub positive: bool,
    pub line: Path,
    pub area: Option<Path>,
    pub price_ticks: Vec<AxisTick>,
    pub date_ticks: Vec<AxisTick>,
    pub annotations: AnnotationLayer,
    stroke_width: f64,
    show_crosshair: bool,
}

impl PriceChartModel {
    /// None when the series is too short to draw a line
    pub fn build(
        series: &PriceSeries,
        annotations: &[Annotation],
        geometry: ViewportGeometry,
        config: &PriceChartConfig,
    ) -> Option<Self> {
        if !series.is_renderable() {
            return None;
        }
        let mapper = ScaleMapper::for_series(series, geometry)?;
        let points = mapper.project(series);

        let price_ticks = mapper
            .y_scale()
            .ticks(config.grid_lines)
            .into_iter()
            .map(|value| AxisTick {
                position: mapper.y(value),
                label: format_price(value, 2),
            })
            .collect();

        let date_ticks = thinned_indices(series.len(), config.max_date_ticks)
            .into_iter()
            .filter_map(|i| {
                let point = series.get(i)?;
                let label = point
                    .key()
                    .map(|k| k.short_label())
                    .unwrap_or_else(|| point.date.clone());
                Some(AxisTick {
                    position: mapper.x(i),
                    label,
                })
            })
            .collect();

        Some(Self {
            series: series.clone(),
            mapper,
            positive: config.positive.unwrap_or_else(|| series.is_positive()),
            line: line_path(&points),
            area: config
                .show_area
                .then(|| area_path(&points, geometry.plot_bottom())),
            price_ticks,
            date_ticks,
            annotations: AnnotationLayer::resolve(annotations, series, &mapper),
            stroke_width: config.stroke_width,
            show_crosshair: config.show_crosshair,
        })
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        self.mapper.geometry()
    }

    pub fn color(&self) -> &'static str {
        if self.positive { colors::BULL } else { colors::BEAR }
    }

    /// Background, grid, axis labels and the series itself
    pub fn base_shapes(&self) -> Vec<Shape> {
        let geo = self.geometry();
        let mut shapes = vec![Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: geo.width,
            height: geo.height,
            fill: colors::BG_PANEL.to_string(),
            stroke: None,
            rx: 4.0,
        }];

        for tick in &self.price_ticks {
            shapes.push(Shape::line(
                geo.plot_left(),
                tick.position,
                geo.plot_right(),
                tick.position,
                Stroke::new(colors::GRID, 1.0),
            ));
            shapes.push(Shape::text(
                geo.plot_right() + 6.0,
                tick.position + 3.0,
                tick.label.clone(),
                TextAnchor::Start,
                colors::TEXT_MUTED,
                10.0,
            ));
        }

        let last = self.date_ticks.len().saturating_sub(1);
        for (i, tick) in self.date_ticks.iter().enumerate() {
            // Outermost labels hug the plot edges so they never clip
            let anchor = match i {
                0 => TextAnchor::Start,
                i if i == last => TextAnchor::End,
                _ => TextAnchor::Middle,
            };
            shapes.push(Shape::text(
                tick.position,
                geo.plot_bottom() + 18.0,
                tick.label.clone(),
                anchor,
                colors::TEXT_MUTED,
                10.0,
            ));
        }

        if let Some(area) = &self.area {
            shapes.push(Shape::filled_path(area, colors::trend_alpha(self.positive, 0.15)));
        }
        shapes.push(Shape::stroked_path(
            &self.line,
            Stroke::new(self.color(), self.stroke_width),
        ));

        shapes
    }

    pub fn overlay_shapes(&self) -> Vec<Shape> {
        self.annotations.shapes(self.geometry())
    }

    /// Crosshair, tooltip and the detail panels of events at `index`
    pub fn hover_shapes(&self, index: usize) -> Vec<Shape> {
        let Some(point) = self.series.get(index) else {
            return Vec::new();
        };
        let geo = *self.geometry();
        let (x, y) = self.mapper.point(index, point.close);
        let mut shapes = Vec::new();

        if self.show_crosshair {
            let guide = Stroke::new(colors::TEXT_MUTED, 1.0).dashed("3,3").opacity(0.6);
            shapes.push(Shape::line(x, geo.plot_top(), x, geo.plot_bottom(), guide.clone()));
            shapes.push(Shape::line(geo.plot_left(), y, geo.plot_right(), y, guide));
        }
        shapes.push(Shape::Circle {
            cx: x,
            cy: y,
            r: 4.0,
            fill: self.color().to_string(),
            stroke: Some(Stroke::new(colors::BG_PANEL, 2.0)),
        });
        shapes.extend(self.tooltip_shapes(index, x));

        for marker in self.annotations.events.iter().filter(|e| e.index == index) {
            shapes.extend(marker.panel(&geo).shapes());
        }
        shapes
    }

    fn tooltip_shapes(&self, index: usize, x: f64) -> Vec<Shape> {
        let Some(point) = self.series.get(index) else {
            return Vec::new();
        };
        let geo = self.geometry();

        let preferred = if x > geo.center_x() {
            x - TOOLTIP_OFFSET - TOOLTIP_WIDTH
        } else {
            x + TOOLTIP_OFFSET
        };
        let left = preferred.clamp(0.0, (geo.width - TOOLTIP_WIDTH).max(0.0));
        let top = geo.plot_top() + 4.0;

        let change = match (self.series.change_at(index), self.series.change_percent_at(index)) {
            (Some(abs), Some(pct)) => format!("{:+.2} ({})", abs, format_percent(pct)),
            (Some(abs), None) => format!("{:+.2}", abs),
            _ => "--".to_string(),
        };
        let change_color = match self.series.change_at(index) {
            Some(c) if c < 0.0 => colors::BEAR,
            _ => colors::BULL,
        };

        vec![
            Shape::Rect {
                x: left,
                y: top,
                width: TOOLTIP_WIDTH,
                height: TOOLTIP_HEIGHT,
                fill: colors::BG_ELEVATED.to_string(),
                stroke: Some(Stroke::new(colors::BORDER, 1.0)),
                rx: 4.0,
            },
            Shape::text(
                left + 8.0,
                top + 15.0,
                point.date_label(),
                TextAnchor::Start,
                colors::TEXT_MUTED,
                10.0,
            ),
            Shape::text(
                left + 8.0,
                top + 31.0,
                format_price(point.close, 2),
                TextAnchor::Start,
                colors::TEXT_PRIMARY,
                12.0,
            ),
            Shape::text(left + 8.0, top + 46.0, change, TextAnchor::Start, change_color, 10.0),
        ]
    }

    /// Base chart, then the annotation overlay
    pub fn render<S: Surface>(&self, surface: &mut S) {
        surface.draw_all(&self.base_shapes());
        surface.draw_all(&self.overlay_shapes());
    }
}

/// What the chart area shows; loading beats error beats missing data
#[derive(Debug, Clone, PartialEq)]
pub enum ChartStatus {
    Loading,
    Failed(String),
    NoData,
    Ready,
}

impl ChartStatus {
    pub fn resolve(is_loading: bool, error: Option<String>, renderable: bool) -> Self {
        match (is_loading, error) {
            (true, _) => Self::Loading,
            (false, Some(message)) => Self::Failed(message),
            (false, None) if renderable => Self::Ready,
            (false, None) => Self::NoData,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Loading | Self::Failed(_) => "price-chart-status",
            Self::NoData => "price-chart-empty",
            Self::Ready => "price-chart-svg",
        }
    }

    /// Shapes replacing the whole chart, None when the chart draws itself
    pub fn shapes(&self, geometry: &ViewportGeometry) -> Option<Vec<Shape>> {
        match self {
            Self::Loading => Some(status_shapes(geometry, "Loading…", colors::TEXT_MUTED)),
            Self::Failed(message) => Some(status_shapes(geometry, message, colors::BEAR)),
            Self::NoData => Some(empty_chart_shapes(geometry)),
            Self::Ready => None,
        }
    }
}

/// Everything drawn for `status`, before any hover layer
pub fn chart_shapes(
    status: &ChartStatus,
    model: Option<&PriceChartModel>,
    geometry: &ViewportGeometry,
) -> Vec<Shape> {
    if let Some(shapes) = status.shapes(geometry) {
        return shapes;
    }
    match model {
        Some(model) => {
            let mut shapes = Vec::new();
            model.render(&mut shapes);
            shapes
        }
        None => empty_chart_shapes(geometry),
    }
}

/// Centered message replacing all chart geometry
pub fn status_shapes(geometry: &ViewportGeometry, message: &str, color: &str) -> Vec<Shape> {
    vec![
        Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: geometry.width,
            height: geometry.height,
            fill: colors::BG_PANEL.to_string(),
            stroke: None,
            rx: 4.0,
        },
        Shape::text(
            geometry.center_x(),
            geometry.height / 2.0,
            message,
            TextAnchor::Middle,
            color,
            12.0,
        ),
    ]
}

/// Deterministic placeholder for series too short to draw
pub fn empty_chart_shapes(geometry: &ViewportGeometry) -> Vec<Shape> {
    status_shapes(geometry, "No data", colors::TEXT_MUTED)
}

/// Standalone SVG document for a price chart at the configured size
pub fn render_price_chart_svg(
    points: &[PricePoint],
    annotations: &[Annotation],
    config: &PriceChartConfig,
) -> String {
    let series = PriceSeries::new(points.to_vec());
    let geometry = config.geometry();
    let model = PriceChartModel::build(&series, annotations, geometry, config);
    let status = ChartStatus::resolve(false, None, model.is_some());

    let mut svg = SvgSurface::new(geometry.width, geometry.height).with_class("price-chart");
    svg.draw_all(&chart_shapes(&status, model.as_ref(), &geometry));
    svg.finish()
}

// ============================================================================
// COMPONENT
// ============================================================================

/// Responsive, hoverable price chart
#[component]
pub fn PriceChart(
    #[prop(into)] points: Signal<Vec<PricePoint>>,
    #[prop(optional, into)] annotations: Option<Signal<Vec<Annotation>>>,
    #[prop(optional, into)] is_loading: Option<Signal<bool>>,
    #[prop(optional, into)] error: Option<Signal<Option<String>>>,
    #[prop(optional)] config: Option<PriceChartConfig>,
    #[prop(optional)] on_hover: Option<Callback<Option<usize>>>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let annotations = annotations.unwrap_or_else(|| Signal::stored(Vec::new()));
    let is_loading = is_loading.unwrap_or_else(|| Signal::stored(false));
    let error = error.unwrap_or_else(|| Signal::stored(None));

    let container = NodeRef::<html::Div>::new();
    let size = use_container_size(container, (config.width, config.height));

    let series = Memo::new(move |_| PriceSeries::new(points.get()));
    let geometry = Memo::new(move |_| {
        let (width, height) = size.get();
        config.geometry().resized(width, height)
    });
    let model = Memo::new(move |_| {
        let geometry = geometry.get();
        series.with(|s| annotations.with(|a| PriceChartModel::build(s, a, geometry, &config)))
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
        let view_width = geometry.get_untracked().width;
        if let Some(x) = pointer_x(&ev, view_width) {
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
        <div
            class="price-chart"
            node_ref=container
            style="position: relative; width: 100%; height: 100%;"
        >
            {move || {
                let geo = geometry.get();
                let status = ChartStatus::resolve(
                    is_loading.get(),
                    error.get(),
                    model.with(Option::is_some),
                );

                match (status, model.get()) {
                    (ChartStatus::Ready, Some(model)) => {
                        let mut surface = ViewSurface::new();
                        model.render(&mut surface);
                        view! {
                            <svg
                                class="price-chart-svg"
                                viewBox=geo.viewbox()
                                preserveAspectRatio="none"
                                style="width: 100%; height: 100%; display: block; touch-action: none;"
                                on:pointermove=on_pointer
                                on:pointerdown=on_pointer
                                on:pointerleave=on_leave
                            >
                                <g class="price-chart-base">{surface.into_view()}</g>
                                <g class="price-chart-hover">
                                    {move || {
                                        hovered.get().map(|i| shapes_view(model.hover_shapes(i)))
                                    }}
                                </g>
                            </svg>
                        }
                        .into_any()
                    }
                    (status, model) => view! {
                        <svg
                            class=status.css_class()
                            viewBox=geo.viewbox()
                            style="width: 100%; height: 100%;"
                        >
                            {shapes_view(chart_shapes(&status, model.as_ref(), &geo))}
                        </svg>
                    }
                    .into_any(),
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::{Direction, EventKind, LevelKind, Strength};

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(format!("2024-01-{:02}", i + 1), c))
            .collect()
    }

    fn flat_config(width: f64) -> PriceChartConfig {
        PriceChartConfig {
            width,
            height: 200.0,
            padding: Padding::uniform(0.0),
            ..PriceChartConfig::default()
        }
    }

    fn model(
        closes: &[f64],
        annotations: &[Annotation],
        config: &PriceChartConfig,
    ) -> PriceChartModel {
        let series = PriceSeries::new(points(closes));
        PriceChartModel::build(&series, annotations, config.geometry(), config).unwrap()
    }

    #[test]
    fn test_five_gridlines_with_labels() {
        let m = model(&[100.0, 110.0, 90.0], &[], &PriceChartConfig::default());
        assert_eq!(m.price_ticks.len(), 5);

        let (lo, hi) = m.mapper.domain();
        assert_eq!(m.price_ticks[0].label, format_price(lo, 2));
        assert_eq!(m.price_ticks[4].label, format_price(hi, 2));
        assert!(m.price_ticks[0].position > m.price_ticks[4].position);
    }

    #[test]
    fn test_date_ticks_thinned_with_endpoints() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let m = model(&closes, &[], &PriceChartConfig::default());
        assert_eq!(m.date_ticks.len(), 5);
        assert_eq!(m.date_ticks[0].label, "Jan 01");
        assert_eq!(m.date_ticks[4].label, "Jan 30");
    }

    #[test]
    fn test_insufficient_data_is_placeholder() {
        let config = PriceChartConfig::default();
        let series = PriceSeries::new(points(&[100.0]));
        assert!(PriceChartModel::build(&series, &[], config.geometry(), &config).is_none());

        let one = render_price_chart_svg(&points(&[100.0]), &[], &config);
        let none = render_price_chart_svg(&[], &[], &config);
        assert!(one.contains("No data"));
        assert!(!one.contains("<path"));
        assert_eq!(one, none);
    }

    fn has_path(shapes: &[Shape]) -> bool {
        shapes.iter().any(|s| matches!(s, Shape::Path { .. }))
    }

    fn texts(shapes: &[Shape]) -> Vec<String> {
        shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_status_priority() {
        let failed = Some("offline".to_string());
        assert_eq!(ChartStatus::resolve(true, failed.clone(), true), ChartStatus::Loading);
        assert_eq!(ChartStatus::resolve(true, None, false), ChartStatus::Loading);
        assert_eq!(
            ChartStatus::resolve(false, failed.clone(), true),
            ChartStatus::Failed("offline".to_string())
        );
        assert_eq!(
            ChartStatus::resolve(false, failed, false),
            ChartStatus::Failed("offline".to_string())
        );
        assert_eq!(ChartStatus::resolve(false, None, false), ChartStatus::NoData);
        assert_eq!(ChartStatus::resolve(false, None, true), ChartStatus::Ready);
    }

    #[test]
    fn test_loading_replaces_chart_even_with_error() {
        let config = PriceChartConfig::default();
        let m = model(&[100.0, 110.0, 90.0], &[], &config);
        let geo = config.geometry();

        let status = ChartStatus::resolve(true, Some("offline".to_string()), true);
        let shapes = chart_shapes(&status, Some(&m), &geo);
        assert!(!has_path(&shapes));
        assert_eq!(texts(&shapes), vec!["Loading…".to_string()]);
    }

    #[test]
    fn test_error_is_centered_message_without_geometry() {
        let config = PriceChartConfig::default();
        let m = model(
            &[100.0, 110.0, 90.0],
            &[Annotation::level(LevelKind::Support, 95.0, Strength::Strong)],
            &config,
        );
        let geo = config.geometry();

        let message = Some("Analysis service unavailable".to_string());
        let status = ChartStatus::resolve(false, message, true);
        let shapes = chart_shapes(&status, Some(&m), &geo);
        assert!(!has_path(&shapes));
        assert!(!shapes.iter().any(|s| matches!(s, Shape::Line { .. })));

        let message = shapes.iter().find_map(|s| match s {
            Shape::Text { x, y, content, anchor, .. } => Some((*x, *y, content.clone(), *anchor)),
            _ => None,
        });
        let (x, y, content, anchor) = message.unwrap();
        assert_eq!(content, "Analysis service unavailable");
        assert_eq!(anchor, TextAnchor::Middle);
        assert_eq!(x, geo.center_x());
        assert_eq!(y, geo.height / 2.0);
    }

    #[test]
    fn test_ready_draws_base_then_overlay() {
        let config = PriceChartConfig::default();
        let m = model(
            &[100.0, 110.0, 90.0],
            &[Annotation::level(LevelKind::Resistance, 108.0, Strength::Weak)],
            &config,
        );
        let shapes = chart_shapes(&ChartStatus::Ready, Some(&m), &config.geometry());

        let mut expected = m.base_shapes();
        expected.extend(m.overlay_shapes());
        assert_eq!(shapes, expected);
        assert!(has_path(&shapes));
    }

    #[test]
    fn test_trend_color_and_override() {
        let up = model(&[100.0, 110.0], &[], &PriceChartConfig::default());
        let down = model(&[110.0, 100.0], &[], &PriceChartConfig::default());
        let forced = model(
            &[110.0, 100.0],
            &[],
            &PriceChartConfig {
                positive: Some(true),
                ..PriceChartConfig::default()
            },
        );
        assert_eq!(up.color(), colors::BULL);
        assert_eq!(down.color(), colors::BEAR);
        assert_eq!(forced.color(), colors::BULL);
    }

    #[test]
    fn test_area_is_optional() {
        let with_area = model(&[100.0, 110.0], &[], &PriceChartConfig::default());
        let compact = model(&[100.0, 110.0], &[], &PriceChartConfig::compact());
        assert!(with_area.area.is_some());
        assert!(compact.area.is_none());
    }

    #[test]
    fn test_hover_tooltip_shows_close() {
        let m = model(&[100.0, 110.0, 90.0], &[], &PriceChartConfig::default());
        let index = m.mapper.index_at(m.mapper.x(1)).unwrap();
        assert_eq!(index, 1);

        let texts: Vec<String> = m
            .hover_shapes(index)
            .into_iter()
            .filter_map(|s| match s {
                Shape::Text { content, .. } => Some(content),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"110.00".to_string()));
        assert!(texts.contains(&"Jan 02, 2024".to_string()));
        assert!(texts.contains(&"+10.00 (+10.00%)".to_string()));
    }

    #[test]
    fn test_tooltip_stays_inside_chart() {
        let m = model(&[100.0, 110.0, 90.0], &[], &flat_config(160.0));
        for index in 0..3 {
            for shape in m.tooltip_shapes(index, m.mapper.x(index)) {
                if let Shape::Rect { x, width, .. } = shape {
                    assert!(x >= 0.0 && x + width <= 160.0);
                }
            }
        }
    }

    #[test]
    fn test_resize_doubles_x_keeps_y() {
        let annotations = vec![
            Annotation::event(EventKind::Breakout, "2024-01-03", "Break")
                .with_direction(Direction::Bullish),
            Annotation::level(LevelKind::Support, 95.0, Strength::Strong),
        ];
        let narrow = model(&[100.0, 110.0, 90.0, 105.0], &annotations, &flat_config(400.0));
        let wide = model(&[100.0, 110.0, 90.0, 105.0], &annotations, &flat_config(800.0));

        let a = narrow.mapper.project(&narrow.series);
        let b = wide.mapper.project(&wide.series);
        for ((x1, y1), (x2, y2)) in a.iter().zip(&b) {
            assert!((x2 - 2.0 * x1).abs() < 1e-9);
            assert!((y2 - y1).abs() < 1e-9);
        }

        let (e1, e2) = (&narrow.annotations.events[0], &wide.annotations.events[0]);
        assert!((e2.x - 2.0 * e1.x).abs() < 1e-9);
        assert_eq!(e1.y, e2.y);
        assert_eq!(narrow.annotations.levels[0].y, wide.annotations.levels[0].y);
        assert_eq!(wide.annotations.levels[0].x2, 800.0);
    }

    #[test]
    fn test_annotations_are_additive() {
        let config = PriceChartConfig::default();
        let data = points(&[100.0, 110.0, 90.0]);
        let plain = model(&[100.0, 110.0, 90.0], &[], &config);
        let annotated = model(
            &[100.0, 110.0, 90.0],
            &[Annotation::level(LevelKind::Resistance, 108.0, Strength::Moderate)],
            &config,
        );
        assert_eq!(plain.base_shapes(), annotated.base_shapes());
        assert!(plain.overlay_shapes().is_empty());

        // An event one day past the series changes nothing at all
        let outside = [Annotation::event(EventKind::VolumeSpike, "2024-01-04", "Late")];
        assert_eq!(
            render_price_chart_svg(&data, &[], &config),
            render_price_chart_svg(&data, &outside, &config)
        );
    }

    #[test]
    fn test_no_nan_in_flat_series_output() {
        let config = PriceChartConfig::default();
        let svg = render_price_chart_svg(&points(&[50.0, 50.0, 50.0]), &[], &config);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_event_panel_revealed_on_hover() {
        let m = model(
            &[100.0, 110.0, 90.0],
            &[Annotation::event(EventKind::MomentumShift, "2024-01-02", "Momentum turns higher")],
            &PriceChartConfig::default(),
        );
        let has_description = |shapes: Vec<Shape>| {
            shapes.iter().any(|s| {
                matches!(s, Shape::Text { content, .. } if content.contains("Momentum turns"))
            })
        };
        assert!(has_description(m.hover_shapes(1)));
        assert!(!has_description(m.hover_shapes(0)));
    }
}
