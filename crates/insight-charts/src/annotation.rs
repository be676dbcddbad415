//! Annotation overlay: support/resistance lines and event markers
//!
//! Resolves analysis annotations into positioned markers using the same
//! [`ScaleMapper`] as the base series. The layer never touches base geometry;
//! an empty layer draws nothing.

use crate::{
    chartkit::format_price,
    colors,
    path::PathBuilder,
    scene::{Shape, Stroke, TextAnchor},
    ScaleMapper, ViewportGeometry,
};
use insight_core::{
    Annotation, Direction, EventAnnotation, EventKind, LevelAnnotation, LevelKind, PriceSeries,
    Strength,
};

/// Glyph half-size in pixels
const GLYPH_SIZE: f64 = 6.0;

/// Gap between a marker and its detail panel
const PANEL_GAP: f64 = 10.0;
const PANEL_MAX_WIDTH: f64 = 200.0;
const PANEL_LINE_HEIGHT: f64 = 14.0;
const PANEL_PADDING: f64 = 8.0;
const PANEL_CHARS_PER_LINE: usize = 30;
const PANEL_MAX_DESCRIPTION_LINES: usize = 4;

// ============================================================================
// LEVELS
// ============================================================================

/// Visual weight of a level line, a pure function of strength
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStyle {
    pub width: f64,
    pub dash: Option<&'static str>,
    pub opacity: f64,
}

impl LevelStyle {
    pub fn for_strength(strength: Strength) -> Self {
        match strength {
            Strength::Weak => Self {
                width: 1.0,
                dash: Some("4,4"),
                opacity: 0.4,
            },
            Strength::Moderate => Self {
                width: 1.5,
                dash: Some("8,4"),
                opacity: 0.7,
            },
            Strength::Strong => Self {
                width: 2.0,
                dash: None,
                opacity: 0.95,
            },
        }
    }
}

/// Where a level sits relative to the visible price range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffScale {
    Above,
    Below,
}

impl OffScale {
    fn classify(price: f64, (lo, hi): (f64, f64)) -> Option<Self> {
        if price > hi {
            Some(Self::Above)
        } else if price < lo {
            Some(Self::Below)
        } else {
            None
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Above => "↑",
            Self::Below => "↓",
        }
    }
}

/// Horizontal support/resistance line across the plot
///
/// Levels beyond the visible range are pinned to the nearest plot edge and
/// flagged with [`OffScale`] so their label can say so.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMarker {
    pub kind: LevelKind,
    pub strength: Strength,
    pub price: f64,
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    pub off_scale: Option<OffScale>,
}

impl LevelMarker {
    fn resolve(level: &LevelAnnotation, mapper: &ScaleMapper) -> Option<Self> {
        if !level.price.is_finite() {
            tracing::debug!(price = level.price, "level without a usable price, dropped");
            return None;
        }

        let geo = mapper.geometry();
        let off_scale = OffScale::classify(level.price, mapper.domain());
        let y = mapper.y_clamped(level.price);
        if off_scale.is_some() {
            tracing::debug!(price = level.price, "level beyond visible range, pinned to edge");
        }

        Some(Self {
            kind: level.kind,
            strength: level.strength,
            price: level.price,
            y,
            x1: geo.plot_left(),
            x2: geo.plot_right(),
            off_scale,
        })
    }

    pub fn style(&self) -> LevelStyle {
        LevelStyle::for_strength(self.strength)
    }

    pub fn stroke(&self) -> Stroke {
        let style = self.style();
        let stroke = Stroke::new(self.kind.color(), style.width).opacity(style.opacity);
        match style.dash {
            Some(pattern) => stroke.dashed(pattern),
            None => stroke,
        }
    }

    pub fn label(&self) -> String {
        let label = format!("{} {}", self.kind.label(), format_price(self.price, 2));
        match self.off_scale {
            Some(edge) => format!("{} {}", edge.arrow(), label),
            None => label,
        }
    }

    pub fn shapes(&self) -> Vec<Shape> {
        // Labels of lines pinned to the top edge go below the line
        let label_y = match self.off_scale {
            Some(OffScale::Above) => self.y + 12.0,
            _ => self.y - 4.0,
        };
        vec![
            Shape::line(self.x1, self.y, self.x2, self.y, self.stroke()),
            Shape::text(
                self.x1 + 4.0,
                label_y,
                self.label(),
                TextAnchor::Start,
                self.kind.color(),
                9.0,
            ),
        ]
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// Which side of its marker a detail panel opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    Left,
    Right,
}

impl PanelSide {
    /// Markers past the horizontal midpoint open their panel to the left
    pub fn for_marker(x: f64, geometry: &ViewportGeometry) -> Self {
        if x > geometry.center_x() {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Marker glyph, a pure function of event kind and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    TriangleUp,
    TriangleDown,
    Diamond,
    Stem,
    Ring,
}

impl Glyph {
    pub fn for_event(kind: EventKind, direction: Option<Direction>) -> Self {
        match kind {
            EventKind::Breakout => match direction {
                Some(Direction::Bearish) => Self::TriangleDown,
                _ => Self::TriangleUp,
            },
            EventKind::MomentumShift => Self::Diamond,
            EventKind::VolumeSpike => Self::Stem,
            EventKind::MovingAverageCrossover => Self::Ring,
        }
    }
}

/// Event glyph anchored to one observation
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    pub kind: EventKind,
    pub direction: Option<Direction>,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub price: f64,
    pub date_label: String,
    pub description: String,
    pub color: &'static str,
    pub glyph: Glyph,
    pub side: PanelSide,
}

impl EventMarker {
    fn resolve(
        event: &EventAnnotation,
        series: &PriceSeries,
        mapper: &ScaleMapper,
    ) -> Option<Self> {
        let Some(index) = series.index_of(&event.date) else {
            tracing::debug!(
                date = %event.date,
                kind = ?event.kind,
                "event date not in series, dropped"
            );
            return None;
        };
        let point = series.get(index)?;
        if index >= mapper.point_count() {
            return None;
        }

        let price = event.price.filter(|p| p.is_finite()).unwrap_or(point.close);
        let geo = mapper.geometry();
        let x = mapper.x(index);
        let y = mapper.y_clamped(price);

        Some(Self {
            kind: event.kind,
            direction: event.direction,
            index,
            x,
            y,
            price,
            date_label: point.date_label(),
            description: event.description.clone(),
            color: event.color(),
            glyph: Glyph::for_event(event.kind, event.direction),
            side: PanelSide::for_marker(x, geo),
        })
    }

    pub fn title(&self) -> String {
        match self.direction {
            Some(direction) => format!("{} {}", direction.arrow(), self.kind.label()),
            None => self.kind.label().to_string(),
        }
    }

    /// Glyph drawn at the anchor point
    pub fn glyph_shapes(&self, geometry: &ViewportGeometry) -> Vec<Shape> {
        let (x, y, s) = (self.x, self.y, GLYPH_SIZE);
        let outline = Stroke::new(colors::BG_PANEL, 1.0);

        let path = match self.glyph {
            Glyph::TriangleUp => PathBuilder::new()
                .move_to(x, y - s)
                .line_to(x + s, y + s * 0.8)
                .line_to(x - s, y + s * 0.8)
                .close()
                .build(),
            Glyph::TriangleDown => PathBuilder::new()
                .move_to(x, y + s)
                .line_to(x + s, y - s * 0.8)
                .line_to(x - s, y - s * 0.8)
                .close()
                .build(),
            Glyph::Diamond => PathBuilder::new()
                .move_to(x, y - s)
                .line_to(x + s, y)
                .line_to(x, y + s)
                .line_to(x - s, y)
                .close()
                .build(),
            Glyph::Stem => {
                return vec![
                    Shape::line(
                        x,
                        y,
                        x,
                        geometry.plot_bottom(),
                        Stroke::new(self.color, 2.0).opacity(0.6),
                    ),
                    Shape::dot(x, y, s * 0.6, self.color),
                ];
            }
            Glyph::Ring => {
                return vec![Shape::Circle {
                    cx: x,
                    cy: y,
                    r: s * 0.8,
                    fill: colors::BG_PANEL.to_string(),
                    stroke: Some(Stroke::new(self.color, 2.0)),
                }];
            }
        };

        vec![Shape::Path {
            d: path.to_svg(),
            stroke: Some(outline),
            fill: Some(self.color.to_string()),
        }]
    }

    /// Hover-revealed detail panel, flipped to stay inside the chart
    pub fn panel(&self, geometry: &ViewportGeometry) -> DetailPanel {
        let mut lines = vec![
            self.title(),
            format!("{} · {}", self.date_label, format_price(self.price, 2)),
        ];
        lines.extend(wrap_text(
            &self.description,
            PANEL_CHARS_PER_LINE,
            PANEL_MAX_DESCRIPTION_LINES,
        ));

        let width = PANEL_MAX_WIDTH.min((geometry.width / 2.0 - PANEL_GAP).max(0.0));
        let height = PANEL_PADDING * 2.0 + lines.len() as f64 * PANEL_LINE_HEIGHT;

        let x = match self.side {
            PanelSide::Right => self.x + PANEL_GAP,
            PanelSide::Left => self.x - PANEL_GAP - width,
        };
        let max_y = (geometry.plot_bottom() - height).max(geometry.plot_top());
        let y = (self.y - height / 2.0).clamp(geometry.plot_top(), max_y);

        DetailPanel {
            x,
            y,
            width,
            height,
            side: self.side,
            accent: self.color,
            lines,
        }
    }
}

/// Boxed text panel next to a marker
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub side: PanelSide,
    pub accent: &'static str,
    pub lines: Vec<String>,
}

impl DetailPanel {
    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = vec![Shape::Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            fill: colors::BG_ELEVATED.to_string(),
            stroke: Some(Stroke::new(self.accent, 1.0)),
            rx: 4.0,
        }];

        for (i, line) in self.lines.iter().enumerate() {
            let (fill, size) = if i == 0 {
                (self.accent, 11.0)
            } else {
                (colors::TEXT_PRIMARY, 10.0)
            };
            shapes.push(Shape::text(
                self.x + PANEL_PADDING,
                self.y + PANEL_PADDING + (i as f64 + 0.75) * PANEL_LINE_HEIGHT,
                line.clone(),
                TextAnchor::Start,
                fill,
                size,
            ));
        }

        shapes
    }
}

/// Greedy word wrap; the last kept line gets an ellipsis when text is cut
fn wrap_text(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

// ============================================================================
// LAYER
// ============================================================================

/// All resolved markers for one series/viewport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationLayer {
    pub levels: Vec<LevelMarker>,
    pub events: Vec<EventMarker>,
}

impl AnnotationLayer {
    /// Position every annotation that can be placed; the rest are dropped
    /// one by one without affecting the others.
    pub fn resolve(annotations: &[Annotation], series: &PriceSeries, mapper: &ScaleMapper) -> Self {
        let mut layer = Self::default();

        for annotation in annotations {
            match annotation {
                Annotation::Level(level) => {
                    layer.levels.extend(LevelMarker::resolve(level, mapper))
                }
                Annotation::Event(event) => {
                    layer.events.extend(EventMarker::resolve(event, series, mapper))
                }
            }
        }

        if layer.len() < annotations.len() {
            tracing::debug!(
                placed = layer.len(),
                supplied = annotations.len(),
                "some annotations could not be placed"
            );
        }
        layer
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty() && self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len() + self.events.len()
    }

    /// Level lines then event glyphs (panels are hover-only)
    pub fn shapes(&self, geometry: &ViewportGeometry) -> Vec<Shape> {
        self.levels
            .iter()
            .flat_map(LevelMarker::shapes)
            .chain(self.events.iter().flat_map(|e| e.glyph_shapes(geometry)))
            .collect()
    }
}
