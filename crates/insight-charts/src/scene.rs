//! Drawing primitives and the surface adapter
//!
//! Chart models emit [`Shape`]s into a [`Surface`]. The Leptos components draw
//! them as reactive SVG nodes, [`SvgSurface`] writes a standalone document and
//! `Vec<Shape>` simply records them.

use crate::path::Path;
use std::fmt::Write;

/// Font stack used for every chart label
pub const CHART_FONT: &str = "JetBrains Mono, monospace";

/// Stroke paint
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub dash: Option<&'static str>,
    pub opacity: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            dash: None,
            opacity: 1.0,
        }
    }

    pub fn dashed(mut self, pattern: &'static str) -> Self {
        self.dash = Some(pattern);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// One drawable primitive in chart pixel space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path {
        d: String,
        stroke: Option<Stroke>,
        fill: Option<String>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
        stroke: Option<Stroke>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<Stroke>,
        rx: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: TextAnchor,
        fill: String,
        size: f64,
    },
}

impl Shape {
    pub fn stroked_path(path: &Path, stroke: Stroke) -> Self {
        Self::Path {
            d: path.to_svg(),
            stroke: Some(stroke),
            fill: None,
        }
    }

    pub fn filled_path(path: &Path, fill: impl Into<String>) -> Self {
        Self::Path {
            d: path.to_svg(),
            stroke: None,
            fill: Some(fill.into()),
        }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) -> Self {
        Self::Line { x1, y1, x2, y2, stroke }
    }

    pub fn dot(cx: f64, cy: f64, r: f64, fill: impl Into<String>) -> Self {
        Self::Circle {
            cx,
            cy,
            r,
            fill: fill.into(),
            stroke: None,
        }
    }

    pub fn text(
        x: f64,
        y: f64,
        content: impl Into<String>,
        anchor: TextAnchor,
        fill: impl Into<String>,
        size: f64,
    ) -> Self {
        Self::Text {
            x,
            y,
            content: content.into(),
            anchor,
            fill: fill.into(),
            size,
        }
    }
}

// ============================================================================
// SURFACE ADAPTER
// ============================================================================

/// Anything chart shapes can be drawn onto
pub trait Surface {
    fn draw(&mut self, shape: &Shape);

    fn draw_all(&mut self, shapes: &[Shape]) {
        for shape in shapes {
            self.draw(shape);
        }
    }
}

/// Recording surface
impl Surface for Vec<Shape> {
    fn draw(&mut self, shape: &Shape) {
        self.push(shape.clone());
    }
}

/// Writes shapes as a standalone SVG document
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    class: &'static str,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            class: "insight-chart",
            body: String::with_capacity(4096),
        }
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = class;
        self
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="{}" viewBox="0 0 {w} {h}" width="{w}" height="{h}">{}</svg>"#,
            self.class,
            self.body,
            w = self.width,
            h = self.height,
        )
    }

    fn stroke_attrs(&mut self, stroke: Option<&Stroke>) {
        let Some(stroke) = stroke else {
            return;
        };
        // Writing into a String cannot fail
        let _ = write!(
            self.body,
            r#" stroke="{}" stroke-width="{}""#,
            stroke.color, stroke.width
        );
        if let Some(dash) = stroke.dash {
            let _ = write!(self.body, r#" stroke-dasharray="{}""#, dash);
        }
        if stroke.opacity < 1.0 {
            let _ = write!(self.body, r#" stroke-opacity="{}""#, stroke.opacity);
        }
    }
}

impl Surface for SvgSurface {
    fn draw(&mut self, shape: &Shape) {
        match shape {
            Shape::Path { d, stroke, fill } => {
                let _ = write!(
                    self.body,
                    r#"<path d="{}" fill="{}""#,
                    d,
                    fill.as_deref().unwrap_or("none")
                );
                self.stroke_attrs(stroke.as_ref());
                self.body.push_str(" />");
            }
            Shape::Line { x1, y1, x2, y2, stroke } => {
                let _ = write!(
                    self.body,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                    x1, y1, x2, y2
                );
                self.stroke_attrs(Some(stroke));
                self.body.push_str(" />");
            }
            Shape::Circle { cx, cy, r, fill, stroke } => {
                let _ = write!(
                    self.body,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}""#,
                    cx, cy, r, fill
                );
                self.stroke_attrs(stroke.as_ref());
                self.body.push_str(" />");
            }
            Shape::Rect { x, y, width, height, fill, stroke, rx } => {
                let _ = write!(
                    self.body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}""#,
                    x, y, width, height, rx, fill
                );
                self.stroke_attrs(stroke.as_ref());
                self.body.push_str(" />");
            }
            Shape::Text { x, y, content, anchor, fill, size } => {
                let _ = write!(
                    self.body,
                    r#"<text x="{}" y="{}" text-anchor="{}" fill="{}" font-size="{}" font-family="{}">{}</text>"#,
                    x,
                    y,
                    anchor.as_str(),
                    fill,
                    size,
                    CHART_FONT,
                    escape_text(content)
                );
            }
        }
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::line_path;

    #[test]
    fn test_recording_surface() {
        let mut shapes: Vec<Shape> = Vec::new();
        shapes.draw(&Shape::dot(1.0, 2.0, 3.0, "red"));
        shapes.draw_all(&[Shape::line(0.0, 0.0, 1.0, 1.0, Stroke::new("blue", 1.0))]);
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn test_svg_surface_output() {
        let mut svg = SvgSurface::new(100.0, 50.0);
        svg.draw(&Shape::stroked_path(
            &line_path(&[(0.0, 0.0), (10.0, 5.5)]),
            Stroke::new("#fff", 1.5).dashed("4,4").opacity(0.5),
        ));
        svg.draw(&Shape::text(5.0, 5.0, "P&L <up>", TextAnchor::End, "#888", 10.0));
        let doc = svg.finish();

        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"viewBox="0 0 100 50""#));
        assert!(doc.contains(
            r##"d="M0,0L10,5.5" fill="none" stroke="#fff" stroke-width="1.5" stroke-dasharray="4,4" stroke-opacity="0.5""##
        ));
        assert!(doc.contains("P&amp;L &lt;up&gt;"));
        assert!(doc.contains(r#"text-anchor="end""#));
    }

    #[test]
    fn test_solid_opaque_stroke_has_no_extra_attrs() {
        let mut svg = SvgSurface::new(10.0, 10.0);
        svg.draw(&Shape::line(0.0, 1.0, 10.0, 1.0, Stroke::new("#000", 2.0)));
        let doc = svg.finish();
        assert!(!doc.contains("stroke-dasharray"));
        assert!(!doc.contains("stroke-opacity"));
    }
}
