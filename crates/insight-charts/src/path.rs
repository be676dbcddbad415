//! SVG path construction
//!
//! Paths are kept as structured commands so they can be evaluated as well as
//! serialized. Coordinates are written at full `f64` precision; rounding is a
//! display concern and never happens here.

use std::fmt::{self, Write};

/// Smoothing factor for Catmull-Rom derived control points
pub const DEFAULT_SMOOTHING: f64 = 0.2;

// ============================================================================
// PATH COMMANDS
// ============================================================================

/// Single SVG path command (absolute coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    VerticalTo(f64),
    CubicTo {
        c1: (f64, f64),
        c2: (f64, f64),
        to: (f64, f64),
    },
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MoveTo(x, y) => write!(f, "M{},{}", x, y),
            Self::LineTo(x, y) => write!(f, "L{},{}", x, y),
            Self::VerticalTo(y) => write!(f, "V{}", y),
            Self::CubicTo { c1, c2, to } => write!(
                f,
                "C{},{},{},{},{},{}",
                c1.0, c1.1, c2.0, c2.1, to.0, to.1
            ),
            Self::Close => f.write_char('Z'),
        }
    }
}

/// Point on a cubic bezier at parameter `t`
pub fn cubic_point(
    p0: (f64, f64),
    c1: (f64, f64),
    c2: (f64, f64),
    p1: (f64, f64),
    t: f64,
) -> (f64, f64) {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
        a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
    )
}

fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

// ============================================================================
// PATH
// ============================================================================

/// Built path: an ordered list of commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SVG `d` attribute
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    /// Evaluate command `segment` at `t` in `[0, 1]`.
    ///
    /// `MoveTo` yields its own point; `Close` runs back to the subpath start.
    pub fn point_at(&self, segment: usize, t: f64) -> Option<(f64, f64)> {
        let t = t.clamp(0.0, 1.0);
        let mut current = (0.0, 0.0);
        let mut start = (0.0, 0.0);

        for (i, command) in self.commands.iter().enumerate() {
            let from = current;
            let (point, end) = match *command {
                PathCommand::MoveTo(x, y) => {
                    start = (x, y);
                    ((x, y), (x, y))
                }
                PathCommand::LineTo(x, y) => (lerp(from, (x, y), t), (x, y)),
                PathCommand::VerticalTo(y) => (lerp(from, (from.0, y), t), (from.0, y)),
                PathCommand::CubicTo { c1, c2, to } => (cubic_point(from, c1, c2, to, t), to),
                PathCommand::Close => (lerp(from, start, t), start),
            };

            if i == segment {
                return Some(point);
            }
            current = end;
        }

        None
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(32),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    pub fn vertical_to(mut self, y: f64) -> Self {
        self.commands.push(PathCommand::VerticalTo(y));
        self
    }

    pub fn cubic_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::CubicTo {
            c1: (x1, y1),
            c2: (x2, y2),
            to: (x, y),
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        Path {
            commands: self.commands,
        }
    }
}

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> Path;
}

/// Straight segments between consecutive points
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> Path {
        let Some((&(x, y), rest)) = points.split_first() else {
            return Path::default();
        };

        rest.iter()
            .fold(PathBuilder::new().move_to(x, y), |b, &(x, y)| b.line_to(x, y))
            .build()
    }
}

/// Line path closed down to a baseline, fillable
#[derive(Debug, Clone)]
pub struct AreaPath {
    pub baseline: f64,
}

impl PathGenerator for AreaPath {
    fn generate(&self, points: &[(f64, f64)]) -> Path {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return Path::default();
        };

        rest.iter()
            .fold(
                PathBuilder::new().move_to(x0, self.baseline).line_to(x0, y0),
                |b, &(x, y)| b.line_to(x, y),
            )
            .vertical_to(self.baseline)
            .close()
            .build()
    }
}

/// Catmull-Rom derived cubic bezier through every point.
///
/// Each control point sits `smoothing * (next - previous)` away from its knot,
/// so incoming and outgoing tangents match at every interior knot. End points
/// stand in for their own missing neighbor.
#[derive(Debug, Clone)]
pub struct SmoothPath {
    pub smoothing: f64,
}

impl Default for SmoothPath {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

impl PathGenerator for SmoothPath {
    fn generate(&self, points: &[(f64, f64)]) -> Path {
        let Some(&(x0, y0)) = points.first() else {
            return Path::default();
        };

        let s = self.smoothing;
        let mut builder = PathBuilder::new().move_to(x0, y0);

        for i in 1..points.len() {
            let before = points[i.saturating_sub(2)];
            let prev = points[i - 1];
            let cur = points[i];
            let next = points.get(i + 1).copied().unwrap_or(cur);

            let c1 = (prev.0 + s * (cur.0 - before.0), prev.1 + s * (cur.1 - before.1));
            let c2 = (cur.0 - s * (next.0 - prev.0), cur.1 - s * (next.1 - prev.1));

            builder = builder.cubic_to(c1.0, c1.1, c2.0, c2.1, cur.0, cur.1);
        }

        builder.build()
    }
}

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> Path {
    LinePath.generate(points)
}

/// Generate closed area path with baseline
pub fn area_path(points: &[(f64, f64)], baseline: f64) -> Path {
    AreaPath { baseline }.generate(points)
}

/// Generate smoothed path with the given smoothing factor
pub fn smooth_path(points: &[(f64, f64)], smoothing: f64) -> Path {
    SmoothPath { smoothing }.generate(points)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const KNOTS: [(f64, f64); 6] = [
        (0.0, 50.0),
        (33.3, 12.5),
        (71.9, 88.1),
        (100.0, 40.0),
        (140.25, 40.0),
        (180.0, 3.75),
    ];

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert_eq!(path.to_svg(), "M0,0L100,100Z");
    }

    #[test]
    fn test_full_precision_serialization() {
        let path = PathBuilder::new().move_to(1.0 / 3.0, 2.5).build();
        assert_eq!(path.to_svg(), format!("M{},2.5", 1.0_f64 / 3.0));
        assert!(path.to_svg().len() > 10);
    }

    #[test]
    fn test_line_path_generator() {
        let path = line_path(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        assert_eq!(path.to_svg(), "M0,0L50,50L100,0");
        assert!(line_path(&[]).is_empty());
    }

    #[test]
    fn test_area_path_closes_on_baseline() {
        let path = area_path(&[(10.0, 20.0), (30.0, 5.0)], 100.0);
        assert_eq!(path.to_svg(), "M10,100L10,20L30,5V100Z");
        assert_eq!(path.point_at(4, 1.0), Some((10.0, 100.0)));
    }

    #[test]
    fn test_smooth_path_passes_through_knots() {
        let path = smooth_path(&KNOTS, DEFAULT_SMOOTHING);
        assert_eq!(path.commands().len(), KNOTS.len());

        for (segment, &knot) in KNOTS.iter().enumerate() {
            let (x, y) = path.point_at(segment, 1.0).unwrap();
            assert!((x - knot.0).abs() < 1e-6 && (y - knot.1).abs() < 1e-6, "knot {segment}");
        }
        for segment in 1..KNOTS.len() {
            let (x, y) = path.point_at(segment, 0.0).unwrap();
            let knot = KNOTS[segment - 1];
            assert!((x - knot.0).abs() < 1e-6 && (y - knot.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_smooth_path_tangent_continuity() {
        let path = smooth_path(&KNOTS, DEFAULT_SMOOTHING);
        let commands = path.commands();

        for i in 1..commands.len() - 1 {
            let (PathCommand::CubicTo { c2, to, .. }, PathCommand::CubicTo { c1: next_c1, .. }) =
                (commands[i], commands[i + 1])
            else {
                panic!("expected cubic segments");
            };

            let incoming = (to.0 - c2.0, to.1 - c2.1);
            let outgoing = (next_c1.0 - to.0, next_c1.1 - to.1);
            assert!((incoming.0 - outgoing.0).abs() < 1e-9);
            assert!((incoming.1 - outgoing.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smooth_path_control_points() {
        let path = smooth_path(&[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)], 0.2);
        assert_eq!(
            path.commands()[1],
            PathCommand::CubicTo {
                c1: (2.0, 2.0),
                c2: (6.0, 10.0),
                to: (10.0, 10.0),
            }
        );
        assert_eq!(
            path.commands()[2],
            PathCommand::CubicTo {
                c1: (14.0, 10.0),
                c2: (18.0, 2.0),
                to: (20.0, 0.0),
            }
        );
    }

    #[test]
    fn test_smooth_path_degenerate_inputs() {
        assert!(smooth_path(&[], 0.2).is_empty());
        assert_eq!(smooth_path(&[(3.0, 4.0)], 0.2).to_svg(), "M3,4");
    }

    #[test]
    fn test_point_at_out_of_range() {
        let path = line_path(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(path.point_at(1, 0.5), Some((5.0, 0.0)));
        assert_eq!(path.point_at(2, 0.5), None);
    }
}
