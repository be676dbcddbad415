//! Pointer and resize handling for one chart instance
//!
//! Pure state machines; the DOM wiring lives in `surface`.

use crate::{ScaleMapper, ViewportGeometry};
use insight_core::PriceSeries;

/// Which observation (if any) the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(usize),
}

impl HoverState {
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Hovering(index) => Some(*index),
        }
    }
}

/// Input device behind a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl From<&str> for PointerKind {
    /// Maps `PointerEvent.pointerType`; unknown values count as mouse
    fn from(raw: &str) -> Self {
        match raw {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }
}

/// Hover tracking against the current series and viewport.
///
/// Owns the viewport geometry so every derived mapper is rebuilt from a single
/// source when either the data or the container size changes.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    geometry: ViewportGeometry,
    mapper: Option<ScaleMapper>,
    hover: HoverState,
}

impl InteractionController {
    pub fn new(geometry: ViewportGeometry) -> Self {
        Self {
            geometry,
            mapper: None,
            hover: HoverState::Idle,
        }
    }

    /// New data: rebuild the mapper and drop any hover
    pub fn set_series(&mut self, series: &PriceSeries) {
        self.mapper = ScaleMapper::for_series(series, self.geometry);
        self.hover = HoverState::Idle;
    }

    /// Apply a container size. Returns false when nothing changed.
    ///
    /// Hover survives a resize as long as the index is still valid.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let geometry = self.geometry.resized(width, height);
        if geometry == self.geometry {
            return false;
        }

        tracing::trace!(width = geometry.width, height = geometry.height, "chart resized");
        self.geometry = geometry;
        self.mapper = self.mapper.map(|m| m.with_geometry(geometry));

        if let HoverState::Hovering(index) = self.hover {
            let count = self.mapper.map_or(0, |m| m.point_count());
            if index >= count {
                self.hover = HoverState::Idle;
            }
        }
        true
    }

    /// Pointer moved to pixel `x` (SVG user space)
    pub fn pointer_move(&mut self, x: f64) -> Option<usize> {
        let index = self.mapper.as_ref().and_then(|m| m.index_at(x));
        self.hover = match index {
            Some(index) => HoverState::Hovering(index),
            None => HoverState::Idle,
        };
        index
    }

    /// Pointer left the chart. Touch "leave" is ignored so a tap keeps its
    /// tooltip until the next tap.
    pub fn pointer_leave(&mut self, kind: PointerKind) {
        if kind != PointerKind::Touch {
            self.hover = HoverState::Idle;
        }
    }

    pub fn clear(&mut self) {
        self.hover = HoverState::Idle;
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.index()
    }

    pub fn mapper(&self) -> Option<&ScaleMapper> {
        self.mapper.as_ref()
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }
}

/// Collapses bursts of resize notifications into one update per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeCoalescer {
    latest: Option<(f64, f64)>,
    scheduled: bool,
}

impl ResizeCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a size. Returns true when the caller must schedule a flush.
    pub fn push(&mut self, width: f64, height: f64) -> bool {
        self.latest = Some((width, height));
        if self.scheduled {
            false
        } else {
            self.scheduled = true;
            true
        }
    }

    /// Flush: the most recent size since the last flush
    pub fn take(&mut self) -> Option<(f64, f64)> {
        self.scheduled = false;
        self.latest.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}
