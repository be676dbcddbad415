//! Browser bindings: container resize observation, pointer position and the
//! reactive SVG surface
//!
//! Everything here touches the DOM; the geometry it feeds is computed in
//! `chartkit` and `interaction`.

use crate::{
    interaction::ResizeCoalescer,
    scene::{Shape, Stroke, Surface, CHART_FONT},
};
use leptos::{html, prelude::*};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, PointerEvent, ResizeObserver, ResizeObserverEntry};

// ============================================================================
// RESIZE OBSERVATION
// ============================================================================

#[derive(Default)]
struct FrameState {
    coalescer: ResizeCoalescer,
    frame_id: Option<i32>,
}

/// Live `ResizeObserver` subscription.
///
/// Notifications are coalesced into at most one callback per animation frame.
/// Dropping the handle disconnects the observer and cancels a pending frame.
pub struct ResizeHandle {
    observer: ResizeObserver,
    state: Rc<RefCell<FrameState>>,
    _on_resize: Closure<dyn FnMut(js_sys::Array)>,
    _on_frame: Rc<Closure<dyn FnMut(f64)>>,
}

impl ResizeHandle {
    pub fn observe(
        element: &Element,
        on_size: impl Fn(f64, f64) + 'static,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let state = Rc::new(RefCell::new(FrameState::default()));

        let on_frame = {
            let state = Rc::clone(&state);
            Rc::new(Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                let latest = {
                    let mut state = state.borrow_mut();
                    state.frame_id = None;
                    state.coalescer.take()
                };
                if let Some((width, height)) = latest {
                    on_size(width, height);
                }
            }))
        };

        let on_resize = {
            let state = Rc::clone(&state);
            let on_frame = Rc::clone(&on_frame);
            Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                let last = entries.length().saturating_sub(1);
                let Ok(entry) = entries.get(last).dyn_into::<ResizeObserverEntry>() else {
                    return;
                };
                let rect = entry.content_rect();

                let mut state = state.borrow_mut();
                if !state.coalescer.push(rect.width(), rect.height()) {
                    return;
                }
                let frame: &Closure<dyn FnMut(f64)> = &on_frame;
                match window.request_animation_frame(frame.as_ref().unchecked_ref()) {
                    Ok(id) => state.frame_id = Some(id),
                    Err(err) => {
                        tracing::warn!(?err, "requestAnimationFrame failed, resize dropped");
                        state.coalescer.take();
                    }
                }
            })
        };

        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(element);

        Ok(Self {
            observer,
            state,
            _on_resize: on_resize,
            _on_frame: on_frame,
        })
    }
}

impl Drop for ResizeHandle {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Some(id) = self.state.borrow_mut().frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

/// Track the rendered size of a container element.
///
/// Starts at `fallback` and follows the element once it is mounted. Zero-sized
/// reports (hidden containers) are ignored. The observer is released when the
/// owning component is cleaned up.
pub fn use_container_size(
    node: NodeRef<html::Div>,
    fallback: (f64, f64),
) -> ReadSignal<(f64, f64)> {
    let (size, set_size) = signal(fallback);
    let handle = StoredValue::new_local(None::<ResizeHandle>);

    Effect::new(move |_| {
        let Some(element) = node.get() else {
            return;
        };

        let observed = ResizeHandle::observe(&element, move |width, height| {
            if width > 0.0 && height > 0.0 {
                set_size.set((width, height));
            }
        });
        match observed {
            Ok(observer) => handle.set_value(Some(observer)),
            Err(err) => tracing::warn!(?err, "resize observer unavailable, keeping fallback size"),
        }
    });

    on_cleanup(move || {
        let _ = handle.try_set_value(None);
    });

    size
}

// ============================================================================
// POINTER POSITION
// ============================================================================

/// Convert a client x coordinate into SVG user space for a drawing whose
/// viewBox is `view_width` wide and rendered `rect_width` pixels wide.
pub fn client_to_view(
    client_x: f64,
    rect_left: f64,
    rect_width: f64,
    view_width: f64,
) -> Option<f64> {
    if rect_width <= 0.0 || !rect_width.is_finite() || !client_x.is_finite() {
        return None;
    }
    Some((client_x - rect_left) * view_width / rect_width)
}

/// Pointer x in SVG user space of the element the handler is attached to
pub fn pointer_x(ev: &PointerEvent, view_width: f64) -> Option<f64> {
    let target = ev.current_target()?.dyn_into::<Element>().ok()?;
    let rect = target.get_bounding_client_rect();
    client_to_view(ev.client_x() as f64, rect.left(), rect.width(), view_width)
}

// ============================================================================
// REACTIVE SVG SURFACE
// ============================================================================

type StrokeParts = (Option<String>, Option<f64>, Option<&'static str>, Option<f64>);

fn stroke_parts(stroke: Option<&Stroke>) -> StrokeParts {
    match stroke {
        Some(stroke) => (
            Some(stroke.color.clone()),
            Some(stroke.width),
            stroke.dash,
            (stroke.opacity < 1.0).then_some(stroke.opacity),
        ),
        None => (None, None, None, None),
    }
}

/// One shape as an SVG view node
pub fn shape_view(shape: Shape) -> AnyView {
    match shape {
        Shape::Path { d, stroke, fill } => {
            let (color, width, dash, opacity) = stroke_parts(stroke.as_ref());
            view! {
                <path
                    d=d
                    fill=fill.unwrap_or_else(|| "none".to_string())
                    stroke=color
                    stroke-width=width
                    stroke-dasharray=dash
                    stroke-opacity=opacity
                    stroke-linecap="round"
                    stroke-linejoin="round"
                />
            }
            .into_any()
        }
        Shape::Line { x1, y1, x2, y2, stroke } => {
            let (color, width, dash, opacity) = stroke_parts(Some(&stroke));
            view! {
                <line
                    x1=x1
                    y1=y1
                    x2=x2
                    y2=y2
                    stroke=color
                    stroke-width=width
                    stroke-dasharray=dash
                    stroke-opacity=opacity
                />
            }
            .into_any()
        }
        Shape::Circle { cx, cy, r, fill, stroke } => {
            let (color, width, _, _) = stroke_parts(stroke.as_ref());
            view! { <circle cx=cx cy=cy r=r fill=fill stroke=color stroke-width=width /> }
                .into_any()
        }
        Shape::Rect { x, y, width, height, fill, stroke, rx } => {
            let (color, stroke_width, _, _) = stroke_parts(stroke.as_ref());
            view! {
                <rect
                    x=x
                    y=y
                    width=width
                    height=height
                    rx=rx
                    fill=fill
                    stroke=color
                    stroke-width=stroke_width
                />
            }
            .into_any()
        }
        Shape::Text { x, y, content, anchor, fill, size } => view! {
            <text
                x=x
                y=y
                text-anchor=anchor.as_str()
                fill=fill
                font-size=size
                font-family=CHART_FONT
            >
                {content}
            </text>
        }
        .into_any(),
    }
}

/// Shapes as a list of SVG view nodes, in draw order
pub fn shapes_view(shapes: Vec<Shape>) -> impl IntoView {
    shapes.into_iter().map(shape_view).collect_view()
}

/// Surface that builds Leptos view nodes
#[derive(Default)]
pub struct ViewSurface {
    nodes: Vec<AnyView>,
}

impl ViewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_view(self) -> impl IntoView {
        self.nodes
    }
}

impl Surface for ViewSurface {
    fn draw(&mut self, shape: &Shape) {
        self.nodes.push(shape_view(shape.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_view_scales_to_viewbox() {
        // 400-wide viewBox rendered at 200px, 50px from the viewport edge
        assert_eq!(client_to_view(150.0, 50.0, 200.0, 400.0), Some(200.0));
        assert_eq!(client_to_view(50.0, 50.0, 200.0, 400.0), Some(0.0));
    }

    #[test]
    fn test_client_to_view_unrendered() {
        assert_eq!(client_to_view(10.0, 0.0, 0.0, 400.0), None);
        assert_eq!(client_to_view(f64::NAN, 0.0, 100.0, 400.0), None);
    }

    #[test]
    fn test_stroke_parts() {
        let stroke = Stroke::new("#fff", 2.0).dashed("4,4");
        let (color, width, dash, opacity) = stroke_parts(Some(&stroke));
        assert_eq!(color.as_deref(), Some("#fff"));
        assert_eq!(width, Some(2.0));
        assert_eq!(dash, Some("4,4"));
        assert_eq!(opacity, None);
        assert_eq!(stroke_parts(None).0, None);
    }
}
