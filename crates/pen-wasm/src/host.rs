//! Browser implementations of the host capabilities
//!
//! Every DOM callback holds only a `Weak` handle to the controller, so the
//! controller owns its listeners and nothing keeps it alive behind its back.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sparkle_pen_config::{SURFACE_ELEMENT_ID, SURFACE_Z_INDEX};
use sparkles::{
    FrameHandle, FrameScheduler, HostError, OverlaySurface, PenController, PointerSource,
    SparkleCanvas, SurfaceHost,
};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, Window};

/// Controller wired to the page
pub type WebPen = PenController<WebSurfaceHost, WebPointerSource, WebFrameScheduler>;

/// Shared handle the binding and the bridge hold on to
pub type SharedPen = Rc<RefCell<WebPen>>;

/// Inline style of the overlay canvas
pub fn overlay_style() -> [(&'static str, String); 7] {
    [
        ("position", "fixed".to_string()),
        ("top", "0".to_string()),
        ("left", "0".to_string()),
        ("width", "100vw".to_string()),
        ("height", "100vh".to_string()),
        ("z-index", SURFACE_Z_INDEX.to_string()),
        ("pointer-events", "none".to_string()),
    ]
}

/// Build a controller whose hosts call back into it
pub fn create_pen(window: Window, seed: u64) -> Result<SharedPen, HostError> {
    let document = window.document().ok_or(HostError::DocumentUnavailable)?;

    Ok(Rc::new_cyclic(|weak: &Weak<RefCell<WebPen>>| {
        RefCell::new(PenController::new(
            WebSurfaceHost::new(window.clone(), document.clone(), weak.clone()),
            WebPointerSource::new(document, weak.clone()),
            WebFrameScheduler::new(window, weak.clone()),
            seed,
        ))
    }))
}

/// Run `f` against the controller if it is still alive and not borrowed
pub(crate) fn with_pen(pen: &Weak<RefCell<WebPen>>, f: impl FnOnce(&mut WebPen)) {
    let Some(pen) = pen.upgrade() else {
        return;
    };
    match pen.try_borrow_mut() {
        Ok(mut pen) => f(&mut pen),
        Err(_) => debug!("Sparkle Pen busy, dropping callback"),
    }
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

// ----------------------------------------------------------------------
// Surface
// ----------------------------------------------------------------------

/// Overlay canvas element and its 2D context
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl SparkleCanvas for WebSurface {
    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.context.set_global_alpha(alpha);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.context.set_fill_style_str(style);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.context.set_stroke_style_str(style);
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        // Only fails for a negative radius, which sampling never produces
        let _ = self.context.arc(x, y, radius, start_angle, end_angle);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }
}

impl OverlaySurface for WebSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

/// Creates the overlay canvas in `document.body` and tracks window resizes
pub struct WebSurfaceHost {
    window: Window,
    document: Document,
    on_resize: Closure<dyn FnMut()>,
}

impl WebSurfaceHost {
    fn new(window: Window, document: Document, pen: Weak<RefCell<WebPen>>) -> Self {
        let on_resize = Closure::wrap(Box::new(move || {
            with_pen(&pen, |pen| pen.on_resize());
        }) as Box<dyn FnMut()>);

        Self {
            window,
            document,
            on_resize,
        }
    }
}

impl SurfaceHost for WebSurfaceHost {
    type Surface = WebSurface;

    fn create_surface(&mut self) -> Result<WebSurface, HostError> {
        let body = self.document.body().ok_or(HostError::DocumentUnavailable)?;

        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| HostError::SurfaceCreation(js_error(e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::SurfaceCreation("element is not a canvas".to_string()))?;
        canvas.set_id(SURFACE_ELEMENT_ID);

        let style = canvas.style();
        for (property, value) in overlay_style() {
            style
                .set_property(property, &value)
                .map_err(|e| HostError::SurfaceCreation(js_error(e)))?;
        }

        let context = canvas
            .get_context("2d")
            .map_err(|e| HostError::SurfaceCreation(js_error(e)))?
            .ok_or(HostError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::ContextUnavailable)?;

        body.append_child(&canvas)
            .map_err(|e| HostError::SurfaceCreation(js_error(e)))?;

        Ok(WebSurface { canvas, context })
    }

    fn destroy_surface(&mut self, surface: WebSurface) {
        surface.canvas.remove();
    }

    fn viewport(&self) -> (u32, u32) {
        let dimension = |value: Result<JsValue, JsValue>| {
            value
                .ok()
                .and_then(|v| v.as_f64())
                .map(|v| v.max(0.0) as u32)
                .unwrap_or(0)
        };
        (
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn watch_resize(&mut self) -> Result<(), HostError> {
        self.window
            .add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
            .map_err(|e| HostError::Listener(js_error(e)))
    }

    fn unwatch_resize(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
    }
}

// ----------------------------------------------------------------------
// Pointer
// ----------------------------------------------------------------------

/// `mousemove` listener on the document
pub struct WebPointerSource {
    document: Document,
    on_move: Closure<dyn FnMut(MouseEvent)>,
}

impl WebPointerSource {
    fn new(document: Document, pen: Weak<RefCell<WebPen>>) -> Self {
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = (event.client_x() as f64, event.client_y() as f64);
            with_pen(&pen, |pen| {
                pen.on_pointer_move(x, y);
            });
        }) as Box<dyn FnMut(MouseEvent)>);

        Self { document, on_move }
    }
}

impl PointerSource for WebPointerSource {
    fn attach(&mut self) -> Result<(), HostError> {
        self.document
            .add_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref())
            .map_err(|e| HostError::Listener(js_error(e)))
    }

    fn detach(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref());
    }
}

// ----------------------------------------------------------------------
// Frames
// ----------------------------------------------------------------------

/// `requestAnimationFrame` with one reusable callback
pub struct WebFrameScheduler {
    window: Window,
    on_frame: Closure<dyn FnMut(f64)>,
}

impl WebFrameScheduler {
    fn new(window: Window, pen: Weak<RefCell<WebPen>>) -> Self {
        let on_frame = Closure::wrap(Box::new(move |_timestamp: f64| {
            with_pen(&pen, |pen| {
                pen.on_frame();
            });
        }) as Box<dyn FnMut(f64)>);

        Self { window, on_frame }
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        self.window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| HostError::FrameRequest(js_error(e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_style_is_non_interactive_and_on_top() {
        let style = overlay_style();
        assert!(style.contains(&("pointer-events", "none".to_string())));
        assert!(style.contains(&("position", "fixed".to_string())));
        assert!(style.contains(&("z-index", "99999".to_string())));
    }
}
