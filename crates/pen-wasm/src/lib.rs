//! Sparkle Pen WASM Build
//!
//! This crate runs the sparkle engine inside a page as the extension's
//! content script. The extension forwards popup commands either through
//! [`SparklePen::handle_message`] or as window CustomEvents (see [`bridge`]).

use std::rc::Rc;

use tracing::info;
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod host;

use host::SharedPen;

/// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default();
}

/// Per-page sparkle pen, inactive until an `activatePen` command arrives
#[wasm_bindgen]
pub struct SparklePen {
    pen: SharedPen,
}

#[wasm_bindgen]
impl SparklePen {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<SparklePen, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

        let pen = host::create_pen(window.clone(), random_seed())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        bridge::init_bridge(&window, Rc::downgrade(&pen))?;

        info!("Sparkle Pen content script loaded");
        Ok(Self { pen })
    }

    /// Handle one JSON command and return the JSON response
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, json: &str) -> String {
        bridge::reply_to(&self.pen, json)
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.pen.try_borrow().is_ok_and(|pen| pen.is_active())
    }
}

impl Drop for SparklePen {
    fn drop(&mut self) {
        // Listeners must not outlive the closures they point at
        if let Ok(mut pen) = self.pen.try_borrow_mut() {
            pen.deactivate();
        }
    }
}

/// 64 random bits from the page's `Math.random`
fn random_seed() -> u64 {
    let half = || (js_sys::Math::random() * u32::MAX as f64) as u64;
    (half() << 32) | half()
}
