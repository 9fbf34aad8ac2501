//! JavaScript bridge for extension messaging
//!
//! The extension's content script forwards runtime messages as CustomEvents
//! on the window object. Each command event is answered with a response
//! event carrying the JSON reply.

use std::cell::RefCell;
use std::rc::Weak;

use sparkle_pen_ipc::{ErrorResponse, PenResponse, response_json};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::host::WebPen;

/// Event carrying a JSON command to the pen
pub const COMMAND_EVENT: &str = "sparkle-pen:command";

/// Event carrying the JSON reply back to the extension
pub const RESPONSE_EVENT: &str = "sparkle-pen:response";

/// Listen for command events and answer each one
pub fn init_bridge(window: &web_sys::Window, pen: Weak<RefCell<WebPen>>) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |event: web_sys::CustomEvent| {
        let Some(detail) = event.detail().as_string() else {
            warn!("Ignoring {} without a string detail", COMMAND_EVENT);
            return;
        };

        let Some(pen) = pen.upgrade() else {
            debug!("Sparkle Pen dropped, ignoring command");
            return;
        };

        // The borrow ends before dispatching so listeners may call back in
        let reply = reply_to(&pen, &detail);

        if let Some(window) = web_sys::window() {
            send_response(&window, &reply);
        }
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback(COMMAND_EVENT, closure.as_ref().unchecked_ref())?;

    // Keep the closure alive for the page lifetime
    closure.forget();

    info!("Sparkle Pen bridge initialized");
    Ok(())
}

/// Run one JSON command, or answer with an error if the pen is mid-callback
pub(crate) fn reply_to(pen: &RefCell<WebPen>, request: &str) -> String {
    match pen.try_borrow_mut() {
        Ok(mut pen) => pen.handle_json(request),
        Err(_) => {
            warn!("Sparkle Pen busy, rejecting command");
            response_json(&PenResponse::Error(ErrorResponse::new("sparkle pen is busy")))
        }
    }
}

/// Dispatch a response event with `json` as its detail
pub fn send_response(window: &web_sys::Window, json: &str) {
    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(json));

    let event = match web_sys::CustomEvent::new_with_event_init_dict(RESPONSE_EVENT, &init) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to create response event: {:?}", e);
            return;
        }
    };

    if let Err(e) = window.dispatch_event(&event) {
        warn!("Failed to dispatch response event: {:?}", e);
    }
}
