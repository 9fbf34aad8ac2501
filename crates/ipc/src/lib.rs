//! IPC message protocol for Sparkle Pen
//!
//! Defines the request/response contract between the popup and the content
//! script that owns the sparkle overlay. The transport itself (extension
//! messaging, DOM events) lives outside this crate; everything here is plain
//! data plus JSON helpers.

mod error;
mod messages;
pub mod popup;
mod types;

pub use error::*;
pub use messages::*;
pub use types::*;

use serde_json::{Value, json};

/// Decode a JSON command as sent by the popup
pub fn decode_command(json: &str) -> Result<PenCommand, IpcError> {
    command_from_value(serde_json::from_str(json)?)
}

/// Decode a command from an already-parsed JSON value
pub fn command_from_value(value: Value) -> Result<PenCommand, IpcError> {
    if !value.is_object() {
        return Err(IpcError::NotAnObject(value.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Encode a response for the transport
pub fn encode_response(response: &PenResponse) -> Result<String, IpcError> {
    Ok(serde_json::to_string(response)?)
}

/// Encode a response, degrading to an error reply if encoding fails.
///
/// Never fails: the fallback is built from plain JSON values.
pub fn response_json(response: &PenResponse) -> String {
    encode_response(response).unwrap_or_else(|e| {
        json!({ "status": "error", "message": e.to_string() }).to_string()
    })
}
