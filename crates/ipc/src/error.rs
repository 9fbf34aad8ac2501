//! Errors at the JSON boundary.

/// Failure to decode a command or encode a response.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Invalid command JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command must be a JSON object, got {0}")]
    NotAnObject(String),
}
