//! Error types for host capability failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Document is not available")]
    DocumentUnavailable,

    #[error("2D drawing context is not available")]
    ContextUnavailable,

    #[error("Failed to create overlay surface: {0}")]
    SurfaceCreation(String),

    #[error("Failed to register listener: {0}")]
    Listener(String),

    #[error("Failed to request animation frame: {0}")]
    FrameRequest(String),
}
