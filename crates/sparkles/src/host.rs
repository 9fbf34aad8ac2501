//! Host capability traits
//!
//! The engine never touches the page directly. Each per-session resource
//! (overlay surface, pointer listener, frame callback) is acquired and
//! released through one of these traits, so the controller can guarantee
//! release on deactivation and be driven headlessly in tests.
//!
//! Hosts deliver their callbacks back into the controller through
//! [`PenController::on_resize`](crate::PenController::on_resize),
//! [`on_pointer_move`](crate::PenController::on_pointer_move) and
//! [`on_frame`](crate::PenController::on_frame).

use crate::canvas::OverlaySurface;
use crate::error::HostError;

/// Allocates the overlay drawing surface and observes viewport resizes
pub trait SurfaceHost {
    type Surface: OverlaySurface;

    /// Create a full-viewport, fixed-position, non-interactive surface
    /// stacked above the page and attach it to the document.
    fn create_surface(&mut self) -> Result<Self::Surface, HostError>;

    /// Detach the surface from the document
    fn destroy_surface(&mut self, surface: Self::Surface);

    /// Current viewport size in pixels
    fn viewport(&self) -> (u32, u32);

    /// Register the resize observer
    fn watch_resize(&mut self) -> Result<(), HostError>;

    /// Remove the resize observer; no-op if not registered
    fn unwatch_resize(&mut self);
}

/// Pointer-motion listener registration
pub trait PointerSource {
    /// Register the pointer-move handler
    fn attach(&mut self) -> Result<(), HostError>;

    /// Remove the pointer-move handler; no-op if not registered
    fn detach(&mut self);
}

/// Identifier of a pending frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// The host's per-frame timing signal
pub trait FrameScheduler {
    /// Schedule one callback for the next frame
    fn request_frame(&mut self) -> Result<FrameHandle, HostError>;

    /// Cancel a pending callback
    fn cancel_frame(&mut self, handle: FrameHandle);
}
