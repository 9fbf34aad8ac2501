//! Self-rescheduling per-frame animation loop

use tracing::{debug, info};

use crate::canvas::OverlaySurface;
use crate::error::HostError;
use crate::host::{FrameHandle, FrameScheduler};
use crate::pool::ParticlePool;

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No frame was pending; the callback was stale and ignored
    Idle,
    /// The surface was gone, so the loop stopped itself
    Stopped,
    /// The pool was stepped and the next frame requested
    Rendered { live: usize },
}

/// Tracks the single pending frame request of the animation loop.
///
/// `start` and `stop` are idempotent, and `stop` is safe before any `start`.
pub struct AnimationScheduler<F: FrameScheduler> {
    frames: F,
    pending: Option<FrameHandle>,
}

impl<F: FrameScheduler> AnimationScheduler<F> {
    pub fn new(frames: F) -> Self {
        Self {
            frames,
            pending: None,
        }
    }

    /// Whether a frame callback is scheduled
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule the first frame unless one is already pending
    pub fn start(&mut self) -> Result<(), HostError> {
        if self.pending.is_some() {
            debug!("Animation already running");
            return Ok(());
        }

        self.pending = Some(self.frames.request_frame()?);
        info!("Animation started");
        Ok(())
    }

    /// Cancel the pending frame, drop all particles and wipe the surface
    pub fn stop<C: OverlaySurface>(&mut self, pool: &mut ParticlePool, surface: Option<&mut C>) {
        match self.pending.take() {
            Some(handle) => {
                self.frames.cancel_frame(handle);
                info!("Animation stopped");
            }
            None => debug!("Animation not running"),
        }

        pool.clear();
        if let Some(surface) = surface {
            surface.clear();
        }
    }

    /// Consume the pending request because its callback is now running.
    ///
    /// Returns false for a callback that was not pending.
    pub(crate) fn begin_frame(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Request the next frame from inside a frame callback
    pub(crate) fn reschedule(&mut self) -> Result<(), HostError> {
        self.pending = Some(self.frames.request_frame()?);
        Ok(())
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }
}
