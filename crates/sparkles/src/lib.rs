//! Sparkle Pen engine - cursor-following particle overlay
//!
//! This crate owns everything that happens inside the page while the pen is
//! on, independent of any particular browser binding:
//! - [`particle`] - A single sparkle's kinematics and per-shape drawing
//! - [`pool`] - The live particle collection with a combined update/draw pass
//! - [`canvas`] - The 2D drawing-context abstraction particles paint into
//! - [`host`] - Capability traits for the surface, pointer and frame clock
//! - [`surface`] - Overlay surface lifecycle and resize handling
//! - [`input`] - Pointer listener registration
//! - [`scheduler`] - The self-rescheduling per-frame loop
//! - [`controller`] - The activation state machine and command handler
//! - [`headless`] - In-memory host used for tests and offline runs

pub mod canvas;
pub mod controller;
pub mod error;
pub mod headless;
pub mod host;
pub mod input;
pub mod particle;
pub mod pool;
pub mod scheduler;
pub mod shapes;
pub mod surface;

pub use canvas::*;
pub use controller::*;
pub use error::*;
pub use host::*;
pub use input::*;
pub use particle::*;
pub use pool::*;
pub use scheduler::*;
pub use surface::*;

pub use sparkle_pen_config::SimulationConfig;
pub use sparkle_pen_ipc::{SparkleConfig, SparkleConfigPatch, SparkleShape};
