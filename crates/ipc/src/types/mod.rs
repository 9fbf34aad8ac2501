//! Type definitions for IPC messages.

mod sparkle;

pub use sparkle::*;
