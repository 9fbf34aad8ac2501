//! Shared configuration for Sparkle Pen
//!
//! This crate is the single source of truth for the particle model's
//! tunables and the overlay surface constants, shared by the host-independent
//! engine and the browser binding.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// DOM id given to the overlay canvas
pub const SURFACE_ELEMENT_ID: &str = "sparklePenCanvas";

/// Stacking order of the overlay canvas (above any page content)
pub const SURFACE_Z_INDEX: i32 = 99999;

/// Particles spawned for every qualifying pointer move
pub const PARTICLES_PER_MOVE: usize = 3;

/// Downward acceleration added to vertical velocity each tick
pub const DEFAULT_GRAVITY: f64 = 0.05;

/// Horizontal velocity multiplier applied each tick
pub const DEFAULT_HORIZONTAL_DAMPING: f64 = 0.98;

/// Frequency of the bubble wobble, applied to remaining life
pub const DEFAULT_WOBBLE_FREQUENCY: f64 = 0.1;

/// Tunables of the sparkle particle model.
///
/// Ranges are half-open (`min..max`) and sampled uniformly at spawn time.
/// Units are viewport pixels and animation ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Drawn radius in pixels
    pub size: Range<f64>,
    /// Lifetime in ticks
    pub life: Range<f64>,
    /// Initial speed in pixels per tick (direction is uniform)
    pub speed: Range<f64>,
    /// Added to vertical velocity every tick
    pub gravity: f64,
    /// Multiplied into horizontal velocity every tick
    pub horizontal_damping: f64,
    /// Upward drift per tick for bubbles
    pub bubble_rise: Range<f64>,
    /// Amplitude of the sideways bubble wobble
    pub bubble_wobble: Range<f64>,
    /// Frequency of the sideways bubble wobble
    pub wobble_frequency: f64,
    /// Particles spawned per pointer move
    pub particles_per_move: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 1.0..4.0,
            life: 20.0..50.0,
            speed: 0.5..2.5,
            gravity: DEFAULT_GRAVITY,
            horizontal_damping: DEFAULT_HORIZONTAL_DAMPING,
            bubble_rise: 0.1..0.6,
            bubble_wobble: -0.05..0.05,
            wobble_frequency: DEFAULT_WOBBLE_FREQUENCY,
            particles_per_move: PARTICLES_PER_MOVE,
        }
    }
}

impl SimulationConfig {
    /// Longest possible particle lifetime in whole ticks
    pub fn max_lifetime_ticks(&self) -> u32 {
        self.life.end.max(0.0).ceil() as u32
    }

    /// Check that every range is non-empty and the lifetime is positive
    pub fn is_valid(&self) -> bool {
        let ranges = [
            &self.size,
            &self.life,
            &self.speed,
            &self.bubble_rise,
            &self.bubble_wobble,
        ];
        ranges.iter().all(|r| r.start < r.end) && self.life.start > 0.0
    }
}
