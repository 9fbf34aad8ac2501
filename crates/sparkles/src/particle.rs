//! A single sparkle particle

use std::f64::consts::TAU;
use std::ops::Range;

use glam::DVec2;
use rand::Rng;
use sparkle_pen_config::SimulationConfig;
use sparkle_pen_ipc::SparkleShape;

use crate::canvas::{SparkleCanvas, scoped};
use crate::shapes;

/// Extra motion state carried by particles spawned while the shape is bubble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleMotion {
    /// Upward drift in pixels per tick
    pub rise_speed: f64,
    /// Amplitude of the sideways wobble
    pub wobble: f64,
}

/// One sparkle: kinematics, countdown lifetime and derived opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Viewport pixel coordinates
    pub position: DVec2,
    /// Pixels per tick
    pub velocity: DVec2,
    /// Drawn radius in pixels, fixed at spawn
    pub size: f64,
    /// Remaining ticks
    pub life: f64,
    /// Lifetime at spawn
    pub max_life: f64,
    /// `life / max_life` as of the last update
    pub opacity: f64,
    pub bubble: Option<BubbleMotion>,
}

/// Uniform sample from a half-open range, or its start if the range is empty
fn sample<R: Rng + ?Sized>(rng: &mut R, range: &Range<f64>) -> f64 {
    if range.start < range.end {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}

impl Particle {
    /// Spawn a particle at `(x, y)` with randomised size, life and velocity.
    ///
    /// Bubble motion is only rolled when `shape` is bubble at spawn time.
    pub fn spawn<R: Rng + ?Sized>(
        x: f64,
        y: f64,
        shape: &SparkleShape,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Self {
        let size = sample(rng, &config.size);
        let life = sample(rng, &config.life);
        let angle = rng.gen_range(0.0..TAU);
        let speed = sample(rng, &config.speed);

        let bubble = (*shape == SparkleShape::Bubble).then(|| BubbleMotion {
            rise_speed: sample(rng, &config.bubble_rise),
            wobble: sample(rng, &config.bubble_wobble),
        });

        Self {
            position: DVec2::new(x, y),
            velocity: DVec2::new(angle.cos(), angle.sin()) * speed,
            size,
            life,
            max_life: life,
            opacity: 1.0,
            bubble,
        }
    }

    /// Advance one tick.
    ///
    /// Bubble drift applies only while the live shape is bubble and the
    /// particle was spawned with bubble motion.
    pub fn update(&mut self, shape: &SparkleShape, config: &SimulationConfig) {
        self.position += self.velocity;
        self.life -= 1.0;

        self.velocity.y += config.gravity;
        self.velocity.x *= config.horizontal_damping;

        if let (SparkleShape::Bubble, Some(bubble)) = (shape, self.bubble) {
            self.position.y -= bubble.rise_speed;
            self.position.x += (self.life * config.wobble_frequency).sin() * bubble.wobble;
        }

        self.opacity = if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            0.0
        };
    }

    /// Whether the particle may still be drawn
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity clamped to `[0, 1]`; NaN counts as fully transparent
    #[inline]
    pub fn clamped_opacity(&self) -> f64 {
        if self.opacity.is_nan() {
            0.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        }
    }

    /// Paint the particle using the live `shape`.
    ///
    /// Does nothing when fully transparent or when the shape has no renderer.
    pub fn draw<C: SparkleCanvas + ?Sized>(&self, shape: &SparkleShape, canvas: &mut C) {
        let opacity = self.clamped_opacity();
        if opacity <= 0.0 || !shape.is_known() {
            return;
        }

        scoped(canvas, |canvas| {
            canvas.set_global_alpha(opacity);
            match shape {
                SparkleShape::Circle => shapes::draw_circle(canvas, self.position, self.size),
                SparkleShape::Star => shapes::draw_star(canvas, self.position, self.size),
                SparkleShape::Bubble => {
                    shapes::draw_bubble(canvas, self.position, self.size, opacity)
                }
                SparkleShape::Other(_) => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DrawOp, RecordingCanvas};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn spawn(shape: &SparkleShape, seed: u64) -> Particle {
        let mut rng = SmallRng::seed_from_u64(seed);
        Particle::spawn(100.0, 200.0, shape, &SimulationConfig::default(), &mut rng)
    }

    #[test]
    fn test_spawn_ranges() {
        let config = SimulationConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..500 {
            let p = Particle::spawn(0.0, 0.0, &SparkleShape::Circle, &config, &mut rng);
            assert!(config.size.contains(&p.size));
            assert!(config.life.contains(&p.life));
            assert_eq!(p.life, p.max_life);
            let speed = p.velocity.length();
            assert!(speed >= 0.5 - 1e-9 && speed < 2.5 + 1e-9);
            assert!(p.bubble.is_none());
        }
    }

    #[test]
    fn test_bubble_spawn_rolls_motion() {
        let config = SimulationConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..200 {
            let p = Particle::spawn(0.0, 0.0, &SparkleShape::Bubble, &config, &mut rng);
            let bubble = p.bubble.expect("bubble motion");
            assert!(config.bubble_rise.contains(&bubble.rise_speed));
            assert!(config.bubble_wobble.contains(&bubble.wobble));
        }
    }

    #[test]
    fn test_update_applies_physics() {
        let config = SimulationConfig::default();
        let mut p = spawn(&SparkleShape::Circle, 1);
        p.velocity = DVec2::new(1.0, -1.0);
        p.life = 10.0;
        p.max_life = 20.0;

        p.update(&SparkleShape::Circle, &config);

        assert_eq!(p.position, DVec2::new(101.0, 199.0));
        assert_eq!(p.life, 9.0);
        assert!((p.velocity.x - 0.98).abs() < 1e-12);
        assert!((p.velocity.y - (-0.95)).abs() < 1e-12);
        assert!((p.opacity - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_life_decrements_once_per_update() {
        let config = SimulationConfig::default();
        let mut p = spawn(&SparkleShape::Star, 3);
        let initial = p.life;

        for n in 1..=15 {
            p.update(&SparkleShape::Star, &config);
            assert!((p.life - (initial - n as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bubble_rises_only_while_shape_is_bubble() {
        let config = SimulationConfig {
            gravity: 0.0,
            ..SimulationConfig::default()
        };
        let mut bubble = spawn(&SparkleShape::Bubble, 5);
        bubble.velocity = DVec2::ZERO;
        let rise = bubble.bubble.unwrap().rise_speed;

        bubble.update(&SparkleShape::Bubble, &config);
        assert!((bubble.position.y - (200.0 - rise)).abs() < 1e-9);

        let y = bubble.position.y;
        bubble.update(&SparkleShape::Circle, &config);
        assert_eq!(bubble.position.y, y);
    }

    #[test]
    fn test_bubble_wobbles_with_remaining_life() {
        let config = SimulationConfig {
            gravity: 0.0,
            ..SimulationConfig::default()
        };
        let mut p = spawn(&SparkleShape::Bubble, 10);
        p.velocity = DVec2::ZERO;
        p.life = 30.0;
        p.max_life = 30.0;
        p.bubble = Some(BubbleMotion {
            rise_speed: 0.2,
            wobble: 0.05,
        });

        p.update(&SparkleShape::Bubble, &config);
        let first = 100.0 + (29.0_f64 * 0.1).sin() * 0.05;
        assert!((p.position.x - first).abs() < 1e-12);
        assert!((p.position.y - 199.8).abs() < 1e-12);

        p.update(&SparkleShape::Bubble, &config);
        let second = first + (28.0_f64 * 0.1).sin() * 0.05;
        assert!((p.position.x - second).abs() < 1e-12);
    }

    #[test]
    fn test_circle_particle_ignores_bubble_shape_in_update() {
        let config = SimulationConfig {
            gravity: 0.0,
            ..SimulationConfig::default()
        };
        let mut p = spawn(&SparkleShape::Circle, 9);
        p.velocity = DVec2::ZERO;

        p.update(&SparkleShape::Bubble, &config);
        assert_eq!(p.position, DVec2::new(100.0, 200.0));
        assert!(p.position.is_finite());
    }

    #[test]
    fn test_draw_noop_when_transparent_for_every_shape() {
        let shapes = [
            SparkleShape::Circle,
            SparkleShape::Star,
            SparkleShape::Bubble,
            SparkleShape::Other("hexagon".into()),
        ];

        for opacity in [0.0, -0.5, f64::NAN] {
            for shape in &shapes {
                let mut p = spawn(shape, 2);
                p.opacity = opacity;
                let mut canvas = RecordingCanvas::new(100, 100);
                p.draw(shape, &mut canvas);
                assert!(canvas.ops().is_empty(), "{shape} drew at opacity {opacity}");
            }
        }
    }

    #[test]
    fn test_draw_clamps_alpha() {
        let mut p = spawn(&SparkleShape::Circle, 4);
        p.opacity = 1.7;
        let mut canvas = RecordingCanvas::new(100, 100);
        p.draw(&SparkleShape::Circle, &mut canvas);

        assert!(canvas.ops().contains(&DrawOp::GlobalAlpha(1.0)));
        assert_eq!(canvas.ops().first(), Some(&DrawOp::Save));
        assert_eq!(canvas.ops().last(), Some(&DrawOp::Restore));
    }

    #[test]
    fn test_unknown_shape_renders_nothing() {
        let p = spawn(&SparkleShape::Circle, 6);
        let mut canvas = RecordingCanvas::new(100, 100);
        p.draw(&SparkleShape::Other("triangle".into()), &mut canvas);

        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_draw_uses_shape_passed_at_draw_time() {
        let p = spawn(&SparkleShape::Circle, 8);

        let mut as_circle = RecordingCanvas::new(100, 100);
        p.draw(&SparkleShape::Circle, &mut as_circle);
        let mut as_star = RecordingCanvas::new(100, 100);
        p.draw(&SparkleShape::Star, &mut as_star);

        assert!(as_circle.ops().iter().any(|op| matches!(op, DrawOp::Arc { .. })));
        assert!(as_star.ops().iter().any(|op| matches!(op, DrawOp::LineTo(..))));
        assert_ne!(as_circle.ops(), as_star.ops());
    }
}
