//! Live particle collection

use rand::SeedableRng;
use rand::rngs::SmallRng;
use sparkle_pen_config::SimulationConfig;
use sparkle_pen_ipc::SparkleShape;
use tracing::trace;

use crate::canvas::SparkleCanvas;
use crate::particle::Particle;

/// Ordered set of live particles plus the RNG that seeds new ones.
///
/// After every [`step`](Self::step) no particle with `life <= 0` remains.
pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: SmallRng,
}

impl ParticlePool {
    /// Create an empty pool with a deterministic RNG
    pub fn with_seed(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Append `count` new particles at `(x, y)`
    pub fn spawn(
        &mut self,
        x: f64,
        y: f64,
        count: usize,
        shape: &SparkleShape,
        config: &SimulationConfig,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = Particle::spawn(x, y, shape, config, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Advance and render every particle in one pass.
    ///
    /// Walks in reverse so expired particles can be swap-removed in place;
    /// an expired particle is removed before it could be drawn.
    /// Returns the number of particles removed.
    pub fn step<C: SparkleCanvas + ?Sized>(
        &mut self,
        shape: &SparkleShape,
        config: &SimulationConfig,
        canvas: &mut C,
    ) -> usize {
        let mut expired = 0;

        for i in (0..self.particles.len()).rev() {
            let particle = &mut self.particles[i];
            particle.update(shape, config);

            if particle.is_alive() {
                particle.draw(shape, canvas);
            } else {
                self.particles.swap_remove(i);
                expired += 1;
            }
        }

        if expired > 0 {
            trace!(expired, live = self.particles.len(), "ParticlePool::step");
        }

        expired
    }

    /// Drop every particle immediately
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only view of the live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view, for callers that need to seed specific states
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::RecordingCanvas;

    #[test]
    fn test_spawn_appends() {
        let mut pool = ParticlePool::with_seed(1);
        let config = SimulationConfig::default();

        pool.spawn(10.0, 10.0, 3, &SparkleShape::Circle, &config);
        pool.spawn(20.0, 20.0, 2, &SparkleShape::Circle, &config);

        assert_eq!(pool.len(), 5);
        assert!(pool.particles()[..3].iter().all(|p| p.position.x == 10.0));
    }

    #[test]
    fn test_step_removes_expired_without_drawing() {
        let mut pool = ParticlePool::with_seed(2);
        let config = SimulationConfig::default();
        pool.spawn(50.0, 50.0, 4, &SparkleShape::Circle, &config);

        // Two particles expire on the next update, two survive
        pool.particles_mut()[0].life = 1.0;
        pool.particles_mut()[2].life = 0.5;
        pool.particles_mut()[1].life = 10.0;
        pool.particles_mut()[3].life = 10.0;

        let mut canvas = RecordingCanvas::new(100, 100);
        let expired = pool.step(&SparkleShape::Circle, &config, &mut canvas);

        assert_eq!(expired, 2);
        assert_eq!(pool.len(), 2);
        assert!(pool.particles().iter().all(|p| p.is_alive()));
        assert_eq!(canvas.fill_count(), 2);
    }

    #[test]
    fn test_step_until_empty() {
        let mut pool = ParticlePool::with_seed(3);
        let config = SimulationConfig::default();
        pool.spawn(0.0, 0.0, 30, &SparkleShape::Star, &config);

        let mut canvas = RecordingCanvas::new(100, 100);
        for _ in 0..config.max_lifetime_ticks() {
            pool.step(&SparkleShape::Star, &config, &mut canvas);
        }

        assert!(pool.is_empty());
    }

    #[test]
    fn test_no_dead_particle_survives_step() {
        let mut pool = ParticlePool::with_seed(4);
        let config = SimulationConfig::default();
        let mut canvas = RecordingCanvas::new(100, 100);

        for tick in 0..80 {
            if tick % 3 == 0 {
                pool.spawn(tick as f64, 0.0, 3, &SparkleShape::Bubble, &config);
            }
            pool.step(&SparkleShape::Bubble, &config, &mut canvas);
            assert!(pool.particles().iter().all(|p| p.life > 0.0));
        }
    }

    #[test]
    fn test_clear() {
        let mut pool = ParticlePool::with_seed(5);
        pool.spawn(0.0, 0.0, 9, &SparkleShape::Circle, &SimulationConfig::default());
        pool.clear();
        assert!(pool.is_empty());
    }
}
