//! Blood spray
//!
//! Purely cosmetic. Particles never feed back into the match outcome, but
//! they draw from the match RNG so a seeded replay sprays identically.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A single blood droplet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left to live
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    /// Remaining life in `[0, 1]`, used for fading
    pub fn life_fraction(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Live particles, capped at `max_particles` (oldest evicted first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spray `count` droplets from `origin`, evicting the oldest droplets when
    /// the system is full. Returns how many were spawned (at most `max_particles`).
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        count: usize,
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        let count = count.min(tuning.max_particles);
        let overflow = (self.particles.len() + count).saturating_sub(tuning.max_particles);
        if overflow > 0 {
            self.particles.drain(..overflow);
        }

        let spread = tuning.particle_spread;
        for _ in 0..count {
            let vx = rng.random_range(-spread..=spread);
            let vy = -rng.random_range(tuning.particle_lift_min..=tuning.particle_lift_max);
            let size = rng.random_range(tuning.particle_size_min..=tuning.particle_size_max) as f32;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(vx, vy),
                life: tuning.particle_lifetime,
                max_life: tuning.particle_lifetime,
                size,
            });
        }
        count
    }

    /// Move, fall and age every droplet, then drop the dead ones
    pub fn advance_all(&mut self, tuning: &Tuning) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += tuning.particle_gravity;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new();

        assert_eq!(system.spawn_burst(Vec2::new(10.0, 20.0), 15, &tuning, &mut rng), 15);
        assert_eq!(system.len(), 15);
        for p in system.iter() {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert!((-3.0..=3.0).contains(&p.vel.x));
            // Always sprays upward
            assert!((-4.0..=-1.0).contains(&p.vel.y));
            assert!((2.0..=5.0).contains(&p.size));
            assert_eq!(p.life, 60);
            assert_eq!(p.life_fraction(), 1.0);
        }
    }

    #[test]
    fn test_lifetime_and_purge() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new();
        system.spawn_burst(Vec2::ZERO, 10, &tuning, &mut rng);

        let first_vy = system.iter().next().unwrap().vel.y;
        system.advance_all(&tuning);
        let p = system.iter().next().unwrap();
        assert_eq!(p.life, 59);
        assert!((p.vel.y - (first_vy + 0.1)).abs() < 1e-6);

        for _ in 0..58 {
            system.advance_all(&tuning);
        }
        assert_eq!(system.len(), 10);
        system.advance_all(&tuning);
        assert!(system.is_empty());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let tuning = Tuning {
            max_particles: 20,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut system = ParticleSystem::new();
        let first = Vec2::new(1.0, 1.0);
        let second = Vec2::new(500.0, 1.0);
        assert_eq!(system.spawn_burst(first, 15, &tuning, &mut rng), 15);
        assert_eq!(system.spawn_burst(second, 15, &tuning, &mut rng), 15);
        assert_eq!(system.len(), 20);
        assert_eq!(system.iter().filter(|p| p.pos == first).count(), 5);
        assert_eq!(system.iter().filter(|p| p.pos == second).count(), 15);

        // A burst larger than the cap fills it alone
        assert_eq!(system.spawn_burst(Vec2::ZERO, 50, &tuning, &mut rng), 20);
        assert!(system.iter().all(|p| p.pos == Vec2::ZERO));
    }

    #[test]
    fn test_burst_follows_tuning() {
        let tuning = Tuning {
            particle_spread: 0.5,
            particle_lift_min: 6.0,
            particle_lift_max: 7.0,
            particle_size_min: 8,
            particle_size_max: 8,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(21);
        let mut system = ParticleSystem::new();
        system.spawn_burst(Vec2::ZERO, 30, &tuning, &mut rng);
        for p in system.iter() {
            assert!((-0.5..=0.5).contains(&p.vel.x));
            assert!((-7.0..=-6.0).contains(&p.vel.y));
            assert_eq!(p.size, 8.0);
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let tuning = Tuning::default();
        let mut a = ParticleSystem::new();
        let mut b = ParticleSystem::new();
        a.spawn_burst(Vec2::ZERO, 10, &tuning, &mut Pcg32::seed_from_u64(77));
        b.spawn_burst(Vec2::ZERO, 10, &tuning, &mut Pcg32::seed_from_u64(77));
        let va: Vec<_> = a.iter().map(|p| p.vel).collect();
        let vb: Vec<_> = b.iter().map(|p| p.vel).collect();
        assert_eq!(va, vb);
    }
}
