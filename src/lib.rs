//! Stickman Archery - a two-player turn-based arrow duel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, ballistics, hits, match state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering and input polling live outside this crate. A presentation layer
//! reads [`sim::MatchState`] (or a [`sim::Snapshot`]) each frame and feeds
//! discrete [`sim::Intent`]s back in through [`sim::tick`].

pub mod sim;
pub mod tuning;

pub use tuning::{Preset, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Arena dimensions (screen space, +y is down)
    pub const ARENA_WIDTH: f32 = 1200.0;
    pub const ARENA_HEIGHT: f32 = 700.0;

    /// Combatant defaults
    pub const MAX_HEALTH: i32 = 100;
    pub const HEAD_DAMAGE: i32 = 50;
    pub const BODY_DAMAGE: i32 = 25;
    pub const HEAD_RADIUS: f32 = 15.0;
    pub const TORSO_HEIGHT: f32 = 40.0;
    /// Half-width of the torso hit zone
    pub const TORSO_HALF_WIDTH: f32 = 10.0;

    /// Arrow physics (per tick)
    pub const GRAVITY: f32 = 0.5;
    pub const MAX_POWER: f32 = 20.0;
    pub const WIND_MAX: f32 = 3.0;
    /// Fraction of the wind force added to horizontal velocity each tick
    pub const WIND_FACTOR: f32 = 0.1;
}

/// Aim angle (radians) from `from` toward `to`, in screen space
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Clamp a point into the `[0, width] x [0, height]` arena rectangle.
/// Non-finite coordinates collapse to the arena origin.
#[inline]
pub fn clamp_to_arena(point: Vec2, width: f32, height: f32) -> Vec2 {
    let x = if point.x.is_finite() { point.x } else { 0.0 };
    let y = if point.y.is_finite() { point.y } else { 0.0 };
    Vec2::new(x.clamp(0.0, width), y.clamp(0.0, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_aim_angle_screen_space() {
        // Straight down the screen is +PI/2 because +y points down
        let a = aim_angle(Vec2::new(10.0, 10.0), Vec2::new(10.0, 50.0));
        assert!((a - FRAC_PI_2).abs() < 1e-6);

        let d = direction(a);
        assert!(d.x.abs() < 1e-6);
        assert!((d.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_to_arena() {
        let p = clamp_to_arena(Vec2::new(-50.0, 9000.0), 1200.0, 700.0);
        assert_eq!(p, Vec2::new(0.0, 700.0));

        let p = clamp_to_arena(Vec2::new(f32::NAN, f32::INFINITY), 1200.0, 700.0);
        assert_eq!(p, Vec2::ZERO);
    }
}
