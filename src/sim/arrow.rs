//! Arrow ballistics
//!
//! Arrows fly under constant gravity plus a horizontal wind push, integrated
//! with semi-implicit Euler (velocity first, then position) so that a given
//! launch and wind always trace the same path.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::combatant::PlayerId;
use super::state::Wind;
use crate::tuning::Tuning;

/// An arrow in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: u32,
    pub owner: PlayerId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cleared once the arrow leaves the arena or strikes something; never set again
    pub active: bool,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Arrow {
    pub fn new(id: u32, owner: PlayerId, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            owner,
            pos,
            vel,
            active: true,
            trail: VecDeque::new(),
        }
    }

    /// Advance one tick (`dt = 1.0` is one nominal frame).
    ///
    /// Returns whether the arrow is still in flight. Inactive arrows are left untouched.
    pub fn advance(&mut self, wind: Wind, tuning: &Tuning, dt: f32) -> bool {
        if !self.active {
            return false;
        }

        self.trail.push_back(self.pos);
        while self.trail.len() > tuning.trail_length {
            self.trail.pop_front();
        }

        self.vel.y += tuning.gravity * dt;
        self.vel.x += wind.force() * tuning.wind_factor * dt;
        self.pos += self.vel * dt;

        if self.pos.x < 0.0 || self.pos.x > tuning.arena_width || self.pos.y > tuning.arena_height {
            self.active = false;
        }
        self.active
    }

    /// Small square used for hit tests
    pub fn hitbox(&self, half_size: f32) -> Rect {
        Rect::centered(self.pos, half_size)
    }

    /// Flight angle for drawing the shaft
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
