//! Stickman archers
//!
//! A combatant stands still for the whole match; only its health changes.
//! Hit zones are derived from the feet position on every query.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{HitZone, Rect};
use super::terrain::Terrain;
use crate::tuning::Tuning;

/// Which of the two duelists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Slot in `[Combatant; 2]`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// 1-based number for HUD text
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Direction the archer faces (drawing only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Body dimensions shared by both archers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyGeometry {
    pub head_radius: f32,
    pub torso_height: f32,
    pub torso_half_width: f32,
}

impl BodyGeometry {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            head_radius: tuning.head_radius,
            torso_height: tuning.torso_height,
            torso_half_width: tuning.torso_half_width,
        }
    }
}

/// A stickman archer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: PlayerId,
    /// Feet position
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub facing: Facing,
    pub body: BodyGeometry,
}

impl Combatant {
    pub fn new(id: PlayerId, pos: Vec2, facing: Facing, tuning: &Tuning) -> Self {
        Self {
            id,
            pos,
            health: tuning.max_health,
            max_health: tuning.max_health,
            facing,
            body: BodyGeometry::from_tuning(tuning),
        }
    }

    /// Place a combatant on its side of the arena, standing above the ground.
    ///
    /// Player one stands `spawn_inset` from the left edge facing right,
    /// player two the same distance from the right edge facing left.
    pub fn spawn(id: PlayerId, terrain: &Terrain, tuning: &Tuning) -> Self {
        let (x, facing) = match id {
            PlayerId::One => (tuning.spawn_inset, Facing::Right),
            PlayerId::Two => (tuning.arena_width - tuning.spawn_inset, Facing::Left),
        };
        let y = terrain.height_at(x) - tuning.spawn_offset;
        Self::new(id, Vec2::new(x, y), facing, tuning)
    }

    pub fn head_zone(&self) -> Rect {
        let r = self.body.head_radius;
        Rect::new(
            self.pos.x - r,
            self.pos.y - self.body.torso_height - r * 2.0,
            r * 2.0,
            r * 2.0,
        )
    }

    pub fn body_zone(&self) -> Rect {
        Rect::new(
            self.pos.x - self.body.torso_half_width,
            self.pos.y - self.body.torso_height,
            self.body.torso_half_width * 2.0,
            self.body.torso_height,
        )
    }

    /// Where blood sprays from for a zone hit
    pub fn wound_point(&self, zone: HitZone) -> Vec2 {
        match zone {
            HitZone::Head => self.pos - Vec2::new(0.0, self.body.torso_height),
            HitZone::Body => self.pos - Vec2::new(0.0, self.body.torso_height * 0.5),
        }
    }

    /// Bow hand, the origin arrows are launched from
    pub fn nock_point(&self, nock_height: f32) -> Vec2 {
        self.pos - Vec2::new(0.0, nock_height)
    }

    /// Subtract health, stopping at zero
    pub fn apply_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Remaining health in `[0, 1]` for health bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}
