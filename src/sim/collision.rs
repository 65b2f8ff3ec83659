//! Axis-aligned hit testing
//!
//! Everything that can be struck (head, torso, arrow tip) is a rectangle in
//! screen space. Overlap is strict: rectangles sharing only an edge miss.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `min` is the top-left corner in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of side `2 * half` centred on `center`
    pub fn centered(center: Vec2, half: f32) -> Self {
        Self {
            min: center - Vec2::splat(half),
            size: Vec2::splat(half * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Which part of a combatant was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitZone {
    Head,
    Body,
}

/// Classify an arrow hitbox against a target's zones.
///
/// The head is tested first so a hitbox straddling the neck counts once, as a headshot.
pub fn classify_hit(arrow: &Rect, head: &Rect, body: &Rect) -> Option<HitZone> {
    if arrow.overlaps(head) {
        Some(HitZone::Head)
    } else if arrow.overlaps(body) {
        Some(HitZone::Body)
    } else {
        None
    }
}
