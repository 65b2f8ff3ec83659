//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per frame
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arrow;
pub mod collision;
pub mod combatant;
pub mod particles;
pub mod state;
pub mod terrain;
pub mod tick;

pub use arrow::Arrow;
pub use collision::{HitZone, Rect, classify_hit};
pub use combatant::{BodyGeometry, Combatant, Facing, PlayerId};
pub use particles::{Particle, ParticleSystem};
pub use state::{
    ArrowView, Charge, MatchEvent, MatchState, ParticleView, Phase, Snapshot, Wind, WindDirection,
};
pub use terrain::{Terrain, TerrainParams};
pub use tick::{Intent, TickInput, tick};
