//! Data-driven game balance
//!
//! Every number the simulation uses lives in [`Tuning`]. The defaults are the
//! classic game; JSON documents override only the fields they name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Named balance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    #[default]
    Classic,
    /// No wind at all
    Calm,
    /// Twice the classic wind
    Gale,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Calm => "Calm",
            Preset::Gale => "Gale",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Some(Preset::Classic),
            "calm" => Some(Preset::Calm),
            "gale" | "windy" => Some(Preset::Gale),
            _ => None,
        }
    }

    /// Upper bound of the per-turn wind draw for this preset
    pub fn wind_max(&self) -> f32 {
        match self {
            Preset::Classic => WIND_MAX,
            Preset::Calm => 0.0,
            Preset::Gale => WIND_MAX * 2.0,
        }
    }
}

/// Match balance and arena geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub preset: Preset,

    // === Arena & terrain ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Horizontal distance between terrain samples
    pub segment_spacing: f32,
    /// Ground level before perturbation
    pub terrain_baseline: f32,
    /// Samples are offset by an integer in `[-variance, variance]`
    pub terrain_variance: i32,
    /// Highest allowed ground (smallest screen y)
    pub elevation_min: f32,
    /// Lowest allowed ground (largest screen y)
    pub elevation_max: f32,

    // === Combatants ===
    /// Distance of each spawn from its arena edge
    pub spawn_inset: f32,
    /// Feet are placed this far above the ground
    pub spawn_offset: f32,
    pub max_health: i32,
    pub head_damage: i32,
    pub body_damage: i32,
    pub head_radius: f32,
    pub torso_height: f32,
    pub torso_half_width: f32,

    // === Arrows ===
    pub gravity: f32,
    pub wind_max: f32,
    pub wind_factor: f32,
    /// Power gained per tick while charging
    pub charge_rate: f32,
    pub max_power: f32,
    /// Releases below this power are cancelled
    pub min_fire_power: f32,
    /// Arrows spawn this far along the aim direction
    pub launch_offset: f32,
    /// Height of the bow hand above the feet
    pub nock_height: f32,
    pub arrow_half_size: f32,
    pub trail_length: usize,
    /// Allow starting a new charge while arrows are still in flight
    pub fire_while_resolving: bool,

    // === Blood ===
    pub headshot_particles: usize,
    pub bodyshot_particles: usize,
    pub particle_lifetime: u32,
    pub particle_gravity: f32,
    /// Horizontal speed drawn from `[-spread, spread]`
    pub particle_spread: f32,
    /// Upward speed drawn from `[lift_min, lift_max]`
    pub particle_lift_min: f32,
    pub particle_lift_max: f32,
    pub particle_size_min: u32,
    pub particle_size_max: u32,
    /// Oldest droplets are evicted past this many
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            preset: Preset::Classic,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            segment_spacing: 50.0,
            terrain_baseline: ARENA_HEIGHT - 150.0,
            terrain_variance: 100,
            elevation_min: ARENA_HEIGHT - 300.0,
            elevation_max: ARENA_HEIGHT - 50.0,

            spawn_inset: 150.0,
            spawn_offset: 50.0,
            max_health: MAX_HEALTH,
            head_damage: HEAD_DAMAGE,
            body_damage: BODY_DAMAGE,
            head_radius: HEAD_RADIUS,
            torso_height: TORSO_HEIGHT,
            torso_half_width: TORSO_HALF_WIDTH,

            gravity: GRAVITY,
            wind_max: WIND_MAX,
            wind_factor: WIND_FACTOR,
            charge_rate: 0.5,
            max_power: MAX_POWER,
            min_fire_power: 1.0,
            launch_offset: 30.0,
            nock_height: 20.0,
            arrow_half_size: 3.0,
            trail_length: 15,
            fire_while_resolving: true,

            headshot_particles: 15,
            bodyshot_particles: 10,
            particle_lifetime: 60,
            particle_gravity: 0.1,
            particle_spread: 3.0,
            particle_lift_min: 1.0,
            particle_lift_max: 4.0,
            particle_size_min: 2,
            particle_size_max: 5,
            max_particles: 256,
        }
    }
}

impl Tuning {
    /// Create tuning from a preset (applies preset defaults)
    pub fn from_preset(preset: Preset) -> Self {
        let mut tuning = Self::default();
        tuning.apply_preset(preset);
        tuning
    }

    /// Apply a preset (updates preset-dependent values)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.wind_max = preset.wind_max();
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON tuning document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {} ({})", path.display(), tuning.preset.as_str());
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("segment_spacing", self.segment_spacing),
            ("terrain_baseline", self.terrain_baseline),
            ("elevation_min", self.elevation_min),
            ("elevation_max", self.elevation_max),
            ("spawn_inset", self.spawn_inset),
            ("spawn_offset", self.spawn_offset),
            ("head_radius", self.head_radius),
            ("torso_height", self.torso_height),
            ("torso_half_width", self.torso_half_width),
            ("gravity", self.gravity),
            ("wind_max", self.wind_max),
            ("wind_factor", self.wind_factor),
            ("charge_rate", self.charge_rate),
            ("max_power", self.max_power),
            ("min_fire_power", self.min_fire_power),
            ("launch_offset", self.launch_offset),
            ("nock_height", self.nock_height),
            ("arrow_half_size", self.arrow_half_size),
            ("particle_gravity", self.particle_gravity),
            ("particle_spread", self.particle_spread),
            ("particle_lift_min", self.particle_lift_min),
            ("particle_lift_max", self.particle_lift_max),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TuningError::Invalid(format!("{name} must be finite, got {value}")));
        }

        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(TuningError::Invalid(format!(
                "arena must be positive, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if !(self.segment_spacing > 0.0) {
            return Err(TuningError::Invalid(format!(
                "segment_spacing must be positive, got {}",
                self.segment_spacing
            )));
        }
        if self.elevation_min > self.elevation_max {
            return Err(TuningError::Invalid(format!(
                "elevation band is inverted: [{}, {}]",
                self.elevation_min, self.elevation_max
            )));
        }
        if self.terrain_variance < 0 {
            return Err(TuningError::Invalid(format!(
                "terrain_variance must not be negative, got {}",
                self.terrain_variance
            )));
        }
        if self.charge_rate <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "charge_rate must be positive, got {}",
                self.charge_rate
            )));
        }
        if self.max_power <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "max_power must be positive, got {}",
                self.max_power
            )));
        }
        if self.min_fire_power <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "min_fire_power must be positive, got {}",
                self.min_fire_power
            )));
        }
        if self.min_fire_power > self.max_power {
            return Err(TuningError::Invalid(format!(
                "min_fire_power {} exceeds max_power {}",
                self.min_fire_power, self.max_power
            )));
        }
        if self.wind_max < 0.0 {
            return Err(TuningError::Invalid(format!(
                "wind_max must not be negative, got {}",
                self.wind_max
            )));
        }
        if self.max_health <= 0 {
            return Err(TuningError::Invalid(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }
        if self.particle_spread < 0.0
            || self.particle_lift_min > self.particle_lift_max
            || self.particle_size_min > self.particle_size_max
        {
            return Err(TuningError::Invalid(format!(
                "particle ranges are inverted: spread {}, lift [{}, {}], size [{}, {}]",
                self.particle_spread,
                self.particle_lift_min,
                self.particle_lift_max,
                self.particle_size_min,
                self.particle_size_max
            )));
        }
        if self.spawn_inset * 2.0 >= self.arena_width {
            return Err(TuningError::Invalid(format!(
                "spawn_inset {} leaves no room between combatants",
                self.spawn_inset
            )));
        }
        Ok(())
    }

    /// Damage a zone hit deals
    pub fn damage_for(&self, zone: crate::sim::HitZone) -> i32 {
        match zone {
            crate::sim::HitZone::Head => self.head_damage,
            crate::sim::HitZone::Body => self.body_damage,
        }
    }

    /// Blood particles spawned for a zone hit
    pub fn burst_for(&self, zone: crate::sim::HitZone) -> usize {
        match zone {
            crate::sim::HitZone::Head => self.headshot_particles,
            crate::sim::HitZone::Body => self.bodyshot_particles,
        }
    }
}
