//! Match state and core simulation types
//!
//! The match owns every mutable piece of the duel: terrain, both archers,
//! arrows in flight, blood, wind and the charge meter. Presentation code
//! only reads it (or a [`Snapshot`]) and sends intents through `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arrow::Arrow;
use super::collision::HitZone;
use super::combatant::{Combatant, PlayerId};
use super::particles::ParticleSystem;
use super::terrain::{Terrain, TerrainParams};
use crate::tuning::Tuning;

/// Current phase of the match, derived from state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the active archer to start drawing
    Aiming,
    /// Bow drawn, power building
    Charging,
    /// Arrows in flight, nobody drawing
    Resolving,
    /// Someone is dead; only a restart is accepted
    GameOver,
}

/// Which way the wind blows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindDirection {
    Left,
    Right,
}

impl WindDirection {
    pub fn sign(self) -> f32 {
        match self {
            WindDirection::Left => -1.0,
            WindDirection::Right => 1.0,
        }
    }
}

/// Per-turn wind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub strength: f32,
    pub direction: WindDirection,
}

impl Wind {
    pub fn new(strength: f32, direction: WindDirection) -> Self {
        Self {
            strength,
            direction,
        }
    }

    pub fn calm() -> Self {
        Self::new(0.0, WindDirection::Right)
    }

    /// Strength uniform in `[0, max]`, direction a coin flip
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, max: f32) -> Self {
        let strength = rng.random_range(0.0..=max.max(0.0));
        let direction = if rng.random_bool(0.5) {
            WindDirection::Right
        } else {
            WindDirection::Left
        };
        Self::new(strength, direction)
    }

    /// Signed horizontal force
    pub fn force(&self) -> f32 {
        self.strength * self.direction.sign()
    }
}

/// Bow draw state for the archer whose turn it is
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Charge {
    pub active: bool,
    pub power: f32,
    /// Cursor position when the draw started
    pub origin: Option<Vec2>,
}

impl Charge {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Things that happened during a tick, for sound and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    ChargeStarted { by: PlayerId },
    ShotCancelled { by: PlayerId, power: f32 },
    ArrowFired { id: u32, owner: PlayerId, velocity: Vec2 },
    TurnChanged { to: PlayerId, wind: Wind },
    ArrowLanded { id: u32, pos: Vec2 },
    ArrowLeftArena { id: u32 },
    Hit { target: PlayerId, zone: HitZone, damage: i32, health_left: i32 },
    MatchOver { winner: PlayerId },
    Restarted,
}

/// Complete match state (deterministic for a given seed and intent stream)
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Seed the match RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub terrain: Terrain,
    /// Indexed by [`PlayerId::index`]
    pub players: [Combatant; 2],
    /// Arrows in flight (sorted by id)
    pub arrows: Vec<Arrow>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub turn: PlayerId,
    pub charge: Charge,
    pub wind: Wind,
    pub winner: Option<PlayerId>,
    /// Simulation tick counter since the last reset
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<MatchEvent>,
    next_id: u32,
}

impl MatchState {
    /// Create a new match with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed), tuning)
    }

    /// Create a match drawing terrain, wind and blood from `rng`.
    ///
    /// A tuning that fails [`Tuning::validate`] is replaced by the defaults.
    pub fn with_rng(seed: u64, mut rng: Pcg32, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("{e}, falling back to default tuning");
                Tuning::default()
            }
        };
        let terrain = Terrain::generate(&TerrainParams::from_tuning(&tuning), &mut rng);
        let players = spawn_players(&terrain, &tuning);
        let wind = Wind::draw(&mut rng, tuning.wind_max);
        log::info!("Match started with seed {}", seed);

        Self {
            seed,
            tuning,
            rng,
            terrain,
            players,
            arrows: Vec::new(),
            particles: ParticleSystem::new(),
            turn: PlayerId::One,
            charge: Charge::idle(),
            wind,
            winner: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Start a fresh round on the same long-lived state: new terrain, healed
    /// archers, empty sky, player one to shoot, new wind.
    pub fn reset(&mut self) {
        self.terrain = Terrain::generate(&TerrainParams::from_tuning(&self.tuning), &mut self.rng);
        self.players = spawn_players(&self.terrain, &self.tuning);
        self.arrows.clear();
        self.particles.clear();
        self.turn = PlayerId::One;
        self.charge = Charge::idle();
        self.wind = Wind::draw(&mut self.rng, self.tuning.wind_max);
        self.winner = None;
        self.time_ticks = 0;
        self.events.push(MatchEvent::Restarted);
        log::info!("Match restarted");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> Phase {
        if self.winner.is_some() {
            Phase::GameOver
        } else if self.charge.active {
            Phase::Charging
        } else if self.arrows.iter().any(|a| a.active) {
            Phase::Resolving
        } else {
            Phase::Aiming
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn player(&self, id: PlayerId) -> &Combatant {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Combatant {
        &mut self.players[id.index()]
    }

    /// The archer whose turn it is
    pub fn current(&self) -> &Combatant {
        self.player(self.turn)
    }

    /// Drain the events recorded since the last tick
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only copy of everything a renderer draws
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase(),
            terrain: self.terrain.points().to_vec(),
            players: self.players.clone(),
            health_bars: self.players.each_ref().map(Combatant::health_fraction),
            arrows: self
                .arrows
                .iter()
                .filter(|a| a.active)
                .map(|a| ArrowView {
                    id: a.id,
                    owner: a.owner,
                    pos: a.pos,
                    heading: a.heading(),
                    active: a.active,
                    trail: a.trail.iter().copied().collect(),
                })
                .collect(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: p.size,
                    life: p.life_fraction(),
                })
                .collect(),
            wind: self.wind,
            turn: self.turn,
            charging: self.charge.active,
            power: self.charge.power,
            max_power: self.tuning.max_power,
            game_over: self.is_game_over(),
            winner: self.winner,
        }
    }
}

fn spawn_players(terrain: &Terrain, tuning: &Tuning) -> [Combatant; 2] {
    [
        Combatant::spawn(PlayerId::One, terrain, tuning),
        Combatant::spawn(PlayerId::Two, terrain, tuning),
    ]
}

/// Arrow as seen by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowView {
    pub id: u32,
    pub owner: PlayerId,
    pub pos: Vec2,
    /// Flight angle in radians
    pub heading: f32,
    pub active: bool,
    /// Oldest first
    pub trail: Vec<Vec2>,
}

/// Particle as seen by the renderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    /// Remaining life fraction in `[0, 1]`
    pub life: f32,
}

/// Per-frame read-only view of a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: Phase,
    pub terrain: Vec<Vec2>,
    pub players: [Combatant; 2],
    /// Remaining health of each archer in `[0, 1]`
    pub health_bars: [f32; 2],
    pub arrows: Vec<ArrowView>,
    pub particles: Vec<ParticleView>,
    pub wind: Wind,
    pub turn: PlayerId,
    pub charging: bool,
    pub power: f32,
    pub max_power: f32,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match() {
        let state = MatchState::new(12345, Tuning::default());
        assert_eq!(state.phase(), Phase::Aiming);
        assert_eq!(state.turn, PlayerId::One);
        assert!(state.arrows.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.players[0].health, 100);
        assert_eq!(state.players[1].health, 100);
        assert!((0.0..=3.0).contains(&state.wind.strength));

        // Archers stand above the ground at their spawn columns
        for p in &state.players {
            assert_eq!(p.pos.y, state.terrain.height_at(p.pos.x) - 50.0);
        }
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let broken = Tuning {
            segment_spacing: 0.0,
            terrain_variance: -10,
            min_fire_power: 0.0,
            ..Tuning::default()
        };
        let state = MatchState::new(12345, broken);
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.terrain.points().len(), 25);

        let calm = Tuning::from_preset(crate::tuning::Preset::Calm);
        assert_eq!(MatchState::new(1, calm.clone()).tuning, calm);
    }

    #[test]
    fn test_wind_draw() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..200 {
            let wind = Wind::draw(&mut rng, 3.0);
            assert!((0.0..=3.0).contains(&wind.strength));
            match wind.direction {
                WindDirection::Left => saw_left = true,
                WindDirection::Right => saw_right = true,
            }
        }
        assert!(saw_left && saw_right);

        let calm = Wind::draw(&mut rng, 0.0);
        assert_eq!(calm.force(), 0.0);
        assert_eq!(Wind::new(2.0, WindDirection::Left).force(), -2.0);
    }

    #[test]
    fn test_reset_restores_round() {
        let mut state = MatchState::new(7, Tuning::default());
        state.players[1].apply_damage(100);
        state.winner = Some(PlayerId::One);
        state.turn = PlayerId::Two;
        let id = state.next_entity_id();
        state.arrows.push(Arrow::new(id, PlayerId::One, Vec2::new(10.0, 10.0), Vec2::ZERO));

        state.reset();
        assert_eq!(state.phase(), Phase::Aiming);
        assert_eq!(state.turn, PlayerId::One);
        assert!(state.arrows.is_empty());
        assert_eq!(state.players[1].health, state.players[1].max_health);
        assert_eq!(state.events, vec![MatchEvent::Restarted]);
        // IDs keep increasing across rounds
        assert!(state.next_entity_id() > id);
    }

    #[test]
    fn test_snapshot_health_bars() {
        let mut state = MatchState::new(99, Tuning::default());
        state.players[1].apply_damage(75);
        assert_eq!(state.snapshot().health_bars, [1.0, 0.25]);
        state.players[1].apply_damage(500);
        assert_eq!(state.snapshot().health_bars, [1.0, 0.0]);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = MatchState::new(99, Tuning::default());
        let snap = state.snapshot();
        assert_eq!(snap.terrain.len(), 25);
        assert!(!snap.game_over);
        assert_eq!(snap.health_bars, [1.0, 1.0]);

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.players[1].pos, snap.players[1].pos);
        assert_eq!(back.phase, Phase::Aiming);
    }
}
