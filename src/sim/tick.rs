//! Fixed timestep simulation tick
//!
//! Intents queued by the input layer are applied at the start of a tick,
//! never in the middle of one. Then the charge meter, arrows and blood advance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arrow::Arrow;
use super::collision::classify_hit;
use super::state::{Charge, MatchEvent, MatchState, Phase, Wind};
use crate::{aim_angle, clamp_to_arena, direction};

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Mouse down: start drawing the bow
    StartCharge(Vec2),
    /// Mouse up: loose the arrow toward the cursor
    ReleaseCharge(Vec2),
    /// Start a new round after game over
    Restart,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents in the order they were received since the last tick
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn single(intent: Intent) -> Self {
        Self {
            intents: vec![intent],
        }
    }
}

/// Advance the match by one tick
pub fn tick(state: &mut MatchState, input: &TickInput) {
    state.events.clear();
    for &intent in &input.intents {
        state.apply(intent);
    }
    state.step();
}

impl MatchState {
    /// Apply one intent immediately
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::StartCharge(cursor) => self.start_charge(cursor),
            Intent::ReleaseCharge(cursor) => self.release_charge(cursor),
            Intent::Restart => self.restart(),
        }
    }

    /// Begin drawing the bow. Ignored while already drawing or after game over.
    pub fn start_charge(&mut self, cursor: Vec2) {
        match self.phase() {
            Phase::GameOver | Phase::Charging => {
                log::debug!("Start charge ignored in {:?}", self.phase());
                return;
            }
            Phase::Resolving if !self.tuning.fire_while_resolving => {
                log::debug!("Start charge ignored while arrows are in flight");
                return;
            }
            _ => {}
        }

        let cursor = clamp_to_arena(cursor, self.tuning.arena_width, self.tuning.arena_height);
        self.charge = Charge {
            active: true,
            power: 0.0,
            origin: Some(cursor),
        };
        self.events.push(MatchEvent::ChargeStarted { by: self.turn });
    }

    /// Loose the arrow toward `cursor`.
    ///
    /// Ignored when not drawing. A draw weaker than `min_fire_power` is
    /// cancelled without firing and the turn stays put. Otherwise the arrow
    /// leaves the bow hand and the turn passes with fresh wind.
    pub fn release_charge(&mut self, cursor: Vec2) {
        if !self.charge.active {
            log::debug!("Release ignored, not charging");
            return;
        }
        let power = self.charge.power;
        self.charge = Charge::idle();

        if power < self.tuning.min_fire_power {
            log::debug!("Player {} shot cancelled at power {}", self.turn.number(), power);
            self.events.push(MatchEvent::ShotCancelled {
                by: self.turn,
                power,
            });
            return;
        }

        let cursor = clamp_to_arena(cursor, self.tuning.arena_width, self.tuning.arena_height);
        let shooter = self.current();
        let angle = aim_angle(shooter.pos, cursor);
        let dir = direction(angle);
        let velocity = dir * power.min(self.tuning.max_power);
        let start = shooter.nock_point(self.tuning.nock_height) + dir * self.tuning.launch_offset;

        let id = self.next_entity_id();
        let owner = self.turn;
        self.arrows.push(Arrow::new(id, owner, start, velocity));
        self.events.push(MatchEvent::ArrowFired {
            id,
            owner,
            velocity,
        });
        log::debug!(
            "Player {} fired arrow {} at {:.2} rad, power {:.1}",
            owner.number(),
            id,
            angle,
            power
        );

        self.switch_turn();
    }

    /// Hand the bow to the other archer and redraw the wind
    fn switch_turn(&mut self) {
        self.turn = self.turn.other();
        self.wind = Wind::draw(&mut self.rng, self.tuning.wind_max);
        log::debug!(
            "Player {}'s turn, wind {:.2} {:?}",
            self.turn.number(),
            self.wind.strength,
            self.wind.direction
        );
        self.events.push(MatchEvent::TurnChanged {
            to: self.turn,
            wind: self.wind,
        });
    }

    /// Start a new round. Only honoured once the match is over.
    pub fn restart(&mut self) {
        if !self.is_game_over() {
            log::debug!("Restart ignored, match still running");
            return;
        }
        self.reset();
    }

    /// One simulation step without intents.
    ///
    /// Events from the previous step are dropped first. Nothing else changes after game over.
    pub fn advance(&mut self) {
        self.events.clear();
        self.step();
    }

    /// Charge, arrows and blood for one tick, keeping events already recorded this tick
    fn step(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.time_ticks += 1;

        if self.charge.active {
            self.charge.power =
                (self.charge.power + self.tuning.charge_rate).clamp(0.0, self.tuning.max_power);
        }

        let wind = self.wind;
        for arrow in self.arrows.iter_mut() {
            if !arrow.active {
                continue;
            }
            if !arrow.advance(wind, &self.tuning, 1.0) {
                log::trace!("Arrow {} left the arena", arrow.id);
                self.events.push(MatchEvent::ArrowLeftArena { id: arrow.id });
                continue;
            }

            // Ground first: an arrow buried in a hill cannot hit anyone
            if arrow.pos.y >= self.terrain.height_at(arrow.pos.x) {
                arrow.deactivate();
                log::trace!("Arrow {} landed at {:?}", arrow.id, arrow.pos);
                self.events.push(MatchEvent::ArrowLanded {
                    id: arrow.id,
                    pos: arrow.pos,
                });
                continue;
            }

            // The match was decided earlier this tick
            if self.winner.is_some() {
                continue;
            }

            // Only the archer who did not shoot can be struck
            let target_id = arrow.owner.other();
            let target = &mut self.players[target_id.index()];
            let hitbox = arrow.hitbox(self.tuning.arrow_half_size);
            let Some(zone) = classify_hit(&hitbox, &target.head_zone(), &target.body_zone())
            else {
                continue;
            };

            let damage = self.tuning.damage_for(zone);
            target.apply_damage(damage);
            arrow.deactivate();
            self.particles.spawn_burst(
                target.wound_point(zone),
                self.tuning.burst_for(zone),
                &self.tuning,
                &mut self.rng,
            );
            log::debug!(
                "Arrow {} hit player {} ({:?}) for {}, {} left",
                arrow.id,
                target_id.number(),
                zone,
                damage,
                target.health
            );
            self.events.push(MatchEvent::Hit {
                target: target_id,
                zone,
                damage,
                health_left: target.health,
            });

            if !target.is_alive() {
                let winner = arrow.owner;
                self.winner = Some(winner);
                self.charge = Charge::idle();
                log::info!("Player {} wins", winner.number());
                self.events.push(MatchEvent::MatchOver { winner });
            }
        }
        self.arrows.retain(|a| a.active);

        self.particles.advance_all(&self.tuning);
    }
}
