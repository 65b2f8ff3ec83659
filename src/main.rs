//! Stickman Archery headless driver
//!
//! Runs a scripted duel without a window: both archers take turns lobbing
//! arrows at each other until someone falls. Useful for checking balance
//! changes in a tuning file.
//!
//! Usage: `stickman-archery [--seed N] [--tuning FILE] [--snapshot]`

use std::error::Error;

use glam::Vec2;
use stickman_archery::Tuning;
use stickman_archery::consts::TICKS_PER_SECOND;
use stickman_archery::sim::{Intent, MatchEvent, MatchState, Phase, TickInput, tick};

/// Give up after five minutes of simulated play
const MAX_TICKS: u64 = TICKS_PER_SECOND as u64 * 60 * 5;

/// Charge durations cycled through shot by shot
const CHARGE_PATTERN: [u32; 5] = [24, 30, 27, 33, 21];

struct Args {
    seed: u64,
    tuning: Option<String>,
    snapshot: bool,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        seed: 12345,
        tuning: None,
        snapshot: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => {
                let value = it.next().ok_or("--seed needs a value")?;
                args.seed = value.parse()?;
            }
            "--tuning" => {
                args.tuning = Some(it.next().ok_or("--tuning needs a path")?);
            }
            "--snapshot" => args.snapshot = true,
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }
    Ok(args)
}

/// Aim point for the current shooter: above the opponent, higher for longer shots
fn aim_point(state: &MatchState) -> Vec2 {
    let shooter = state.current().pos;
    let target = state.player(state.turn.other()).pos;
    let lift = (target.x - shooter.x).abs() * 0.6;
    Vec2::new((shooter.x + target.x) * 0.5, target.y - lift)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = parse_args()?;

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    log::info!("Stickman Archery (headless) starting, preset {}", tuning.preset.as_str());

    let mut state = MatchState::new(args.seed, tuning);
    let mut shots = 0usize;
    let mut held = 0u32;

    while !state.is_game_over() && state.time_ticks < MAX_TICKS {
        let mut input = TickInput::default();
        match state.phase() {
            Phase::Aiming => {
                input.intents.push(Intent::StartCharge(aim_point(&state)));
                held = 0;
            }
            Phase::Charging => {
                held += 1;
                if held >= CHARGE_PATTERN[shots % CHARGE_PATTERN.len()] {
                    input.intents.push(Intent::ReleaseCharge(aim_point(&state)));
                    shots += 1;
                }
            }
            Phase::Resolving | Phase::GameOver => {}
        }

        tick(&mut state, &input);

        for event in &state.events {
            if let MatchEvent::Hit {
                target,
                zone,
                health_left,
                ..
            } = event
            {
                log::info!(
                    "Player {} hit in the {:?}, {} health left ({:.0}%)",
                    target.number(),
                    zone,
                    health_left,
                    state.player(*target).health_fraction() * 100.0
                );
            }
        }
    }

    match state.winner {
        Some(winner) => println!(
            "Player {} wins after {} shots ({} ticks)",
            winner.number(),
            shots,
            state.time_ticks
        ),
        None => println!("No winner after {} shots ({} ticks)", shots, state.time_ticks),
    }

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    }
    Ok(())
}
