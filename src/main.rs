//! Headless demo driver
//!
//! Seeds a run and simulates a few minutes of play with synthetic input,
//! logging wave and boss events as they happen. Real hosts (renderer +
//! input capture) drive exactly the same API.

use glam::Vec2;

use duskswarm::sim::{GameState, TickInput, tick, upgrades};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let mut state = GameState::new(seed);
    log::info!("starting run with seed {seed}");

    let dt = 1.0 / 60.0;
    let mut input = TickInput::default();
    let minutes = 3u32;

    for frame in 0u32..(60 * 60 * minutes) {
        let t = frame as f32 * dt;
        // Circle the arena center, with periodic ability triggers
        input.move_dir = Vec2::new((t * 0.7).cos(), (t * 0.7).sin());
        input.dash = frame % 240 == 0;
        input.heal = frame % 600 == 0;
        input.blast = frame % 900 == 0;
        input.camera.center = state.player.pos;

        tick(&mut state, &input, dt);

        for event in state.drain_events() {
            log::info!("event at {:.1}s: {event:?}", state.elapsed);
            // A real UI would open the upgrade picker here; the demo always
            // takes more health
            if matches!(event, duskswarm::sim::GameEvent::LeveledUp { .. }) {
                upgrades::apply_upgrade_str(&mut state, "player_health");
            }
        }
        if state.game_over || state.game_won {
            break;
        }
    }

    let snapshot = serde_json::to_string_pretty(&state.player).expect("snapshot serializes");
    println!("{snapshot}");
    println!(
        "run ended at {:.1}s: wave {}, level {}, {} enemies alive",
        state.elapsed,
        state.waves.wave,
        state.player.level,
        state.enemies.len()
    );
}
