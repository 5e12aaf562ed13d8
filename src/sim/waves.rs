//! Wave cadence and difficulty scaling
//!
//! Two independent accumulators drive the pressure curve: the wave clock
//! (advancing a wave every 60 s shrinks the spawn interval) and the spawn
//! timer (one enemy per expiry, placed just outside the camera). Spawn
//! positions are clamped into world bounds here, before any spawn call.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Archetype, EnemyKind, EnemyStats};
use super::state::{Camera, GameState};
use crate::clamp_to_world;
use crate::consts::*;

const SHOOTER_MIN_WAVE: u32 = 3;
const SHOOTER_CHANCE: f32 = 0.2;
const SHOOTER_RANGE: f32 = 260.0;
const SHOOTER_FIRE_INTERVAL: f32 = 2.5;
const SHOOTER_SHOT_SPEED: f32 = 240.0;
const SHOOTER_SHOT_DAMAGE: f32 = 6.0;

/// Wave bookkeeping: the sole difficulty dial tied to elapsed time
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WaveState {
    /// 1-based wave number
    pub wave: u32,
    pub wave_timer: f32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveState {
    pub fn new() -> Self {
        Self {
            wave: 1,
            wave_timer: 0.0,
            spawn_timer: 0.0,
            spawn_interval: SPAWN_INTERVAL_START,
        }
    }
}

/// Base stats scaled by the current wave:
/// health x(1 + 0.2(w-1)), speed x(1 + 0.05(w-1)), gold x(1 + 0.1(w-1))
pub fn scaled_stats(archetype: Archetype, wave: u32) -> EnemyStats {
    let w = wave.saturating_sub(1) as f32;
    let base = archetype.base_stats();
    EnemyStats {
        health: base.health * (1.0 + 0.2 * w),
        speed: base.speed * (1.0 + 0.05 * w),
        size: base.size,
        gold: (base.gold as f32 * (1.0 + 0.1 * w)).round() as u32,
    }
}

/// Pick a spawn point just outside a uniformly chosen camera edge, clamped
/// into world bounds
fn edge_spawn(rng: &mut impl Rng, camera: &Camera) -> Vec2 {
    let half = camera.view_size * 0.5;
    let along_x = camera.center.x + (rng.random::<f32>() - 0.5) * camera.view_size.x;
    let along_y = camera.center.y + (rng.random::<f32>() - 0.5) * camera.view_size.y;
    let pos = match rng.random_range(0..4u32) {
        0 => Vec2::new(along_x, camera.center.y - half.y - SPAWN_MARGIN),
        1 => Vec2::new(along_x, camera.center.y + half.y + SPAWN_MARGIN),
        2 => Vec2::new(camera.center.x - half.x - SPAWN_MARGIN, along_y),
        _ => Vec2::new(camera.center.x + half.x + SPAWN_MARGIN, along_y),
    };
    clamp_to_world(pos, 0.0)
}

/// Advance the wave clock and spawn timer, spawning as they expire
pub fn update(state: &mut GameState, camera: &Camera, dt: f32) {
    state.waves.wave_timer += dt;
    if state.waves.wave_timer >= WAVE_DURATION {
        state.waves.wave_timer -= WAVE_DURATION;
        let finished = state.waves.wave;
        state.waves.wave += 1;
        state.waves.spawn_interval =
            (state.waves.spawn_interval * SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_FLOOR);
        log::info!(
            "wave {} begins (spawn interval {:.2}s)",
            state.waves.wave,
            state.waves.spawn_interval
        );

        if finished % BOSS_WAVE_INTERVAL == 0 {
            let pos = edge_spawn(&mut state.rng, camera);
            state.spawn_boss(pos, finished);
        }
    }

    state.waves.spawn_timer += dt;
    if state.waves.spawn_timer >= state.waves.spawn_interval {
        state.waves.spawn_timer = 0.0;
        spawn_one(state, camera);
    }
}

fn spawn_one(state: &mut GameState, camera: &Camera) {
    let pos = edge_spawn(&mut state.rng, camera);
    let wave = state.waves.wave;

    let archetype = match state.rng.random_range(0..3u32) {
        0 => Archetype::Normal,
        1 => Archetype::Fast,
        _ => Archetype::Tanky,
    };
    let stats = scaled_stats(archetype, wave);

    let kind = if wave >= SHOOTER_MIN_WAVE && state.rng.random::<f32>() < SHOOTER_CHANCE {
        EnemyKind::Shooter {
            range: SHOOTER_RANGE,
            fire_timer: 0.0,
            fire_interval: SHOOTER_FIRE_INTERVAL,
            shot_speed: SHOOTER_SHOT_SPEED,
            shot_damage: SHOOTER_SHOT_DAMAGE * (1.0 + 0.1 * wave.saturating_sub(1) as f32),
        }
    } else {
        EnemyKind::Chaser
    };

    state.spawn_enemy(pos, archetype, stats, kind);
}
