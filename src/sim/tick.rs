//! Per-tick orchestration
//!
//! One call advances the whole simulation by `dt` seconds, in a fixed
//! sequence: wave cadence, player commands and movement, weapon/ability
//! clocks, enemy steering (with separation) and boss machines, pickup and
//! visual timers, then collision resolution, then reaping. Collisions always
//! run after every position update for the tick, never interleaved.

use glam::Vec2;

use super::boss;
use super::enemy::{self, EnemyKind, ShotRequest};
use super::state::{GameEvent, GameState};
use super::waves;
use super::weapons::Projectile;
use crate::consts::*;
use crate::{clamp_to_world, direction};

const ENEMY_SHOT_RADIUS: f32 = 5.0;
const ENEMY_SHOT_TTL: f32 = 4.0;

/// Input commands for a single tick, derived by the host from key state.
/// Triggers are edge-style: true on the frame the command is issued.
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Move intent; normalized before use
    pub move_dir: Vec2,
    pub dash: bool,
    pub toggle_shield: bool,
    pub heal: bool,
    pub blast: bool,
    pub time_slow: bool,
    /// Pause toggle
    pub pause: bool,
    /// Host viewport; spawns land just outside it
    pub camera: super::state::Camera,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            move_dir: Vec2::ZERO,
            dash: false,
            toggle_shield: false,
            heal: false,
            blast: false,
            time_slow: false,
            pause: false,
            camera: super::state::Camera::default(),
        }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.paused = !state.paused;
    }
    if state.paused || state.game_over {
        return;
    }

    state.elapsed += dt;

    // Wave clock and spawn cadence
    waves::update(state, &input.camera, dt);

    // Player commands and movement
    state.player.update_dash(dt);
    if input.dash {
        state.player.try_dash();
    }
    if input.toggle_shield {
        if let Some(shield) = state.shield.as_mut() {
            shield.toggle();
        }
    }
    if input.heal {
        if let Some(heal) = state.heal.as_mut() {
            if let Some(amount) = heal.trigger() {
                state.player.heal(amount);
            }
        }
    }
    if input.blast {
        let pos = state.player.pos;
        if let Some(blast) = state.blast.as_mut() {
            blast.trigger(pos);
        }
    }
    if input.time_slow {
        if let Some(slow) = state.time_slow.as_mut() {
            slow.trigger();
        }
    }

    let move_dir = input.move_dir.normalize_or_zero();
    let step = move_dir * state.player.current_speed() * dt;
    state.player.pos = clamp_to_world(state.player.pos + step, state.player.size);
    let player_pos = state.player.pos;

    // Enemies and their projectiles run on scaled time while slow is active
    let enemy_dt = dt * state.time_slow.as_ref().map_or(1.0, |t| t.time_scale());

    // Weapon and ability clocks
    if let Some(weapon) = state.projectile_weapon.as_mut() {
        weapon.update(dt, player_pos, &state.enemies, &mut state.ids);
    }
    if let Some(weapon) = state.homing_weapon.as_mut() {
        weapon.update(dt, player_pos, &state.enemies, &mut state.ids);
    }
    if let Some(melee) = state.melee_weapon.as_mut() {
        melee.update(dt, state.elapsed);
    }
    if let Some(aura) = state.aura_weapon.as_mut() {
        aura.update(dt);
    }
    if let Some(shield) = state.shield.as_mut() {
        shield.update(dt);
    }
    if let Some(heal) = state.heal.as_mut() {
        heal.update(dt);
    }
    if let Some(slow) = state.time_slow.as_mut() {
        slow.update(dt);
    }
    if let Some(blast) = state.blast.as_mut() {
        blast.update(dt);
    }

    // Enemy steering: seek plus separation, boss machines on top
    let forces = enemy::separation_forces(&state.enemies, &mut state.rng);
    let mut shot_requests: Vec<ShotRequest> = Vec::new();
    let mut slam_damage = 0.0;
    for (i, enemy) in state.enemies.iter_mut().enumerate() {
        if let Some(request) = enemy.advance(forces[i], player_pos, enemy_dt) {
            shot_requests.push(request);
        }
        if matches!(enemy.kind, EnemyKind::Boss(_)) {
            let out = boss::update_boss(enemy, player_pos, enemy_dt, &mut state.rng, &mut state.telegraphs);
            shot_requests.extend(out.shots);
            slam_damage += out.player_damage;
        }
    }
    for request in shot_requests {
        let id = state.ids.next();
        state.enemy_shots.push(Projectile {
            id,
            pos: request.pos,
            vel: request.dir * request.speed,
            radius: ENEMY_SHOT_RADIUS,
            damage: request.damage,
            ttl: ENEMY_SHOT_TTL,
        });
    }
    if slam_damage > 0.0 {
        state.damage_player(slam_damage);
    }

    for shot in &mut state.enemy_shots {
        shot.advance(enemy_dt);
    }
    state.enemy_shots.retain(|s| !s.expired());

    // Pickup and visual-effect timers
    for gem in &mut state.gems {
        gem.ttl -= dt;
    }
    for magnet in &mut state.magnets {
        magnet.ttl -= dt;
    }
    for text in &mut state.floating_texts {
        text.age += dt;
    }
    state.floating_texts.retain(|t| t.age < t.duration);
    for telegraph in &mut state.telegraphs {
        telegraph.age += dt;
    }
    state.telegraphs.retain(|t| t.age < t.duration);

    // All positions are final: resolve every interaction once
    super::collision::resolve(state);

    // Reap dead enemies into drops. Gold is consumed exactly once; each
    // death drops a gem and has an independent magnet roll.
    let mut gem_spawns: Vec<Vec2> = Vec::new();
    let mut magnet_spawns: Vec<Vec2> = Vec::new();
    let mut gold_gained = 0u32;
    let mut final_boss_down = false;
    for enemy in &mut state.enemies {
        if enemy.is_alive() {
            continue;
        }
        gem_spawns.push(enemy.pos);
        gold_gained += std::mem::take(&mut enemy.gold);
        if let EnemyKind::Boss(b) = &enemy.kind {
            if b.wave >= FINAL_BOSS_WAVE {
                final_boss_down = true;
            }
        }
    }
    state.enemies.retain(|e| e.is_alive());
    state.player.gold += gold_gained;
    for pos in &gem_spawns {
        if state.roll() < MAGNET_DROP_CHANCE {
            magnet_spawns.push(*pos);
        }
    }
    for pos in gem_spawns {
        state.spawn_gem(pos, GEM_VALUE);
    }
    for pos in magnet_spawns {
        state.spawn_magnet(pos);
    }
    if final_boss_down && !state.game_won {
        state.game_won = true;
        state.events.push(GameEvent::GameWon);
    }

    // Magnet power-up timer; radius resets exactly when the timer crosses zero
    if state.magnet_duration > 0.0 {
        state.magnet_duration -= dt;
        if state.magnet_duration <= 0.0 {
            state.magnet_duration = 0.0;
            state.magnet_radius_active = 0.0;
        }
    }

    // Magnet pickups are collected by touch and apply immediately
    let collect_radius = state.player.collect_radius;
    let mut activated: Option<(f32, f32)> = None;
    state.magnets.retain(|magnet| {
        if magnet.pos.distance(player_pos) < collect_radius {
            activated = Some((magnet.radius, magnet.duration));
            false
        } else {
            magnet.ttl > 0.0
        }
    });
    if let Some((radius, duration)) = activated {
        state.magnet_radius_active = radius;
        state.magnet_duration = duration;
    }

    // Gem pull and collection. Pulled gems move toward the player before the
    // collection check, rather than teleporting; the order makes collection
    // frame-accurate.
    let magnet_radius = state.effective_magnet_radius();
    let mut xp_gained = 0u32;
    state.gems.retain_mut(|gem| {
        let dist = gem.pos.distance(player_pos);
        if dist > f32::EPSILON && dist < magnet_radius {
            let pull = direction(gem.pos, player_pos) * MAGNET_PULL_SPEED * dt;
            gem.pos += pull.clamp_length_max(dist);
        }
        if gem.pos.distance(player_pos) < collect_radius {
            xp_gained += gem.value;
            return false;
        }
        gem.ttl > 0.0
    });

    let levels = state.player.gain_xp(xp_gained);
    for i in 0..levels {
        let level = state.player.level - levels + i + 1;
        state.events.push(GameEvent::LeveledUp { level });
    }

    // Vendor proximity drives the shop UI
    let near_vendor = state.player.pos.distance(state.vendor.pos) < state.vendor.radius;
    if near_vendor != state.shop_open {
        state.shop_open = near_vendor;
        state.events.push(if near_vendor {
            GameEvent::ShopOpened
        } else {
            GameEvent::ShopClosed
        });
    }
}
