//! Pairwise interaction resolution
//!
//! Every entity-pair rule runs exactly once per tick, after all position
//! updates. Collections are filtered in a single pass per category, so an
//! entity removed by one rule is never processed again by a later rule in
//! the same tick; dead enemies are skipped everywhere and reaped by the
//! orchestrator before the tick ends.

use glam::Vec2;

use super::enemy::{Enemy, EnemyKind};
use super::state::{FloatingText, GameEvent, GameState};
use super::weapons::BLADE_RADIUS;
use crate::consts::CONTACT_DAMAGE;

/// Apply damage to one enemy, spawning its floating number and firing the
/// boss defeat event exactly once at the zero transition.
fn hit_enemy(
    enemy: &mut Enemy,
    damage: f32,
    texts: &mut Vec<FloatingText>,
    events: &mut Vec<GameEvent>,
) {
    if !enemy.is_alive() {
        return;
    }
    let killed = enemy.take_damage(damage);
    texts.push(FloatingText::new(enemy.pos, damage.round() as u32));
    if killed {
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            if !boss.defeated {
                boss.defeated = true;
                boss.pending.clear();
                events.push(GameEvent::BossDefeated { wave: boss.wave });
                log::info!("boss of wave {} defeated", boss.wave);
            }
        }
    }
}

fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Resolve every interaction for this tick
pub fn resolve(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_size = state.player.size;
    let now = state.elapsed;

    // Player <-> enemy contact. Deliberately not deduplicated: N overlapping
    // enemies inflict N * CONTACT_DAMAGE this tick.
    let mut contact_hits = 0u32;
    for enemy in &state.enemies {
        if enemy.is_alive() && circles_overlap(player_pos, player_size, enemy.pos, enemy.size) {
            contact_hits += 1;
        }
    }
    for _ in 0..contact_hits {
        state.damage_player(CONTACT_DAMAGE);
    }

    // Player projectiles <-> enemies: single target, first hit by collection
    // order wins, projectile consumed on hit.
    if let Some(weapon) = state.projectile_weapon.as_mut() {
        let enemies = &mut state.enemies;
        let texts = &mut state.floating_texts;
        let events = &mut state.events;
        weapon.shots.retain(|shot| {
            match enemies
                .iter_mut()
                .find(|e| e.is_alive() && circles_overlap(shot.pos, shot.radius, e.pos, e.size))
            {
                Some(enemy) => {
                    hit_enemy(enemy, shot.damage, texts, events);
                    false
                }
                None => true,
            }
        });
    }

    // Homing missiles: same single-target rule
    if let Some(weapon) = state.homing_weapon.as_mut() {
        let enemies = &mut state.enemies;
        let texts = &mut state.floating_texts;
        let events = &mut state.events;
        weapon.missiles.retain(|missile| {
            match enemies
                .iter_mut()
                .find(|e| e.is_alive() && circles_overlap(missile.pos, missile.radius, e.pos, e.size))
            {
                Some(enemy) => {
                    hit_enemy(enemy, missile.damage, texts, events);
                    false
                }
                None => true,
            }
        });
    }

    // Orbiting blades: a blade may re-damage the same enemy only after its
    // attack cooldown window
    if let Some(melee) = state.melee_weapon.as_mut() {
        let positions = melee.blade_positions(player_pos);
        for (blade, blade_pos) in positions.iter().enumerate() {
            for enemy in state.enemies.iter_mut() {
                if !enemy.is_alive() {
                    continue;
                }
                if circles_overlap(*blade_pos, BLADE_RADIUS, enemy.pos, enemy.size)
                    && melee.try_hit(blade as u32, enemy.id, now)
                {
                    hit_enemy(enemy, melee.damage, &mut state.floating_texts, &mut state.events);
                }
            }
        }
    }

    // Explosions: damage applied exactly once per instance, however long the
    // visual persists
    if let Some(blast) = state.blast.as_mut() {
        for explosion in blast.explosions.iter_mut() {
            if explosion.has_dealt_damage {
                continue;
            }
            explosion.has_dealt_damage = true;
            for enemy in state.enemies.iter_mut() {
                if enemy.is_alive()
                    && circles_overlap(explosion.pos, explosion.radius, enemy.pos, enemy.size)
                {
                    hit_enemy(enemy, explosion.damage, &mut state.floating_texts, &mut state.events);
                }
            }
        }
    }

    // Aura pulse: ticks all enemies inside the field
    if let Some(aura) = state.aura_weapon.as_mut() {
        if aura.pulse_due {
            aura.pulse_due = false;
            for enemy in state.enemies.iter_mut() {
                if enemy.is_alive() && enemy.pos.distance(player_pos) <= aura.radius + enemy.size {
                    hit_enemy(enemy, aura.damage, &mut state.floating_texts, &mut state.events);
                }
            }
        }
    }

    // Enemy fire <-> player, routed through the shield like contact damage
    let mut incoming: Vec<f32> = Vec::new();
    state.enemy_shots.retain(|shot| {
        if circles_overlap(shot.pos, shot.radius, player_pos, player_size) {
            incoming.push(shot.damage);
            false
        } else {
            true
        }
    });
    for damage in incoming {
        state.damage_player(damage);
    }
}
