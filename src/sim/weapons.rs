//! Player weapon controllers
//!
//! Each weapon owns its own fire clock and the collection of objects it has
//! fired. A weapon the player has not unlocked is simply absent from
//! `GameState` (an `Option`), never partially constructed. Fire clocks count
//! up from zero to a threshold, then reset and fire.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::state::IdGen;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::direction;

const PROJECTILE_RADIUS: f32 = 5.0;
const PROJECTILE_SPEED: f32 = 420.0;
const PROJECTILE_TTL: f32 = 2.5;
const PROJECTILE_INTERVAL: f32 = 0.6;
const PROJECTILE_DAMAGE: f32 = 12.0;

const MISSILE_RADIUS: f32 = 6.0;
const MISSILE_SPEED: f32 = 300.0;
const MISSILE_TTL: f32 = 5.0;
const MISSILE_TURN_RATE: f32 = 6.0;
const MISSILE_INTERVAL: f32 = 1.4;
const MISSILE_DAMAGE: f32 = 18.0;

pub const BLADE_RADIUS: f32 = 14.0;
const BLADE_ORBIT_RADIUS: f32 = 70.0;
const BLADE_ORBIT_SPEED: f32 = 3.0;
const BLADE_DAMAGE: f32 = 10.0;
const BLADE_ATTACK_COOLDOWN: f32 = 0.5;

const AURA_RADIUS: f32 = 110.0;
const AURA_DAMAGE: f32 = 4.0;
const AURA_INTERVAL: f32 = 0.75;

/// A straight-flying shot (player weapons and enemy fire share this shape;
/// ownership is carried by the collection holding it)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub ttl: f32,
}

impl Projectile {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.ttl -= dt;
    }

    pub fn expired(&self) -> bool {
        self.ttl <= 0.0 || !in_world(self.pos)
    }
}

fn in_world(pos: Vec2) -> bool {
    pos.x >= -64.0 && pos.x <= WORLD_WIDTH + 64.0 && pos.y >= -64.0 && pos.y <= WORLD_HEIGHT + 64.0
}

fn nearest_living(enemies: &[Enemy], from: Vec2) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .partial_cmp(&b.pos.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Auto-fires a straight shot at the nearest living enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileWeapon {
    pub fire_timer: f32,
    pub fire_interval: f32,
    pub damage: f32,
    pub shots: Vec<Projectile>,
}

impl Default for ProjectileWeapon {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileWeapon {
    pub fn new() -> Self {
        Self {
            fire_timer: 0.0,
            fire_interval: PROJECTILE_INTERVAL,
            damage: PROJECTILE_DAMAGE,
            shots: Vec::new(),
        }
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, enemies: &[Enemy], ids: &mut IdGen) {
        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            // Hold the clock at the threshold until there is something to shoot
            if let Some(target) = nearest_living(enemies, player_pos) {
                self.fire_timer = 0.0;
                self.shots.push(Projectile {
                    id: ids.next(),
                    pos: player_pos,
                    vel: direction(player_pos, target.pos) * PROJECTILE_SPEED,
                    radius: PROJECTILE_RADIUS,
                    damage: self.damage,
                    ttl: PROJECTILE_TTL,
                });
            } else {
                self.fire_timer = self.fire_interval;
            }
        }

        for shot in &mut self.shots {
            shot.advance(dt);
        }
        self.shots.retain(|s| !s.expired());
    }
}

/// A homing missile steering toward a target enemy id.
/// The target is a weak back-reference: when it dies the missile re-acquires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub ttl: f32,
    pub target: Option<u32>,
}

/// Fires homing missiles at the nearest living enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomingWeapon {
    pub fire_timer: f32,
    pub fire_interval: f32,
    pub damage: f32,
    pub missiles: Vec<Missile>,
}

impl Default for HomingWeapon {
    fn default() -> Self {
        Self::new()
    }
}

impl HomingWeapon {
    pub fn new() -> Self {
        Self {
            fire_timer: 0.0,
            fire_interval: MISSILE_INTERVAL,
            damage: MISSILE_DAMAGE,
            missiles: Vec::new(),
        }
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, enemies: &[Enemy], ids: &mut IdGen) {
        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            if let Some(target) = nearest_living(enemies, player_pos) {
                self.fire_timer = 0.0;
                self.missiles.push(Missile {
                    id: ids.next(),
                    pos: player_pos,
                    vel: direction(player_pos, target.pos) * MISSILE_SPEED,
                    radius: MISSILE_RADIUS,
                    damage: self.damage,
                    ttl: MISSILE_TTL,
                    target: Some(target.id),
                });
            } else {
                self.fire_timer = self.fire_interval;
            }
        }

        for missile in &mut self.missiles {
            // Re-acquire when the target is gone or dead
            let target_pos = missile
                .target
                .and_then(|id| enemies.iter().find(|e| e.id == id && e.is_alive()))
                .map(|e| e.pos)
                .or_else(|| {
                    let fresh = nearest_living(enemies, missile.pos);
                    missile.target = fresh.map(|e| e.id);
                    fresh.map(|e| e.pos)
                });

            if let Some(target_pos) = target_pos {
                let desired = direction(missile.pos, target_pos) * MISSILE_SPEED;
                let blend = (MISSILE_TURN_RATE * dt).min(1.0);
                missile.vel =
                    (missile.vel + (desired - missile.vel) * blend).normalize_or_zero() * MISSILE_SPEED;
            }
            missile.pos += missile.vel * dt;
            missile.ttl -= dt;
        }
        self.missiles.retain(|m| m.ttl > 0.0 && in_world(m.pos));
    }
}

/// Blades orbiting the player. Re-hits against the same enemy are gated per
/// blade by an expiry map so one swing cannot damage twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeleeWeapon {
    pub blade_count: u32,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    /// Current base angle of blade 0
    pub spin: f32,
    pub damage: f32,
    pub attack_cooldown: f32,
    /// (blade index, enemy id) -> time of last hit. Transient combat
    /// bookkeeping, rebuilt naturally after a snapshot load.
    #[serde(skip)]
    hits: HashMap<(u32, u32), f32>,
}

impl Default for MeleeWeapon {
    fn default() -> Self {
        Self::new()
    }
}

impl MeleeWeapon {
    pub fn new() -> Self {
        Self {
            blade_count: 2,
            orbit_radius: BLADE_ORBIT_RADIUS,
            orbit_speed: BLADE_ORBIT_SPEED,
            spin: 0.0,
            damage: BLADE_DAMAGE,
            attack_cooldown: BLADE_ATTACK_COOLDOWN,
            hits: HashMap::new(),
        }
    }

    pub fn update(&mut self, dt: f32, now: f32) {
        self.spin = (self.spin + self.orbit_speed * dt) % std::f32::consts::TAU;
        // Bound the map: entries older than twice the cooldown can never gate
        self.hits.retain(|_, t| now - *t < self.attack_cooldown * 2.0);
    }

    /// World position of each blade
    pub fn blade_positions(&self, player_pos: Vec2) -> Vec<Vec2> {
        (0..self.blade_count)
            .map(|i| {
                let angle = self.spin + std::f32::consts::TAU * i as f32 / self.blade_count as f32;
                player_pos + Vec2::from_angle(angle) * self.orbit_radius
            })
            .collect()
    }

    /// True when this blade may damage this enemy now; records the hit.
    pub fn try_hit(&mut self, blade: u32, enemy_id: u32, now: f32) -> bool {
        match self.hits.get(&(blade, enemy_id)) {
            Some(&last) if now - last < self.attack_cooldown => false,
            _ => {
                self.hits.insert((blade, enemy_id), now);
                true
            }
        }
    }

    #[cfg(test)]
    fn tracked_hits(&self) -> usize {
        self.hits.len()
    }
}

/// Constant-presence damage field pulsing around the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraWeapon {
    pub radius: f32,
    pub damage: f32,
    pub tick_timer: f32,
    pub tick_interval: f32,
    /// Set when a pulse is due; consumed by collision resolution
    #[serde(skip)]
    pub pulse_due: bool,
}

impl Default for AuraWeapon {
    fn default() -> Self {
        Self::new()
    }
}

impl AuraWeapon {
    pub fn new() -> Self {
        Self {
            radius: AURA_RADIUS,
            damage: AURA_DAMAGE,
            tick_timer: 0.0,
            tick_interval: AURA_INTERVAL,
            pulse_due: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.tick_timer += dt;
        if self.tick_timer >= self.tick_interval {
            self.tick_timer = 0.0;
            self.pulse_due = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Archetype, EnemyKind};

    fn enemy_at(id: u32, pos: Vec2) -> Enemy {
        let stats = Archetype::Normal.base_stats();
        Enemy::new(id, pos, Archetype::Normal, stats, EnemyKind::Chaser)
    }

    #[test]
    fn test_projectile_weapon_fires_at_nearest() {
        let mut weapon = ProjectileWeapon::new();
        let mut ids = IdGen::default();
        let enemies = vec![
            enemy_at(1, Vec2::new(500.0, 0.0)),
            enemy_at(2, Vec2::new(100.0, 0.0)),
        ];

        weapon.update(weapon.fire_interval, Vec2::ZERO, &enemies, &mut ids);
        assert_eq!(weapon.shots.len(), 1);
        // Aimed at the closer enemy (due east)
        assert!(weapon.shots[0].vel.x > 0.0);
        assert_eq!(weapon.fire_timer, 0.0);
    }

    #[test]
    fn test_projectile_weapon_holds_fire_without_targets() {
        let mut weapon = ProjectileWeapon::new();
        let mut ids = IdGen::default();

        weapon.update(10.0, Vec2::ZERO, &[], &mut ids);
        assert!(weapon.shots.is_empty());
        // Clock parked at the threshold: first enemy sighted gets shot at once
        let enemies = vec![enemy_at(1, Vec2::new(50.0, 0.0))];
        weapon.update(0.001, Vec2::ZERO, &enemies, &mut ids);
        assert_eq!(weapon.shots.len(), 1);
    }

    #[test]
    fn test_projectiles_expire() {
        let mut weapon = ProjectileWeapon::new();
        let mut ids = IdGen::default();
        let enemies = vec![enemy_at(1, Vec2::new(100.0, 0.0))];

        weapon.update(weapon.fire_interval, Vec2::ZERO, &enemies, &mut ids);
        assert_eq!(weapon.shots.len(), 1);
        // A dt past the lifetime expires everything, including this call's shot
        weapon.update(PROJECTILE_TTL + 0.1, Vec2::ZERO, &enemies, &mut ids);
        assert!(weapon.shots.is_empty());
    }

    #[test]
    fn test_missile_steers_toward_target() {
        let mut weapon = HomingWeapon::new();
        let mut ids = IdGen::default();
        let enemies = vec![enemy_at(1, Vec2::new(0.0, 200.0))];

        weapon.update(weapon.fire_interval, Vec2::ZERO, &enemies, &mut ids);
        assert_eq!(weapon.missiles.len(), 1);
        assert_eq!(weapon.missiles[0].target, Some(1));

        // Move the target; velocity bends toward it over a few ticks
        let enemies = vec![enemy_at(1, Vec2::new(300.0, 0.0))];
        for _ in 0..30 {
            weapon.update(0.016, Vec2::ZERO, &enemies, &mut ids);
        }
        assert!(weapon.missiles[0].vel.x > 0.0);
    }

    #[test]
    fn test_missile_reacquires_when_target_dies() {
        let mut weapon = HomingWeapon::new();
        let mut ids = IdGen::default();
        let mut enemies = vec![
            enemy_at(1, Vec2::new(0.0, 200.0)),
            enemy_at(2, Vec2::new(200.0, 0.0)),
        ];

        weapon.update(weapon.fire_interval, Vec2::ZERO, &enemies, &mut ids);
        assert_eq!(weapon.missiles[0].target, Some(1));

        enemies[0].take_damage(1e6);
        weapon.update(0.016, Vec2::ZERO, &enemies, &mut ids);
        assert_eq!(weapon.missiles[0].target, Some(2));
    }

    #[test]
    fn test_blade_rehit_gated_by_cooldown() {
        let mut melee = MeleeWeapon::new();
        assert!(melee.try_hit(0, 7, 1.0));
        // Same blade, same enemy, inside the window
        assert!(!melee.try_hit(0, 7, 1.2));
        // Different blade may hit the same enemy
        assert!(melee.try_hit(1, 7, 1.2));
        // Window elapsed
        assert!(melee.try_hit(0, 7, 1.0 + melee.attack_cooldown));
    }

    #[test]
    fn test_stale_hit_entries_are_purged() {
        let mut melee = MeleeWeapon::new();
        melee.try_hit(0, 7, 1.0);
        melee.try_hit(1, 8, 1.0);
        assert_eq!(melee.tracked_hits(), 2);

        melee.update(0.016, 1.0 + melee.attack_cooldown * 2.0 + 0.1);
        assert_eq!(melee.tracked_hits(), 0);
    }

    #[test]
    fn test_blade_positions_evenly_spaced() {
        let melee = MeleeWeapon::new();
        let positions = melee.blade_positions(Vec2::ZERO);
        assert_eq!(positions.len(), 2);
        // Two blades are diametrically opposed
        assert!((positions[0] + positions[1]).length() < 1e-3);
        assert!((positions[0].length() - melee.orbit_radius).abs() < 1e-3);
    }

    #[test]
    fn test_aura_pulses_on_interval() {
        let mut aura = AuraWeapon::new();
        aura.update(aura.tick_interval / 2.0);
        assert!(!aura.pulse_due);
        aura.update(aura.tick_interval / 2.0);
        assert!(aura.pulse_due);
    }
}
