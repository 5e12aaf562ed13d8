//! Enemy entities: chasers, shooters, and bosses
//!
//! Enemies are a tagged variant over one common record rather than an
//! inheritance chain: every enemy has the same position/health/speed core,
//! and `EnemyKind` carries the kind-specific payload.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::BossState;
use crate::consts::*;
use crate::direction;

/// Archetype chosen at spawn; selects the base stat row before wave scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Normal,
    Fast,
    Tanky,
}

impl Archetype {
    /// Unscaled base stats for this archetype
    pub fn base_stats(self) -> EnemyStats {
        match self {
            Archetype::Normal => EnemyStats {
                health: 30.0,
                speed: 90.0,
                size: 14.0,
                gold: 5,
            },
            Archetype::Fast => EnemyStats {
                health: 18.0,
                speed: 150.0,
                size: 11.0,
                gold: 7,
            },
            Archetype::Tanky => EnemyStats {
                health: 70.0,
                speed: 55.0,
                size: 20.0,
                gold: 12,
            },
        }
    }
}

/// Stat row for constructing an enemy (wave scaling applied by the spawner)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub size: f32,
    pub gold: u32,
}

/// Kind-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks straight at the player
    Chaser,
    /// Holds at range and fires aimed shots
    Shooter {
        range: f32,
        fire_timer: f32,
        fire_interval: f32,
        shot_speed: f32,
        shot_damage: f32,
    },
    /// Multi-phase boss with telegraphed specials
    Boss(BossState),
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Collision radius
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub archetype: Archetype,
    /// Drop value, consumed exactly once on death
    pub gold: u32,
    pub kind: EnemyKind,
}

/// An aimed shot a shooter or boss wants fired this tick.
/// Spawning is deferred to the orchestrator, which owns the id allocator.
#[derive(Debug, Clone, Copy)]
pub struct ShotRequest {
    pub pos: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, archetype: Archetype, stats: EnemyStats, kind: EnemyKind) -> Self {
        Self {
            id,
            pos,
            size: stats.size,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            archetype,
            gold: stats.gold,
            kind,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply clamped damage. Returns true when this call killed the enemy;
    /// further calls on a dead enemy are no-ops.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.health == 0.0
    }

    /// Seek-to-player steering plus this enemy's share of the separation
    /// force. Shooters hold at range; an expired fire clock yields a shot
    /// request for the orchestrator to spawn.
    pub fn advance(&mut self, separation: Vec2, player_pos: Vec2, dt: f32) -> Option<ShotRequest> {
        if !self.is_alive() {
            return None;
        }
        let to_player = direction(self.pos, player_pos);
        let dist = self.pos.distance(player_pos);

        match &mut self.kind {
            EnemyKind::Chaser | EnemyKind::Boss(_) => {
                self.pos += (to_player * self.speed + separation) * dt;
                None
            }
            EnemyKind::Shooter {
                range,
                fire_timer,
                fire_interval,
                shot_speed,
                shot_damage,
            } => {
                let seek = if dist > *range { to_player * self.speed } else { Vec2::ZERO };
                self.pos += (seek + separation) * dt;

                *fire_timer += dt;
                if *fire_timer >= *fire_interval && dist <= *range * 1.25 {
                    *fire_timer = 0.0;
                    return Some(ShotRequest {
                        pos: self.pos,
                        dir: to_player,
                        speed: *shot_speed,
                        damage: *shot_damage,
                    });
                }
                None
            }
        }
    }
}

/// Pairwise repulsion keeping enemies from stacking into one blob.
///
/// For each pair closer than 1.5x their combined radii, both receive a force
/// proportional to `(overlap / separation_radius) * strength` along the
/// separating axis. Exactly coincident pairs get a random axis so they still
/// split apart.
pub fn separation_forces(enemies: &[Enemy], rng: &mut impl Rng) -> Vec<Vec2> {
    let mut forces = vec![Vec2::ZERO; enemies.len()];
    for i in 0..enemies.len() {
        for j in (i + 1)..enemies.len() {
            if !enemies[i].is_alive() || !enemies[j].is_alive() {
                continue;
            }
            let separation_radius = (enemies[i].size + enemies[j].size) * SEPARATION_FACTOR;
            let delta = enemies[i].pos - enemies[j].pos;
            let dist = delta.length();
            if dist >= separation_radius {
                continue;
            }
            let axis = if dist > f32::EPSILON {
                delta / dist
            } else {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                Vec2::from_angle(angle)
            };
            let overlap = separation_radius - dist;
            let force = axis * (overlap / separation_radius) * SEPARATION_STRENGTH;
            forces[i] += force;
            forces[j] -= force;
        }
    }
    forces
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn chaser(id: u32, pos: Vec2) -> Enemy {
        let stats = Archetype::Normal.base_stats();
        Enemy::new(id, pos, Archetype::Normal, stats, EnemyKind::Chaser)
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut enemy = chaser(1, Vec2::ZERO);
        assert!(enemy.take_damage(1e6));
        assert_eq!(enemy.health, 0.0);
        // A dead enemy reports no further kills
        assert!(!enemy.take_damage(10.0));
        assert_eq!(enemy.health, 0.0);
    }

    #[test]
    fn test_kill_reported_exactly_once() {
        let mut enemy = chaser(1, Vec2::ZERO);
        assert!(!enemy.take_damage(10.0));
        assert!(enemy.take_damage(100.0));
        assert!(!enemy.take_damage(100.0));
    }

    #[test]
    fn test_chaser_seeks_player() {
        let mut enemy = chaser(1, Vec2::new(0.0, 0.0));
        let player = Vec2::new(100.0, 0.0);
        enemy.advance(Vec2::ZERO, player, 0.1);
        assert!(enemy.pos.x > 0.0);
        assert_eq!(enemy.pos.y, 0.0);
    }

    #[test]
    fn test_dead_enemy_does_not_move() {
        let mut enemy = chaser(1, Vec2::ZERO);
        enemy.take_damage(1e6);
        enemy.advance(Vec2::ONE * 100.0, Vec2::new(100.0, 0.0), 0.1);
        assert_eq!(enemy.pos, Vec2::ZERO);
    }

    #[test]
    fn test_shooter_holds_range_and_fires() {
        let stats = Archetype::Normal.base_stats();
        let mut enemy = Enemy::new(
            1,
            Vec2::new(100.0, 0.0),
            Archetype::Normal,
            stats,
            EnemyKind::Shooter {
                range: 200.0,
                fire_timer: 0.0,
                fire_interval: 1.0,
                shot_speed: 250.0,
                shot_damage: 6.0,
            },
        );
        let player = Vec2::ZERO;

        // In range: holds position, no shot until the clock expires
        assert!(enemy.advance(Vec2::ZERO, player, 0.5).is_none());
        assert_eq!(enemy.pos, Vec2::new(100.0, 0.0));
        let shot = enemy.advance(Vec2::ZERO, player, 0.5).expect("clock expired");
        assert!(shot.dir.x < 0.0);
        // Clock reset after firing
        assert!(enemy.advance(Vec2::ZERO, player, 0.1).is_none());
    }

    #[test]
    fn test_separation_pushes_overlapping_pair_apart() {
        let mut rng = Pcg32::seed_from_u64(7);
        let enemies = vec![chaser(1, Vec2::new(0.0, 0.0)), chaser(2, Vec2::new(5.0, 0.0))];
        let forces = separation_forces(&enemies, &mut rng);
        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        // Equal and opposite
        assert!((forces[0] + forces[1]).length() < 1e-3);
    }

    #[test]
    fn test_separation_ignores_distant_pair() {
        let mut rng = Pcg32::seed_from_u64(7);
        let enemies = vec![chaser(1, Vec2::ZERO), chaser(2, Vec2::new(500.0, 0.0))];
        let forces = separation_forces(&enemies, &mut rng);
        assert_eq!(forces[0], Vec2::ZERO);
        assert_eq!(forces[1], Vec2::ZERO);
    }

    #[test]
    fn test_separation_coincident_pair_gets_random_axis() {
        let mut rng = Pcg32::seed_from_u64(7);
        let enemies = vec![chaser(1, Vec2::new(50.0, 50.0)), chaser(2, Vec2::new(50.0, 50.0))];
        let forces = separation_forces(&enemies, &mut rng);
        // Full overlap: force magnitude equals the strength constant
        assert!((forces[0].length() - SEPARATION_STRENGTH).abs() < 1e-3);
        assert!((forces[1].length() - SEPARATION_STRENGTH).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn health_stays_clamped(amounts in proptest::collection::vec(0.0f32..500.0, 0..40)) {
            let mut enemy = chaser(1, Vec2::ZERO);
            for amount in amounts {
                enemy.take_damage(amount);
                prop_assert!(enemy.health >= 0.0);
                prop_assert!(enemy.health <= enemy.max_health);
            }
        }
    }
}
