//! Boss phase machine and telegraphed special attacks
//!
//! A boss is an `Enemy` carrying a `BossState`: a monotonic phase index
//! driven by remaining-health thresholds, a special-attack clock, and a
//! queue of pending timed attacks. Delayed effects are never host timers;
//! every telegraphed attack is a `{fire_at, payload}` entry drained during
//! the normal tick, so pending attacks are tick-synchronous and die with
//! the boss (or a reset) instead of firing into a stale world.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, ShotRequest};
use super::state::{Telegraph, TelegraphKind};
use crate::consts::*;
use crate::direction;

/// Health-ratio thresholds, sorted descending; crossing one advances the phase
pub const PHASE_THRESHOLDS: [f32; 3] = [0.75, 0.5, 0.25];

/// Per-phase probability triple for (radial burst, targeted volley, ground slam)
const PATTERN_WEIGHTS: [[f32; 3]; 4] = [
    [0.50, 0.30, 0.20],
    [0.40, 0.35, 0.25],
    [0.30, 0.40, 0.30],
    [0.25, 0.35, 0.40],
];

const BURST_DELAY: f32 = 0.8;
const VOLLEY_FIRST_DELAY: f32 = 0.5;
const VOLLEY_STAGGER: f32 = 0.2;
const SLAM_DELAY: f32 = 1.0;
const SLAM_BASE_RADIUS: f32 = 120.0;

/// State layered on the enemy record for boss-kind enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    /// Wave this boss belongs to (drives defeat/win reporting)
    pub wave: u32,
    /// Monotonically increasing, never exceeds the threshold count
    pub phase: usize,
    pub special_timer: f32,
    pub special_cooldown: f32,
    /// Cosmetic identity tier, bumped each phase transition
    pub palette: u32,
    /// Boss-local clock the pending queue compares against
    pub elapsed: f32,
    pub pending: Vec<PendingAttack>,
    /// Guards the defeat event to exactly-once
    pub defeated: bool,
}

impl BossState {
    pub fn new(wave: u32) -> Self {
        Self {
            wave,
            phase: 0,
            special_timer: 0.0,
            special_cooldown: BOSS_SPECIAL_COOLDOWN,
            palette: 0,
            elapsed: 0.0,
            pending: Vec::new(),
            defeated: false,
        }
    }
}

/// A scheduled attack effect, resolved when the boss clock reaches `fire_at`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAttack {
    pub fire_at: f32,
    pub payload: AttackPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttackPayload {
    /// Evenly spaced ring of shots from the boss's position at fire time
    RadialBurst { count: u32, speed: f32, damage: f32 },
    /// One shot aimed at the player's position at fire time, not telegraph time
    AimedShot { speed: f32, damage: f32 },
    /// Damage applied once, only if the player is inside the radius at expiry
    GroundSlam { center: Vec2, radius: f32, damage: f32 },
}

/// What one boss tick produced for the orchestrator to apply
#[derive(Debug, Default)]
pub struct BossOutput {
    pub shots: Vec<ShotRequest>,
    /// Ground-slam damage to route to the player this tick
    pub player_damage: f32,
}

/// Advance the phase machine, the special clock, and the pending queue.
/// Movement has already happened in `Enemy::advance`.
pub fn update_boss(
    enemy: &mut Enemy,
    player_pos: Vec2,
    dt: f32,
    rng: &mut impl Rng,
    telegraphs: &mut Vec<Telegraph>,
) -> BossOutput {
    let mut out = BossOutput::default();
    let ratio = if enemy.max_health > 0.0 {
        enemy.health / enemy.max_health
    } else {
        0.0
    };
    let boss_pos = enemy.pos;
    let alive = enemy.is_alive();

    let EnemyKind::Boss(boss) = &mut enemy.kind else {
        return out;
    };
    if !alive {
        // Dead bosses cancel everything still queued
        boss.pending.clear();
        return out;
    }

    boss.elapsed += dt;

    while boss.phase < PHASE_THRESHOLDS.len() && ratio <= PHASE_THRESHOLDS[boss.phase] {
        boss.phase += 1;
        boss.special_cooldown *= BOSS_PHASE_COOLDOWN_SCALE;
        boss.palette += 1;
        enemy.speed *= BOSS_PHASE_SPEED_SCALE;
        log::info!("boss wave {} entered phase {}", boss.wave, boss.phase);
    }

    boss.special_timer += dt;
    if boss.special_timer >= boss.special_cooldown {
        boss.special_timer = 0.0;
        schedule_attack(boss, boss_pos, player_pos, rng, telegraphs);
    }

    // Drain everything due this tick
    let mut i = 0;
    while i < boss.pending.len() {
        if boss.pending[i].fire_at <= boss.elapsed {
            let attack = boss.pending.swap_remove(i);
            resolve_attack(&attack.payload, boss_pos, player_pos, &mut out);
        } else {
            i += 1;
        }
    }

    out
}

/// Pick a pattern weighted by the current phase, emit its telegraph, and
/// queue the delayed effect(s).
fn schedule_attack(
    boss: &mut BossState,
    boss_pos: Vec2,
    player_pos: Vec2,
    rng: &mut impl Rng,
    telegraphs: &mut Vec<Telegraph>,
) {
    let phase = boss.phase.min(PATTERN_WEIGHTS.len() - 1);
    let weights = PATTERN_WEIGHTS[phase];
    let scale = 1.0 + 0.25 * phase as f32;
    let roll = rng.random::<f32>();

    if roll < weights[0] {
        telegraphs.push(Telegraph::new(
            boss_pos,
            90.0 + 12.0 * phase as f32,
            BURST_DELAY,
            TelegraphKind::Burst,
        ));
        boss.pending.push(PendingAttack {
            fire_at: boss.elapsed + BURST_DELAY,
            payload: AttackPayload::RadialBurst {
                count: 8 + 2 * phase as u32,
                speed: 220.0 * (1.0 + 0.1 * phase as f32),
                damage: 8.0 * scale,
            },
        });
    } else if roll < weights[0] + weights[1] {
        telegraphs.push(Telegraph::new(player_pos, 40.0, VOLLEY_FIRST_DELAY, TelegraphKind::Volley));
        for i in 0..(3 + phase as u32) {
            boss.pending.push(PendingAttack {
                fire_at: boss.elapsed + VOLLEY_FIRST_DELAY + VOLLEY_STAGGER * i as f32,
                payload: AttackPayload::AimedShot {
                    speed: 260.0 * (1.0 + 0.1 * phase as f32),
                    damage: 10.0 * scale,
                },
            });
        }
    } else {
        let radius = SLAM_BASE_RADIUS * (1.0 + 0.15 * phase as f32);
        telegraphs.push(Telegraph::new(player_pos, radius, SLAM_DELAY, TelegraphKind::Slam));
        boss.pending.push(PendingAttack {
            fire_at: boss.elapsed + SLAM_DELAY,
            payload: AttackPayload::GroundSlam {
                center: player_pos,
                radius,
                damage: 20.0 * scale,
            },
        });
    }
}

fn resolve_attack(payload: &AttackPayload, boss_pos: Vec2, player_pos: Vec2, out: &mut BossOutput) {
    match *payload {
        AttackPayload::RadialBurst { count, speed, damage } => {
            for k in 0..count {
                let angle = std::f32::consts::TAU * k as f32 / count as f32;
                out.shots.push(ShotRequest {
                    pos: boss_pos,
                    dir: Vec2::from_angle(angle),
                    speed,
                    damage,
                });
            }
        }
        AttackPayload::AimedShot { speed, damage } => {
            out.shots.push(ShotRequest {
                pos: boss_pos,
                dir: direction(boss_pos, player_pos),
                speed,
                damage,
            });
        }
        AttackPayload::GroundSlam { center, radius, damage } => {
            if center.distance(player_pos) <= radius {
                out.player_damage += damage;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Archetype, EnemyStats};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss_enemy(health: f32) -> Enemy {
        let stats = EnemyStats {
            health,
            speed: 60.0,
            size: 40.0,
            gold: 100,
        };
        Enemy::new(1, Vec2::new(400.0, 400.0), Archetype::Tanky, stats, EnemyKind::Boss(BossState::new(5)))
    }

    fn boss_state(enemy: &Enemy) -> &BossState {
        match &enemy.kind {
            EnemyKind::Boss(b) => b,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_phase_advances_on_threshold() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);

        enemy.take_damage(110.0); // ratio 0.725, below 0.75
        update_boss(&mut enemy, Vec2::ZERO, 0.016, &mut rng, &mut telegraphs);
        assert_eq!(boss_state(&enemy).phase, 1);

        // Phase never regresses
        update_boss(&mut enemy, Vec2::ZERO, 0.016, &mut rng, &mut telegraphs);
        assert_eq!(boss_state(&enemy).phase, 1);
    }

    #[test]
    fn test_phase_skips_straight_to_terminal_on_burst_damage() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);

        enemy.take_damage(360.0); // ratio 0.1, below every threshold
        update_boss(&mut enemy, Vec2::ZERO, 0.016, &mut rng, &mut telegraphs);
        let boss = boss_state(&enemy);
        assert_eq!(boss.phase, PHASE_THRESHOLDS.len());
        assert_eq!(boss.palette, 3);
    }

    #[test]
    fn test_phase_transition_scales_speed_and_cooldown() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);
        let base_speed = enemy.speed;

        enemy.take_damage(110.0);
        update_boss(&mut enemy, Vec2::ZERO, 0.016, &mut rng, &mut telegraphs);
        assert!((enemy.speed - base_speed * BOSS_PHASE_SPEED_SCALE).abs() < 1e-3);
        assert!(
            (boss_state(&enemy).special_cooldown - BOSS_SPECIAL_COOLDOWN * BOSS_PHASE_COOLDOWN_SCALE).abs() < 1e-3
        );
    }

    #[test]
    fn test_special_clock_schedules_telegraph_and_pending() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);

        update_boss(&mut enemy, Vec2::new(410.0, 400.0), BOSS_SPECIAL_COOLDOWN + 0.01, &mut rng, &mut telegraphs);
        assert_eq!(telegraphs.len(), 1);
        assert!(!boss_state(&enemy).pending.is_empty());
    }

    #[test]
    fn test_radial_burst_fires_after_delay() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            boss.pending.push(PendingAttack {
                fire_at: 0.5,
                payload: AttackPayload::RadialBurst {
                    count: 8,
                    speed: 220.0,
                    damage: 8.0,
                },
            });
        }

        let out = update_boss(&mut enemy, Vec2::ZERO, 0.1, &mut rng, &mut telegraphs);
        assert!(out.shots.is_empty());

        let out = update_boss(&mut enemy, Vec2::ZERO, 0.5, &mut rng, &mut telegraphs);
        assert_eq!(out.shots.len(), 8);
        assert!(boss_state(&enemy).pending.is_empty());
    }

    #[test]
    fn test_ground_slam_only_hits_player_inside_radius() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut telegraphs = Vec::new();
        let slam = AttackPayload::GroundSlam {
            center: Vec2::new(400.0, 400.0),
            radius: 120.0,
            damage: 20.0,
        };

        let mut enemy = boss_enemy(400.0);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            boss.pending.push(PendingAttack { fire_at: 0.0, payload: slam.clone() });
        }
        let out = update_boss(&mut enemy, Vec2::new(450.0, 400.0), 0.1, &mut rng, &mut telegraphs);
        assert_eq!(out.player_damage, 20.0);

        let mut enemy = boss_enemy(400.0);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            boss.pending.push(PendingAttack { fire_at: 0.0, payload: slam });
        }
        let out = update_boss(&mut enemy, Vec2::new(900.0, 400.0), 0.1, &mut rng, &mut telegraphs);
        assert_eq!(out.player_damage, 0.0);
    }

    #[test]
    fn test_aimed_shot_targets_fire_time_position() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            boss.pending.push(PendingAttack {
                fire_at: 0.0,
                payload: AttackPayload::AimedShot { speed: 260.0, damage: 10.0 },
            });
        }

        // Player is due east of the boss at fire time
        let out = update_boss(&mut enemy, Vec2::new(600.0, 400.0), 0.1, &mut rng, &mut telegraphs);
        assert_eq!(out.shots.len(), 1);
        assert!(out.shots[0].dir.x > 0.99);
    }

    #[test]
    fn test_dead_boss_cancels_pending_attacks() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut telegraphs = Vec::new();
        let mut enemy = boss_enemy(400.0);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            boss.pending.push(PendingAttack {
                fire_at: 0.0,
                payload: AttackPayload::RadialBurst { count: 8, speed: 220.0, damage: 8.0 },
            });
        }
        enemy.take_damage(1e6);

        let out = update_boss(&mut enemy, Vec2::ZERO, 1.0, &mut rng, &mut telegraphs);
        assert!(out.shots.is_empty());
        assert!(boss_state(&enemy).pending.is_empty());
    }
}
