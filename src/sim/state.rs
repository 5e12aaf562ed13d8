//! Game state and core simulation types
//!
//! Everything the host reads to draw a frame lives here, as plain data.
//! `GameState` is the single mutable aggregate root: the simulation owns it
//! exclusively, UI layers receive it as a read-only (serializable) snapshot.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::abilities::{BlastAbility, HealAbility, Shield, TimeSlow};
use super::boss::BossState;
use super::enemy::{Archetype, Enemy, EnemyKind, EnemyStats};
use super::waves::WaveState;
use super::weapons::{AuraWeapon, HomingWeapon, MeleeWeapon, Projectile, ProjectileWeapon};
use crate::consts::*;

/// Events the core emits for the UI layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player crossed an XP threshold; the UI opens the upgrade choice
    LeveledUp { level: u32 },
    /// Fired exactly once per boss, at the health-reaches-zero transition
    BossDefeated { wave: u32 },
    ShopOpened,
    ShopClosed,
    GameOver,
    GameWon,
}

/// Host-provided view rectangle; spawns land just outside it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub center: Vec2,
    pub view_size: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            view_size: Vec2::new(1280.0, 720.0),
        }
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Collision radius
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub gold: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
    /// Gems inside this radius are gained
    pub collect_radius: f32,
    /// Base magnet pull radius, before any power-up
    pub magnet_radius: f32,
    pub dash_timer: f32,
    pub dash_cooldown_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            size: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            gold: 0,
            xp: 0,
            level: 1,
            xp_to_next: XP_BASE_THRESHOLD,
            collect_radius: PLAYER_COLLECT_RADIUS,
            magnet_radius: PLAYER_MAGNET_RADIUS,
            dash_timer: 0.0,
            dash_cooldown_timer: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Clamped damage; shield routing happens in `GameState::damage_player`
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn update_dash(&mut self, dt: f32) {
        self.dash_timer = (self.dash_timer - dt).max(0.0);
        self.dash_cooldown_timer = (self.dash_cooldown_timer - dt).max(0.0);
    }

    pub fn try_dash(&mut self) -> bool {
        if self.dash_cooldown_timer > 0.0 {
            return false;
        }
        self.dash_timer = DASH_DURATION;
        self.dash_cooldown_timer = DASH_COOLDOWN;
        true
    }

    /// Movement speed for this tick, including any active dash burst
    pub fn current_speed(&self) -> f32 {
        if self.dash_timer > 0.0 {
            self.speed * DASH_MULTIPLIER
        } else {
            self.speed
        }
    }

    /// Bank XP; returns how many levels were gained so the caller can emit
    /// one event per threshold crossing
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = XP_BASE_THRESHOLD + XP_THRESHOLD_GROWTH * (self.level - 1);
            gained += 1;
        }
        gained
    }
}

/// The between-waves shopkeeper; proximity opens/closes the shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub pos: Vec2,
    pub radius: f32,
}

impl Default for Vendor {
    fn default() -> Self {
        Self {
            pos: Vec2::new(WORLD_WIDTH / 2.0 + 320.0, WORLD_HEIGHT / 2.0),
            radius: VENDOR_RADIUS,
        }
    }
}

/// Dropped experience, pulled in by the magnet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceGem {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
    pub ttl: f32,
}

/// Ground magnet power-up; collecting it widens the pull radius for a while
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetPickup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub duration: f32,
    pub ttl: f32,
}

/// Floating damage number (transient, render-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub value: u32,
    pub age: f32,
    pub duration: f32,
}

impl FloatingText {
    pub fn new(pos: Vec2, value: u32) -> Self {
        Self {
            pos,
            value,
            age: 0.0,
            duration: 0.8,
        }
    }
}

/// What a telegraph warns about; the renderer maps this to a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelegraphKind {
    Burst,
    Volley,
    Slam,
}

/// A warning marker shown before a delayed attack resolves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telegraph {
    pub pos: Vec2,
    pub radius: f32,
    pub age: f32,
    pub duration: f32,
    pub kind: TelegraphKind,
}

impl Telegraph {
    pub fn new(pos: Vec2, radius: f32, duration: f32, kind: TelegraphKind) -> Self {
        Self {
            pos,
            radius,
            age: 0.0,
            duration,
            kind,
        }
    }
}

/// Monotonic entity-id allocator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn next(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (serializable snapshot for the UI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Simulation time in seconds
    pub elapsed: f32,
    pub paused: bool,
    pub game_over: bool,
    pub game_won: bool,

    pub player: Player,
    pub vendor: Vendor,
    pub shop_open: bool,

    pub enemies: Vec<Enemy>,
    /// Shots fired by enemies and bosses, aimed at the player
    pub enemy_shots: Vec<Projectile>,
    pub gems: Vec<ExperienceGem>,
    pub magnets: Vec<MagnetPickup>,
    #[serde(skip)]
    pub floating_texts: Vec<FloatingText>,
    #[serde(skip)]
    pub telegraphs: Vec<Telegraph>,

    // Optional subsystems: absent until unlocked, never partially built
    pub projectile_weapon: Option<ProjectileWeapon>,
    pub homing_weapon: Option<HomingWeapon>,
    pub melee_weapon: Option<MeleeWeapon>,
    pub aura_weapon: Option<AuraWeapon>,
    pub shield: Option<Shield>,
    pub heal: Option<HealAbility>,
    pub time_slow: Option<TimeSlow>,
    pub blast: Option<BlastAbility>,

    pub waves: WaveState,

    /// Magnet power-up state; radius resets to zero when the timer expires
    pub magnet_radius_active: f32,
    pub magnet_duration: f32,

    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub(crate) ids: IdGen,
}

impl GameState {
    /// Create a fresh run. The player starts with the basic projectile
    /// weapon; everything else is bought or chosen later.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            elapsed: 0.0,
            paused: false,
            game_over: false,
            game_won: false,
            player: Player::new(),
            vendor: Vendor::default(),
            shop_open: false,
            enemies: Vec::new(),
            enemy_shots: Vec::new(),
            gems: Vec::new(),
            magnets: Vec::new(),
            floating_texts: Vec::new(),
            telegraphs: Vec::new(),
            projectile_weapon: Some(ProjectileWeapon::new()),
            homing_weapon: None,
            melee_weapon: None,
            aura_weapon: None,
            shield: None,
            heal: None,
            time_slow: None,
            blast: None,
            waves: WaveState::new(),
            magnet_radius_active: 0.0,
            magnet_duration: 0.0,
            events: Vec::new(),
            ids: IdGen::default(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next()
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, archetype: Archetype, stats: EnemyStats, kind: EnemyKind) {
        let id = self.ids.next();
        self.enemies.push(Enemy::new(id, pos, archetype, stats, kind));
    }

    /// Spawn the boss for `wave` (stats scale with the wave number)
    pub fn spawn_boss(&mut self, pos: Vec2, wave: u32) {
        let w = wave.saturating_sub(1) as f32;
        let stats = EnemyStats {
            health: 400.0 * (1.0 + 0.2 * w),
            speed: 60.0 * (1.0 + 0.05 * w),
            size: 40.0,
            gold: (100.0 * (1.0 + 0.1 * w)).round() as u32,
        };
        let id = self.ids.next();
        log::info!("boss spawned for wave {wave} ({:.0} hp)", stats.health);
        self.enemies.push(Enemy::new(
            id,
            pos,
            Archetype::Tanky,
            stats,
            EnemyKind::Boss(BossState::new(wave)),
        ));
    }

    pub fn spawn_gem(&mut self, pos: Vec2, value: u32) {
        let id = self.ids.next();
        self.gems.push(ExperienceGem {
            id,
            pos,
            value,
            ttl: GEM_TTL,
        });
    }

    pub fn spawn_magnet(&mut self, pos: Vec2) {
        let id = self.ids.next();
        self.magnets.push(MagnetPickup {
            id,
            pos,
            radius: MAGNET_RADIUS,
            duration: MAGNET_DURATION,
            ttl: MAGNET_PICKUP_TTL,
        });
    }

    pub fn add_floating_text(&mut self, pos: Vec2, value: u32) {
        self.floating_texts.push(FloatingText::new(pos, value));
    }

    /// Route damage through the shield (when present and raised); overflow
    /// reaches the player. Reaching zero health is the terminal condition.
    pub fn damage_player(&mut self, amount: f32) {
        if self.game_over {
            return;
        }
        let overflow = match self.shield.as_mut() {
            Some(shield) => shield.absorb(amount),
            None => amount,
        };
        if overflow > 0.0 {
            self.player.take_damage(overflow);
            self.add_floating_text(self.player.pos, overflow.round() as u32);
            if !self.player.is_alive() {
                self.game_over = true;
                self.events.push(GameEvent::GameOver);
                log::info!("run over at {:.1}s, wave {}", self.elapsed, self.waves.wave);
            }
        }
    }

    /// Take this frame's events for the UI
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Effective magnet pull radius this tick
    pub fn effective_magnet_radius(&self) -> f32 {
        self.player.magnet_radius.max(self.magnet_radius_active)
    }

    /// Start a new run with the same seed, clearing every managed collection
    pub fn reset(&mut self) {
        *self = GameState::new(self.seed);
    }

    /// Uniform roll helper for drop chances
    pub(crate) fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
