//! Survival combat simulation
//!
//! All gameplay logic lives here. The module is renderer-free and
//! host-driven:
//! - Seeded RNG only (one `Pcg32` owned by the state)
//! - Delta-time scaled updates, advanced by the host's per-frame callback
//! - Stable iteration order (spawn order, ids monotonic)
//! - No rendering, audio, or platform dependencies

pub mod abilities;
pub mod boss;
pub mod collision;
pub mod enemy;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod waves;
pub mod weapons;

pub use abilities::{BlastAbility, Explosion, HealAbility, Shield, TimeSlow};
pub use boss::{AttackPayload, BossOutput, BossState, PendingAttack, update_boss};
pub use enemy::{Archetype, Enemy, EnemyKind, EnemyStats, separation_forces};
pub use state::{
    Camera, ExperienceGem, FloatingText, GameEvent, GameState, MagnetPickup, Player, Telegraph,
    TelegraphKind, Vendor,
};
pub use tick::{TickInput, tick};
pub use upgrades::{
    ShopError, ShopItem, UpgradeId, apply_upgrade, apply_upgrade_str, purchase, purchase_str,
};
pub use waves::{WaveState, scaled_stats};
pub use weapons::{AuraWeapon, HomingWeapon, MeleeWeapon, Missile, Projectile, ProjectileWeapon};
