//! Upgrade and shop dispatch
//!
//! The id vocabulary is the external protocol shared with the UI layer, so
//! both tables are closed enums with a string boundary: raw strings coming
//! from the UI are parsed once, unknown ids are logged and ignored, and
//! everything past the boundary is typed. Applying an upgrade to a
//! subsystem the player has not unlocked is a valid no-op, never a fault.

use std::fmt;

use super::state::GameState;

const PLAYER_HEALTH_UPGRADE: f32 = 20.0;
const PLAYER_SPEED_SCALE: f32 = 1.1;
const PLAYER_MAGNET_UPGRADE: f32 = 15.0;
const DAMAGE_UPGRADE_PROJECTILE: f32 = 4.0;
const DAMAGE_UPGRADE_HOMING: f32 = 6.0;
const DAMAGE_UPGRADE_MELEE: f32 = 5.0;
const DAMAGE_UPGRADE_AURA: f32 = 3.0;
const FIRE_RATE_SCALE: f32 = 0.88;
const FIRE_INTERVAL_FLOOR: f32 = 0.12;
const MELEE_SPEED_SCALE: f32 = 1.15;
const MELEE_BLADE_CAP: u32 = 8;
const AURA_RADIUS_UPGRADE: f32 = 20.0;
const SHIELD_HEALTH_UPGRADE: f32 = 25.0;
const SHIELD_REGEN_SCALE: f32 = 1.5;
const HEAL_POWER_UPGRADE: f32 = 15.0;
const TIME_SLOW_DURATION_UPGRADE: f32 = 1.0;
const BLAST_DAMAGE_UPGRADE: f32 = 10.0;
const BLAST_RADIUS_UPGRADE: f32 = 25.0;

/// Permanent upgrade choices offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeId {
    PlayerHealth,
    PlayerSpeed,
    PlayerMagnet,
    ProjectileDamage,
    ProjectileFireRate,
    HomingDamage,
    HomingFireRate,
    MeleeDamage,
    MeleeSpeed,
    MeleeBlade,
    AuraDamage,
    AuraRadius,
    ShieldHealth,
    ShieldRegen,
    HealPower,
    TimeSlowDuration,
    BlastDamage,
    BlastRadius,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 18] = [
        UpgradeId::PlayerHealth,
        UpgradeId::PlayerSpeed,
        UpgradeId::PlayerMagnet,
        UpgradeId::ProjectileDamage,
        UpgradeId::ProjectileFireRate,
        UpgradeId::HomingDamage,
        UpgradeId::HomingFireRate,
        UpgradeId::MeleeDamage,
        UpgradeId::MeleeSpeed,
        UpgradeId::MeleeBlade,
        UpgradeId::AuraDamage,
        UpgradeId::AuraRadius,
        UpgradeId::ShieldHealth,
        UpgradeId::ShieldRegen,
        UpgradeId::HealPower,
        UpgradeId::TimeSlowDuration,
        UpgradeId::BlastDamage,
        UpgradeId::BlastRadius,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeId::PlayerHealth => "player_health",
            UpgradeId::PlayerSpeed => "player_speed",
            UpgradeId::PlayerMagnet => "player_magnet",
            UpgradeId::ProjectileDamage => "projectile_damage",
            UpgradeId::ProjectileFireRate => "projectile_fire_rate",
            UpgradeId::HomingDamage => "homing_damage",
            UpgradeId::HomingFireRate => "homing_fire_rate",
            UpgradeId::MeleeDamage => "melee_damage",
            UpgradeId::MeleeSpeed => "melee_speed",
            UpgradeId::MeleeBlade => "melee_blade",
            UpgradeId::AuraDamage => "aura_damage",
            UpgradeId::AuraRadius => "aura_radius",
            UpgradeId::ShieldHealth => "shield_health",
            UpgradeId::ShieldRegen => "shield_regen",
            UpgradeId::HealPower => "heal_power",
            UpgradeId::TimeSlowDuration => "time_slow_duration",
            UpgradeId::BlastDamage => "blast_damage",
            UpgradeId::BlastRadius => "blast_radius",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}

/// Apply one upgrade. Upgrades targeting absent subsystems are no-ops.
pub fn apply_upgrade(state: &mut GameState, id: UpgradeId) {
    match id {
        UpgradeId::PlayerHealth => {
            state.player.max_health += PLAYER_HEALTH_UPGRADE;
            state.player.health = state.player.max_health;
        }
        UpgradeId::PlayerSpeed => state.player.speed *= PLAYER_SPEED_SCALE,
        UpgradeId::PlayerMagnet => state.player.magnet_radius += PLAYER_MAGNET_UPGRADE,
        UpgradeId::ProjectileDamage => {
            if let Some(w) = state.projectile_weapon.as_mut() {
                w.damage += DAMAGE_UPGRADE_PROJECTILE;
            }
        }
        UpgradeId::ProjectileFireRate => {
            if let Some(w) = state.projectile_weapon.as_mut() {
                w.fire_interval = (w.fire_interval * FIRE_RATE_SCALE).max(FIRE_INTERVAL_FLOOR);
            }
        }
        UpgradeId::HomingDamage => {
            if let Some(w) = state.homing_weapon.as_mut() {
                w.damage += DAMAGE_UPGRADE_HOMING;
            }
        }
        UpgradeId::HomingFireRate => {
            if let Some(w) = state.homing_weapon.as_mut() {
                w.fire_interval = (w.fire_interval * FIRE_RATE_SCALE).max(FIRE_INTERVAL_FLOOR);
            }
        }
        UpgradeId::MeleeDamage => {
            if let Some(w) = state.melee_weapon.as_mut() {
                w.damage += DAMAGE_UPGRADE_MELEE;
            }
        }
        UpgradeId::MeleeSpeed => {
            if let Some(w) = state.melee_weapon.as_mut() {
                w.orbit_speed *= MELEE_SPEED_SCALE;
            }
        }
        UpgradeId::MeleeBlade => {
            if let Some(w) = state.melee_weapon.as_mut() {
                w.blade_count = (w.blade_count + 1).min(MELEE_BLADE_CAP);
            }
        }
        UpgradeId::AuraDamage => {
            if let Some(w) = state.aura_weapon.as_mut() {
                w.damage += DAMAGE_UPGRADE_AURA;
            }
        }
        UpgradeId::AuraRadius => {
            if let Some(w) = state.aura_weapon.as_mut() {
                w.radius += AURA_RADIUS_UPGRADE;
            }
        }
        UpgradeId::ShieldHealth => {
            if let Some(s) = state.shield.as_mut() {
                s.max_health += SHIELD_HEALTH_UPGRADE;
                s.health += SHIELD_HEALTH_UPGRADE;
            }
        }
        UpgradeId::ShieldRegen => {
            if let Some(s) = state.shield.as_mut() {
                s.regen_rate *= SHIELD_REGEN_SCALE;
            }
        }
        UpgradeId::HealPower => {
            if let Some(h) = state.heal.as_mut() {
                h.heal_amount += HEAL_POWER_UPGRADE;
            }
        }
        UpgradeId::TimeSlowDuration => {
            if let Some(t) = state.time_slow.as_mut() {
                t.duration += TIME_SLOW_DURATION_UPGRADE;
            }
        }
        UpgradeId::BlastDamage => {
            if let Some(b) = state.blast.as_mut() {
                b.damage += BLAST_DAMAGE_UPGRADE;
            }
        }
        UpgradeId::BlastRadius => {
            if let Some(b) = state.blast.as_mut() {
                b.radius += BLAST_RADIUS_UPGRADE;
            }
        }
    }
}

/// String boundary for upgrade ids coming from the UI.
/// Unknown ids are logged and ignored, never a fault.
pub fn apply_upgrade_str(state: &mut GameState, raw: &str) {
    match UpgradeId::parse(raw) {
        Some(id) => apply_upgrade(state, id),
        None => log::warn!("ignoring unknown upgrade id {raw:?}"),
    }
}

/// Items the vendor sells: each unlocks one optional subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItem {
    ShieldAbility,
    HealAbility,
    TimeSlowAbility,
    BlastAbility,
    HomingWeapon,
    MeleeWeapon,
    AuraWeapon,
}

impl ShopItem {
    pub const ALL: [ShopItem; 7] = [
        ShopItem::ShieldAbility,
        ShopItem::HealAbility,
        ShopItem::TimeSlowAbility,
        ShopItem::BlastAbility,
        ShopItem::HomingWeapon,
        ShopItem::MeleeWeapon,
        ShopItem::AuraWeapon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShopItem::ShieldAbility => "buy_shield_ability",
            ShopItem::HealAbility => "buy_heal_ability",
            ShopItem::TimeSlowAbility => "buy_time_slow_ability",
            ShopItem::BlastAbility => "buy_blast_ability",
            ShopItem::HomingWeapon => "buy_homing_weapon",
            ShopItem::MeleeWeapon => "buy_melee_weapon",
            ShopItem::AuraWeapon => "buy_aura_weapon",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.as_str() == s)
    }

    pub fn price(&self) -> u32 {
        match self {
            ShopItem::ShieldAbility => 120,
            ShopItem::HealAbility => 80,
            ShopItem::TimeSlowAbility => 100,
            ShopItem::BlastAbility => 90,
            ShopItem::HomingWeapon => 150,
            ShopItem::MeleeWeapon => 130,
            ShopItem::AuraWeapon => 110,
        }
    }
}

/// Purchase failure, surfaced to the player by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopError {
    UnknownItem,
    NotEnoughGold,
    AlreadyOwned,
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::UnknownItem => write!(f, "unknown shop item"),
            ShopError::NotEnoughGold => write!(f, "not enough gold"),
            ShopError::AlreadyOwned => write!(f, "already owned"),
        }
    }
}

/// Buy an item. On any failure nothing is mutated.
pub fn purchase(state: &mut GameState, item: ShopItem) -> Result<(), ShopError> {
    use super::abilities::{BlastAbility, HealAbility, Shield, TimeSlow};
    use super::weapons::{AuraWeapon, HomingWeapon, MeleeWeapon};

    let owned = match item {
        ShopItem::ShieldAbility => state.shield.is_some(),
        ShopItem::HealAbility => state.heal.is_some(),
        ShopItem::TimeSlowAbility => state.time_slow.is_some(),
        ShopItem::BlastAbility => state.blast.is_some(),
        ShopItem::HomingWeapon => state.homing_weapon.is_some(),
        ShopItem::MeleeWeapon => state.melee_weapon.is_some(),
        ShopItem::AuraWeapon => state.aura_weapon.is_some(),
    };
    if owned {
        return Err(ShopError::AlreadyOwned);
    }
    let price = item.price();
    if state.player.gold < price {
        return Err(ShopError::NotEnoughGold);
    }

    state.player.gold -= price;
    match item {
        ShopItem::ShieldAbility => state.shield = Some(Shield::new()),
        ShopItem::HealAbility => state.heal = Some(HealAbility::new()),
        ShopItem::TimeSlowAbility => state.time_slow = Some(TimeSlow::new()),
        ShopItem::BlastAbility => state.blast = Some(BlastAbility::new()),
        ShopItem::HomingWeapon => state.homing_weapon = Some(HomingWeapon::new()),
        ShopItem::MeleeWeapon => state.melee_weapon = Some(MeleeWeapon::new()),
        ShopItem::AuraWeapon => state.aura_weapon = Some(AuraWeapon::new()),
    }
    log::info!("purchased {}", item.as_str());
    Ok(())
}

/// String boundary for shop purchases coming from the UI
pub fn purchase_str(state: &mut GameState, raw: &str) -> Result<(), ShopError> {
    match ShopItem::parse(raw) {
        Some(item) => purchase(state, item),
        None => {
            log::warn!("ignoring unknown shop item {raw:?}");
            Err(ShopError::UnknownItem)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_MAX_HEALTH;

    #[test]
    fn test_upgrade_ids_round_trip() {
        for id in UpgradeId::ALL {
            assert_eq!(UpgradeId::parse(id.as_str()), Some(id));
        }
        for item in ShopItem::ALL {
            assert_eq!(ShopItem::parse(item.as_str()), Some(item));
        }
    }

    #[test]
    fn test_player_health_upgrade_applied_twice() {
        let mut state = GameState::new(1);
        state.player.take_damage(40.0);

        apply_upgrade_str(&mut state, "player_health");
        assert_eq!(state.player.max_health, PLAYER_MAX_HEALTH + PLAYER_HEALTH_UPGRADE);
        assert_eq!(state.player.health, state.player.max_health);

        apply_upgrade_str(&mut state, "player_health");
        assert_eq!(
            state.player.max_health,
            PLAYER_MAX_HEALTH + 2.0 * PLAYER_HEALTH_UPGRADE
        );
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_unknown_upgrade_is_ignored() {
        let mut state = GameState::new(1);
        let before = state.player.clone();
        apply_upgrade_str(&mut state, "definitely_not_an_upgrade");
        assert_eq!(state.player.max_health, before.max_health);
        assert_eq!(state.player.speed, before.speed);
    }

    #[test]
    fn test_upgrade_for_absent_subsystem_is_noop() {
        let mut state = GameState::new(1);
        assert!(state.aura_weapon.is_none());
        apply_upgrade(&mut state, UpgradeId::AuraDamage);
        assert!(state.aura_weapon.is_none());
    }

    #[test]
    fn test_fire_rate_upgrade_has_floor() {
        let mut state = GameState::new(1);
        for _ in 0..100 {
            apply_upgrade(&mut state, UpgradeId::ProjectileFireRate);
        }
        let interval = state.projectile_weapon.as_ref().unwrap().fire_interval;
        assert!((interval - FIRE_INTERVAL_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn test_purchase_rejects_insufficient_gold() {
        let mut state = GameState::new(1);
        state.player.gold = 10;
        let err = purchase(&mut state, ShopItem::ShieldAbility);
        assert_eq!(err, Err(ShopError::NotEnoughGold));
        assert_eq!(state.player.gold, 10);
        assert!(state.shield.is_none());
    }

    #[test]
    fn test_purchase_installs_and_deducts() {
        let mut state = GameState::new(1);
        state.player.gold = 200;
        purchase(&mut state, ShopItem::ShieldAbility).expect("affordable");
        assert!(state.shield.is_some());
        assert_eq!(state.player.gold, 200 - ShopItem::ShieldAbility.price());

        // Second copy is rejected without charging
        let err = purchase(&mut state, ShopItem::ShieldAbility);
        assert_eq!(err, Err(ShopError::AlreadyOwned));
        assert_eq!(state.player.gold, 200 - ShopItem::ShieldAbility.price());
    }

    #[test]
    fn test_purchase_unknown_string() {
        let mut state = GameState::new(1);
        state.player.gold = 500;
        assert_eq!(purchase_str(&mut state, "buy_nothing"), Err(ShopError::UnknownItem));
        assert_eq!(state.player.gold, 500);
    }

    #[test]
    fn test_bought_upgrade_becomes_effective() {
        let mut state = GameState::new(1);
        state.player.gold = 500;
        purchase_str(&mut state, "buy_aura_weapon").expect("affordable");
        let base = state.aura_weapon.as_ref().unwrap().damage;
        apply_upgrade_str(&mut state, "aura_damage");
        assert_eq!(state.aura_weapon.as_ref().unwrap().damage, base + DAMAGE_UPGRADE_AURA);
    }
}
