//! Player ability state machines
//!
//! Abilities follow the same rule as weapons: absent until purchased
//! (`Option` in `GameState`), each owning its own cooldown clock. Cooldowns
//! are plain accumulate-and-compare counters, never host timers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

const SHIELD_MAX_HEALTH: f32 = 100.0;
const SHIELD_REGEN_RATE: f32 = 12.0;
const SHIELD_BREAK_COOLDOWN: f32 = 4.0;

const HEAL_AMOUNT: f32 = 30.0;
const HEAL_COOLDOWN: f32 = 12.0;

const TIME_SLOW_DURATION: f32 = 3.0;
const TIME_SLOW_FACTOR: f32 = 0.4;
const TIME_SLOW_COOLDOWN: f32 = 15.0;

const BLAST_RADIUS: f32 = 150.0;
const BLAST_DAMAGE: f32 = 40.0;
const BLAST_COOLDOWN: f32 = 8.0;
const BLAST_VISUAL_DURATION: f32 = 0.45;

/// Absorbs player damage while active. Regenerates only while inactive and
/// off cooldown; breaking forces it inactive and starts the cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub active: bool,
    pub health: f32,
    pub max_health: f32,
    pub regen_rate: f32,
    pub cooldown: f32,
    /// Counts down after a break; regen resumes at zero
    pub cooldown_timer: f32,
}

impl Default for Shield {
    fn default() -> Self {
        Self::new()
    }
}

impl Shield {
    pub fn new() -> Self {
        Self {
            active: false,
            health: SHIELD_MAX_HEALTH,
            max_health: SHIELD_MAX_HEALTH,
            regen_rate: SHIELD_REGEN_RATE,
            cooldown: SHIELD_BREAK_COOLDOWN,
            cooldown_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
            return;
        }
        if !self.active && self.health < self.max_health {
            self.health = (self.health + self.regen_rate * dt).min(self.max_health);
        }
    }

    /// Route incoming damage through the shield; returns the overflow the
    /// player takes. Breaking deactivates and starts the cooldown.
    pub fn absorb(&mut self, amount: f32) -> f32 {
        if !self.active || self.health <= 0.0 {
            return amount;
        }
        let absorbed = amount.min(self.health);
        self.health -= absorbed;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.active = false;
            self.cooldown_timer = self.cooldown;
        }
        amount - absorbed
    }

    /// Toggle on/off; a broken shield cannot be raised until it has health
    pub fn toggle(&mut self) {
        if self.active {
            self.active = false;
        } else if self.health > 0.0 {
            self.active = true;
        }
    }
}

/// One-shot heal on a cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealAbility {
    pub heal_amount: f32,
    pub cooldown: f32,
    pub cooldown_timer: f32,
}

impl Default for HealAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl HealAbility {
    pub fn new() -> Self {
        Self {
            heal_amount: HEAL_AMOUNT,
            cooldown: HEAL_COOLDOWN,
            cooldown_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
    }

    /// Returns the heal amount when off cooldown, starting the cooldown
    pub fn trigger(&mut self) -> Option<f32> {
        if self.cooldown_timer > 0.0 {
            return None;
        }
        self.cooldown_timer = self.cooldown;
        Some(self.heal_amount)
    }
}

/// Slows enemies and their projectiles for a fixed window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlow {
    pub duration: f32,
    pub factor: f32,
    pub cooldown: f32,
    pub cooldown_timer: f32,
    pub active_timer: f32,
}

impl Default for TimeSlow {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSlow {
    pub fn new() -> Self {
        Self {
            duration: TIME_SLOW_DURATION,
            factor: TIME_SLOW_FACTOR,
            cooldown: TIME_SLOW_COOLDOWN,
            cooldown_timer: 0.0,
            active_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        self.active_timer = (self.active_timer - dt).max(0.0);
    }

    pub fn trigger(&mut self) -> bool {
        if self.cooldown_timer > 0.0 {
            return false;
        }
        self.cooldown_timer = self.cooldown;
        self.active_timer = self.duration;
        true
    }

    /// Multiplier applied to enemy delta time
    pub fn time_scale(&self) -> f32 {
        if self.active_timer > 0.0 { self.factor } else { 1.0 }
    }
}

/// One explosion instance. Damage is applied exactly once, however long the
/// visual persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub age: f32,
    pub duration: f32,
    pub has_dealt_damage: bool,
}

/// Triggered area blast centered on the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastAbility {
    pub radius: f32,
    pub damage: f32,
    pub cooldown: f32,
    pub cooldown_timer: f32,
    pub explosions: Vec<Explosion>,
}

impl Default for BlastAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl BlastAbility {
    pub fn new() -> Self {
        Self {
            radius: BLAST_RADIUS,
            damage: BLAST_DAMAGE,
            cooldown: BLAST_COOLDOWN,
            cooldown_timer: 0.0,
            explosions: Vec::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        for explosion in &mut self.explosions {
            explosion.age += dt;
        }
        self.explosions.retain(|e| e.age < e.duration);
    }

    pub fn trigger(&mut self, pos: Vec2) -> bool {
        if self.cooldown_timer > 0.0 {
            return false;
        }
        self.cooldown_timer = self.cooldown;
        self.explosions.push(Explosion {
            pos,
            radius: self.radius,
            damage: self.damage,
            age: 0.0,
            duration: BLAST_VISUAL_DURATION,
            has_dealt_damage: false,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_absorbs_fully() {
        let mut shield = Shield::new();
        shield.toggle();
        let overflow = shield.absorb(40.0);
        assert_eq!(overflow, 0.0);
        assert_eq!(shield.health, 60.0);
        assert!(shield.active);
    }

    #[test]
    fn test_shield_breaks_and_passes_overflow() {
        let mut shield = Shield::new();
        shield.toggle();
        let overflow = shield.absorb(150.0);
        assert_eq!(overflow, 50.0);
        assert_eq!(shield.health, 0.0);
        assert!(!shield.active);
        assert_eq!(shield.cooldown_timer, shield.cooldown);
    }

    #[test]
    fn test_inactive_shield_passes_all_damage() {
        let mut shield = Shield::new();
        assert_eq!(shield.absorb(40.0), 40.0);
        assert_eq!(shield.health, shield.max_health);
    }

    #[test]
    fn test_shield_regen_rules() {
        let mut shield = Shield::new();
        shield.toggle();
        shield.absorb(150.0);

        // On cooldown: no regen
        shield.update(1.0);
        assert_eq!(shield.health, 0.0);

        // Off cooldown and inactive: regenerates
        shield.update(shield.cooldown);
        shield.update(1.0);
        assert!(shield.health > 0.0);

        // Active: regen stops
        shield.toggle();
        assert!(shield.active);
        let before = shield.health;
        shield.update(1.0);
        assert_eq!(shield.health, before);
    }

    #[test]
    fn test_broken_shield_cannot_be_raised() {
        let mut shield = Shield::new();
        shield.toggle();
        shield.absorb(150.0);
        shield.toggle();
        assert!(!shield.active);
    }

    #[test]
    fn test_heal_cooldown() {
        let mut heal = HealAbility::new();
        assert_eq!(heal.trigger(), Some(HEAL_AMOUNT));
        assert_eq!(heal.trigger(), None);
        heal.update(heal.cooldown);
        assert_eq!(heal.trigger(), Some(HEAL_AMOUNT));
    }

    #[test]
    fn test_time_slow_window() {
        let mut slow = TimeSlow::new();
        assert_eq!(slow.time_scale(), 1.0);
        assert!(slow.trigger());
        assert_eq!(slow.time_scale(), TIME_SLOW_FACTOR);
        assert!(!slow.trigger());

        slow.update(slow.duration + 0.1);
        assert_eq!(slow.time_scale(), 1.0);
    }

    #[test]
    fn test_blast_spawns_one_explosion_per_trigger() {
        let mut blast = BlastAbility::new();
        assert!(blast.trigger(Vec2::ZERO));
        assert!(!blast.trigger(Vec2::ZERO));
        assert_eq!(blast.explosions.len(), 1);
        assert!(!blast.explosions[0].has_dealt_damage);

        // Visual expires on its own clock
        blast.update(BLAST_VISUAL_DURATION + 0.1);
        assert!(blast.explosions.is_empty());
    }
}
