//! The player ship
//!
//! A singleton aggregate: mutated by input, physics, the combat resolver,
//! and the hostility tracker; reset on respawn, never removed.

use serde::{Deserialize, Serialize};

use crate::core::types::{PlanetId, Tick, Vec2};
use crate::entity::weapon::{WeaponKind, WeaponSpec};

/// Patrol warning/stand-down record attached to the ship.
///
/// Invariant: at most one of {warning active, standing down} is true at any
/// time. `is_hostile` is derived per tick and never stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostilityRecord {
    pub warning_shown: bool,
    pub warning_tick: Tick,
    pub warning_expired: bool,
    pub standing_down: bool,
    pub stand_down_tick: Tick,
}

impl HostilityRecord {
    /// A warning is active from the moment it is shown until stand-down
    pub fn warning_active(&self) -> bool {
        self.warning_shown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    pub thrust: f32,
    pub max_speed: f32,
    pub size: f32,

    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub fuel: f32,
    pub max_fuel: f32,

    pub credits: u32,
    pub kills: u32,
    pub pirate_kills: u32,

    pub weapons: Vec<WeaponSpec>,
    pub current_weapon: usize,
    pub weapon_cooldown: u32,
    /// Transient accuracy penalty that grows under sustained fire
    pub bloom: f32,

    pub is_destroyed: bool,
    pub is_landed: bool,
    pub landed_planet: Option<PlanetId>,
    pub landing_cooldown: u32,

    pub hostility: HostilityRecord,
}

impl PlayerShip {
    pub fn new() -> Self {
        Self {
            pos: Vec2::default(),
            vel: Vec2::default(),
            heading: 0.0,
            thrust: 0.012,
            max_speed: 0.8,
            size: 8.0,
            health: 100.0,
            max_health: 100.0,
            shield: 0.0,
            max_shield: 0.0,
            fuel: 100.0,
            max_fuel: 100.0,
            credits: 250,
            kills: 0,
            pirate_kills: 0,
            weapons: vec![WeaponSpec::laser()],
            current_weapon: 0,
            weapon_cooldown: 0,
            bloom: 0.0,
            is_destroyed: false,
            is_landed: false,
            landed_planet: None,
            landing_cooldown: 0,
            hostility: HostilityRecord::default(),
        }
    }

    /// Currently selected weapon, if the loadout is non-empty
    pub fn active_weapon(&self) -> Option<&WeaponSpec> {
        self.weapons.get(self.current_weapon)
    }

    pub fn switch_weapon(&mut self) {
        if self.weapons.len() > 1 {
            self.current_weapon = (self.current_weapon + 1) % self.weapons.len();
        }
    }

    /// Reset for respawn: position, motion, and hull come back; credits,
    /// kill record, and loadout persist.
    pub fn respawn(&mut self) {
        self.pos = Vec2::default();
        self.vel = Vec2::default();
        self.heading = 0.0;
        self.health = self.max_health;
        self.shield = self.max_shield;
        self.fuel = self.max_fuel;
        self.weapon_cooldown = 0;
        self.bloom = 0.0;
        self.is_destroyed = false;
        self.is_landed = false;
        self.landed_planet = None;
        self.hostility = HostilityRecord::default();
    }

    pub fn snapshot(&self) -> ShipSnapshot {
        ShipSnapshot {
            credits: self.credits,
            health: self.health,
            max_health: self.max_health,
            shield: self.shield,
            max_shield: self.max_shield,
            fuel: self.fuel,
            kills: self.kills,
            pirate_kills: self.pirate_kills,
            weapon: self.active_weapon().map(|w| w.kind),
        }
    }
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self::new()
    }
}

/// HUD-facing snapshot published with `ui.update` once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipSnapshot {
    pub credits: u32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub fuel: f32,
    pub kills: u32,
    pub pirate_kills: u32,
    pub weapon: Option<WeaponKind>,
}
