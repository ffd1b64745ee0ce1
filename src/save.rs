//! Save payload
//!
//! Persistence itself is an external collaborator; this module only defines
//! the payload it stores and how that payload is captured from and applied
//! to a running world.

use serde::{Deserialize, Serialize};

use crate::core::error::{DriftError, Result};
use crate::entity::weapon::WeaponSpec;
use crate::world::{Reputation, WorldState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub credits: u32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub fuel: f32,
    pub kills: u32,
    pub pirate_kills: u32,
    pub weapons: Vec<WeaponSpec>,
    pub current_weapon: usize,
    pub reputation: Reputation,
    pub completed_missions: Vec<String>,
}

impl SaveData {
    pub fn capture(world: &WorldState) -> Self {
        let ship = &world.ship;
        Self {
            credits: ship.credits,
            health: ship.health,
            max_health: ship.max_health,
            shield: ship.shield,
            max_shield: ship.max_shield,
            fuel: ship.fuel,
            kills: ship.kills,
            pirate_kills: ship.pirate_kills,
            weapons: ship.weapons.clone(),
            current_weapon: ship.current_weapon,
            reputation: world.reputation,
            completed_missions: world.completed_missions.clone(),
        }
    }

    /// Apply the payload onto a world. Values are clamped into valid
    /// ranges so a hand-edited save cannot break the invariants.
    pub fn apply(&self, world: &mut WorldState) {
        let ship = &mut world.ship;
        ship.credits = self.credits;
        ship.max_health = self.max_health.max(1.0);
        ship.health = self.health.clamp(0.0, ship.max_health);
        ship.max_shield = self.max_shield.max(0.0);
        ship.shield = self.shield.clamp(0.0, ship.max_shield);
        ship.fuel = self.fuel.clamp(0.0, ship.max_fuel);
        ship.kills = self.kills;
        ship.pirate_kills = self.pirate_kills;
        if !self.weapons.is_empty() {
            ship.weapons = self.weapons.clone();
        }
        ship.current_weapon = self.current_weapon.min(ship.weapons.len().saturating_sub(1));

        world.reputation = self.reputation;
        world.completed_missions = self.completed_missions.clone();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: SaveData =
            serde_json::from_str(json).map_err(|e| DriftError::Save(e.to_string()))?;
        Ok(data)
    }
}
