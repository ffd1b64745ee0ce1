//! Projectiles
//!
//! Created by the combat resolver, destroyed on age-out or the first
//! qualifying collision. The owner reference exists for friendly-fire
//! exclusion and kill attribution; an owner is never a valid target.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};
use crate::entity::weapon::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Npc(EntityId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: ProjectileOwner,
    pub weapon: WeaponKind,
    pub damage: f32,
    /// Ticks since spawn; expires at the weapon kind's lifetime
    pub age: u64,
    pub is_player: bool,
}

impl Projectile {
    pub fn expired(&self) -> bool {
        self.age > self.weapon.lifetime()
    }

    /// True if this projectile belongs to the given NPC
    pub fn owned_by(&self, id: EntityId) -> bool {
        matches!(self.owner, ProjectileOwner::Npc(owner) if owner == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_per_weapon_kind() {
        let mut p = Projectile {
            pos: Vec2::default(),
            vel: Vec2::default(),
            owner: ProjectileOwner::Player,
            weapon: WeaponKind::Rapid,
            damage: 5.0,
            age: 41,
            is_player: true,
        };
        assert!(p.expired());

        p.weapon = WeaponKind::Plasma;
        assert!(!p.expired());
    }

    #[test]
    fn test_ownership_check() {
        let id = EntityId::new();
        let p = Projectile {
            pos: Vec2::default(),
            vel: Vec2::default(),
            owner: ProjectileOwner::Npc(id),
            weapon: WeaponKind::Laser,
            damage: 10.0,
            age: 0,
            is_player: false,
        };
        assert!(p.owned_by(id));
        assert!(!p.owned_by(EntityId::new()));
    }
}
