//! Weapon specifications
//!
//! A weapon is a small stat block; the kind determines muzzle speed,
//! projectile lifetime, and angular spread, while damage and cooldown vary
//! per loadout (NPC weapons are detuned versions of the player's).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Laser,
    Rapid,
    Plasma,
    Mining,
}

impl WeaponKind {
    /// Muzzle speed added along the firing heading
    pub fn speed(&self) -> f32 {
        match self {
            WeaponKind::Laser => 2.0,
            WeaponKind::Rapid => 3.0,
            WeaponKind::Plasma => 1.5,
            WeaponKind::Mining => 2.0,
        }
    }

    /// Projectile lifetime in ticks. Slower, heavier shots live longer.
    pub fn lifetime(&self) -> u64 {
        match self {
            WeaponKind::Laser => 60,
            WeaponKind::Rapid => 40,
            WeaponKind::Plasma => 90,
            WeaponKind::Mining => 70,
        }
    }

    /// Base angular spread half-width in radians. Rapid fire is loose,
    /// single-shot weapons are tight.
    pub fn spread(&self) -> f32 {
        match self {
            WeaponKind::Laser => 0.012,
            WeaponKind::Rapid => 0.06,
            WeaponKind::Plasma => 0.02,
            WeaponKind::Mining => 0.035,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Laser => "laser",
            WeaponKind::Rapid => "rapid",
            WeaponKind::Plasma => "plasma",
            WeaponKind::Mining => "mining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub damage: f32,
    /// Ticks between shots
    pub cooldown: u32,
}

impl WeaponSpec {
    pub fn new(kind: WeaponKind, damage: f32, cooldown: u32) -> Self {
        Self {
            kind,
            damage,
            cooldown,
        }
    }

    /// Standard player loadout entries
    pub fn laser() -> Self {
        Self::new(WeaponKind::Laser, 10.0, 15)
    }

    pub fn rapid() -> Self {
        Self::new(WeaponKind::Rapid, 5.0, 5)
    }

    pub fn plasma() -> Self {
        Self::new(WeaponKind::Plasma, 20.0, 30)
    }

    pub fn mining() -> Self {
        Self::new(WeaponKind::Mining, 3.0, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heavier_shots_outlive_faster_ones() {
        assert!(WeaponKind::Plasma.lifetime() > WeaponKind::Laser.lifetime());
        assert!(WeaponKind::Laser.lifetime() > WeaponKind::Rapid.lifetime());
    }

    #[test]
    fn test_rapid_fire_is_loosest() {
        assert!(WeaponKind::Rapid.spread() > WeaponKind::Laser.spread());
        assert!(WeaponKind::Rapid.spread() > WeaponKind::Plasma.spread());
    }

    #[test]
    fn test_plasma_trades_speed_for_damage() {
        let plasma = WeaponSpec::plasma();
        let rapid = WeaponSpec::rapid();
        assert!(plasma.damage > rapid.damage);
        assert!(plasma.kind.speed() < rapid.kind.speed());
    }
}
