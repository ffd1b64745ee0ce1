//! Asteroids
//!
//! Radius defines the tier, which governs fragmentation and ore yield.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};

/// Size classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    pub fn classify(radius: f32) -> Self {
        if radius >= 8.0 {
            AsteroidTier::Large
        } else if radius >= 5.0 {
            AsteroidTier::Medium
        } else {
            AsteroidTier::Small
        }
    }

    /// Ore pickups dropped on destruction
    pub fn ore_drops(&self) -> u32 {
        match self {
            AsteroidTier::Large | AsteroidTier::Medium => 2,
            AsteroidTier::Small => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Seed for the renderer's irregular outline
    pub shape_seed: u64,
}

impl Asteroid {
    pub fn tier(&self) -> AsteroidTier {
        AsteroidTier::classify(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(AsteroidTier::classify(8.0), AsteroidTier::Large);
        assert_eq!(AsteroidTier::classify(7.9), AsteroidTier::Medium);
        assert_eq!(AsteroidTier::classify(5.0), AsteroidTier::Medium);
        assert_eq!(AsteroidTier::classify(4.9), AsteroidTier::Small);
    }

    #[test]
    fn test_ore_yield_by_tier() {
        assert_eq!(AsteroidTier::Large.ore_drops(), 2);
        assert_eq!(AsteroidTier::Medium.ore_drops(), 2);
        assert_eq!(AsteroidTier::Small.ore_drops(), 1);
    }
}
