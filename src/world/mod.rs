//! World state: the single mutable aggregate owned by the simulation
//!
//! All components read and mutate it by reference during a tick; nothing
//! else holds onto it between ticks.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, PlanetId, Tick, Vec2};
use crate::entity::asteroid::Asteroid;
use crate::entity::npc::Npc;
use crate::entity::pickup::Pickup;
use crate::entity::planet::Planet;
use crate::entity::projectile::Projectile;
use crate::entity::ship::PlayerShip;

/// Standing with the two factions that track the player
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Reputation {
    pub patrol: i32,
    pub pirate: i32,
}

/// Debug overrides toggled by external tooling
#[derive(Debug, Clone, Copy)]
pub struct DebugFlags {
    /// Zero all damage to the player; hits are still consumed and published
    pub god_mode: bool,
    /// Multiplier on every sampled weapon spread
    pub spread_mult: f32,
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self {
            god_mode: false,
            spread_mult: 1.0,
        }
    }
}

pub struct WorldState {
    pub tick: Tick,
    pub ship: PlayerShip,
    pub npcs: Vec<Npc>,
    pub projectiles: Vec<Projectile>,
    pub asteroids: Vec<Asteroid>,
    pub pickups: Vec<Pickup>,
    pub planets: Vec<Planet>,
    pub reputation: Reputation,
    pub completed_missions: Vec<String>,
    pub debug: DebugFlags,
}

impl WorldState {
    /// An empty world: just the player ship in a void
    pub fn new() -> Self {
        Self {
            tick: 0,
            ship: PlayerShip::new(),
            npcs: Vec::new(),
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            pickups: Vec::new(),
            planets: Vec::new(),
            reputation: Reputation::default(),
            completed_missions: Vec::new(),
            debug: DebugFlags::default(),
        }
    }

    /// A starter system: a few planets and a scattered asteroid field
    pub fn with_starter_system(rng: &mut ChaCha8Rng) -> Self {
        let mut world = Self::new();

        world.planets = vec![
            Planet::new(0, "Terra Nova", Vec2::new(800.0, -300.0), 120.0, true),
            Planet::new(1, "Crimson Moon", Vec2::new(-1200.0, 900.0), 80.0, true),
            Planet::new(2, "Ice World", Vec2::new(1500.0, 1400.0), 100.0, true),
            Planet::new(3, "Mining Station", Vec2::new(-700.0, -1100.0), 60.0, true),
        ];

        for _ in 0..50 {
            let pos = Vec2::new(
                (rng.gen::<f32>() - 0.5) * 4000.0,
                (rng.gen::<f32>() - 0.5) * 4000.0,
            );
            let vel = Vec2::new(
                (rng.gen::<f32>() - 0.5) * 0.3,
                (rng.gen::<f32>() - 0.5) * 0.3,
            );
            world.asteroids.push(Asteroid {
                id: EntityId::new(),
                pos,
                vel,
                radius: rng.gen::<f32>() * 8.0 + 2.0,
                health: 20.0,
                max_health: 20.0,
                rotation: rng.gen::<f32>() * std::f32::consts::TAU,
                rotation_speed: (rng.gen::<f32>() - 0.5) * 0.02,
                shape_seed: rng.gen(),
            });
        }

        world
    }

    pub fn npc_by_id(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    /// Nearest planet to a point, if any exist
    pub fn nearest_planet(&self, pos: Vec2) -> Option<&Planet> {
        self.planets.iter().min_by(|a, b| {
            a.pos
                .distance(&pos)
                .partial_cmp(&b.pos.distance(&pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// True if `pos` is within `margin` of some planet's surface
    pub fn near_planet(&self, pos: Vec2, margin: f32) -> bool {
        self.planets
            .iter()
            .any(|p| pos.distance(&p.pos) < p.radius + margin)
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_starter_system_has_planets_and_asteroids() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = WorldState::with_starter_system(&mut rng);
        assert_eq!(world.planets.len(), 4);
        assert_eq!(world.asteroids.len(), 50);
        assert!(world.asteroids.iter().all(|a| a.radius >= 2.0));
    }

    #[test]
    fn test_nearest_planet() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = WorldState::with_starter_system(&mut rng);
        let nearest = world.nearest_planet(Vec2::new(800.0, -300.0)).unwrap();
        assert_eq!(nearest.name, "Terra Nova");
    }

    #[test]
    fn test_starter_system_is_deterministic_for_a_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        let wa = WorldState::with_starter_system(&mut a);
        let wb = WorldState::with_starter_system(&mut b);
        for (x, y) in wa.asteroids.iter().zip(wb.asteroids.iter()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.radius, y.radius);
        }
    }
}
