//! Fixed-timestep motion integration for the player ship, NPC hulls, and
//! asteroids. Space has just enough friction to keep velocities bounded.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimConfig;
use crate::core::types::{normalize_angle, Vec2};
use crate::events::{Message, MessageBus, WarpKind};
use crate::world::WorldState;

pub const SPACE_FRICTION: f32 = 0.999;
pub const BRAKE_FRICTION: f32 = 0.95;
const PLAYER_TURN_RATE: f32 = 0.012;

/// Asteroids wrap at this world boundary
const WORLD_BOUND: f32 = 2000.0;

/// Player intents drained from the command queue at tick start
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub thrust: bool,
    pub brake: bool,
    /// -1.0 (left) .. 1.0 (right)
    pub turn: f32,
    pub firing: bool,
}

pub fn update_player(
    world: &mut WorldState,
    input: &PlayerInput,
    bus: &mut MessageBus,
    config: &SimConfig,
) {
    let ship = &mut world.ship;
    if ship.is_destroyed {
        return;
    }

    if input.turn != 0.0 {
        ship.heading = normalize_angle(ship.heading + PLAYER_TURN_RATE * input.turn.clamp(-1.0, 1.0));
    }

    if input.thrust && ship.fuel > 0.1 && !ship.is_landed {
        ship.vel += Vec2::from_angle(ship.heading) * ship.thrust;
        ship.fuel = (ship.fuel - 0.1).max(0.0);
    }

    if input.brake {
        ship.vel *= BRAKE_FRICTION;
    }
    ship.vel *= SPACE_FRICTION;

    let speed = ship.vel.length();
    if speed > ship.max_speed {
        ship.vel *= ship.max_speed / speed;
    }
    let vel = ship.vel;
    ship.pos += vel;

    // Slow regeneration
    ship.fuel = (ship.fuel + 0.01).min(ship.max_fuel);
    ship.shield = (ship.shield + 0.02).min(ship.max_shield);
    if ship.is_landed {
        ship.health = (ship.health + 0.1).min(ship.max_health);
    }

    if ship.weapon_cooldown > 0 {
        ship.weapon_cooldown -= 1;
    }
    if ship.landing_cooldown > 0 {
        ship.landing_cooldown -= 1;
    }

    // Grouping recovers while not firing
    ship.bloom *= config.bloom_decay;
    if ship.bloom < 1e-4 {
        ship.bloom = 0.0;
    }

    // Drifting away from a landed planet is a takeoff
    if ship.is_landed {
        if let Some(planet_id) = ship.landed_planet {
            let ship_pos = ship.pos;
            let left = world
                .planet(planet_id)
                .map(|p| ship_pos.distance(&p.pos) > p.radius + 100.0)
                .unwrap_or(true);
            if left {
                let ship = &mut world.ship;
                ship.is_landed = false;
                ship.landed_planet = None;
                let (x, y) = (ship.pos.x, ship.pos.y);
                bus.publish(Message::WarpEffect {
                    x,
                    y,
                    kind: WarpKind::Takeoff,
                });
            }
        }
    }
}

pub fn update_npcs(world: &mut WorldState) {
    for npc in &mut world.npcs {
        npc.lifetime += 1;

        npc.vel *= SPACE_FRICTION;
        let speed = npc.vel.length();
        if speed > npc.max_speed {
            npc.vel *= npc.max_speed / speed;
        }
        let vel = npc.vel;
        npc.pos += vel;

        if npc.weapon_cooldown > 0 {
            npc.weapon_cooldown -= 1;
        }
    }
}

pub fn update_asteroids(world: &mut WorldState, rng: &mut ChaCha8Rng) {
    for asteroid in &mut world.asteroids {
        let vel = asteroid.vel;
        asteroid.pos += vel;
        asteroid.rotation += asteroid.rotation_speed;

        if asteroid.pos.x > WORLD_BOUND {
            asteroid.pos.x = -WORLD_BOUND;
        } else if asteroid.pos.x < -WORLD_BOUND {
            asteroid.pos.x = WORLD_BOUND;
        }
        if asteroid.pos.y > WORLD_BOUND {
            asteroid.pos.y = -WORLD_BOUND;
        } else if asteroid.pos.y < -WORLD_BOUND {
            asteroid.pos.y = WORLD_BOUND;
        }

        // Rare random nudge keeps the field from looking frozen
        if rng.gen::<f32>() < 0.002 {
            asteroid.vel.x = (asteroid.vel.x + (rng.gen::<f32>() - 0.5) * 0.05).clamp(-0.4, 0.4);
            asteroid.vel.y = (asteroid.vel.y + (rng.gen::<f32>() - 0.5) * 0.05).clamp(-0.4, 0.4);
        }
    }
}
