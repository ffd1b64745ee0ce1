//! Lifecycle & loot manager
//!
//! Consumes the death and despawn conditions produced earlier in the tick:
//! removes agents that died, docked, or drifted too far; pays bounties and
//! rolls loot; fragments destroyed asteroids into smaller tiers; ages and
//! collects pickups. A dead NPC never survives the tick it died in.

pub mod spawn;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

use crate::core::config::SimConfig;
use crate::core::types::{EntityId, Vec2};
use crate::entity::asteroid::{Asteroid, AsteroidTier};
use crate::entity::npc::{Attribution, Behavior, NpcClass};
use crate::entity::pickup::{Pickup, PickupKind};
use crate::events::{ExplosionSize, KilledBy, Message, MessageBus, WarpKind};
use crate::world::WorldState;
use spawn::SpawnPolicy;

/// Remove agents that docked, died, or left the play area
pub fn update_npcs(
    world: &mut WorldState,
    bus: &mut MessageBus,
    rng: &mut ChaCha8Rng,
    policy: &mut SpawnPolicy,
    config: &SimConfig,
) {
    let mut i = world.npcs.len();
    while i > 0 {
        i -= 1;

        if world.npcs[i].ready_to_dock {
            world.npcs.remove(i);
            continue;
        }

        if world.npcs[i].health <= 0.0 {
            handle_death(world, i, bus, rng, policy, config);
            continue;
        }

        let dist = world.npcs[i].pos.distance(&world.ship.pos);
        if dist > config.despawn_range {
            let pos = world.npcs[i].pos;
            let kind = if world.near_planet(pos, config.planet_landing_margin) {
                WarpKind::Land
            } else {
                WarpKind::Depart
            };
            bus.publish(Message::WarpEffect {
                x: pos.x,
                y: pos.y,
                kind,
            });
            world.npcs.remove(i);
        }
    }
}

fn handle_death(
    world: &mut WorldState,
    index: usize,
    bus: &mut MessageBus,
    rng: &mut ChaCha8Rng,
    policy: &mut SpawnPolicy,
    config: &SimConfig,
) {
    let npc = world.npcs.remove(index);
    let attribution = npc.killed_by.unwrap_or(Attribution::Npc);

    if attribution == Attribution::Player {
        // Full bounty for outlaws, half for everything else
        let bounty = if npc.behavior == Behavior::Aggressive {
            npc.credits
        } else {
            npc.credits / 2
        };
        let ship = &mut world.ship;
        ship.credits += bounty + config.kill_bonus_credits;
        ship.kills += 1;

        if npc.behavior == Behavior::Aggressive {
            ship.pirate_kills += 1;
            world.reputation.patrol += 1;
            world.reputation.pirate -= 1;
        } else {
            world.reputation.patrol -= 2;
        }
    }

    // Primary explosion plus a ring of secondary pops
    bus.publish(Message::Explosion {
        x: npc.pos.x,
        y: npc.pos.y,
        size: ExplosionSize::Medium,
        impact: false,
    });
    for j in 0..4 {
        let angle = TAU / 4.0 * j as f32;
        let offset = Vec2::from_angle(angle) * (npc.size * 0.8);
        bus.publish(Message::Explosion {
            x: npc.pos.x + offset.x,
            y: npc.pos.y + offset.y,
            size: ExplosionSize::Small,
            impact: false,
        });
    }

    // Pirates sometimes spill their hold
    if npc.class == NpcClass::Pirate && rng.gen::<f32>() < config.pirate_loot_chance {
        let count = 2 + rng.gen_range(0..3);
        for _ in 0..count {
            let angle = rng.gen::<f32>() * TAU;
            let speed = rng.gen::<f32>() * 2.0 + 1.0;
            let (kind, value) = if rng.gen::<f32>() < 0.5 {
                (PickupKind::Credits, 10)
            } else {
                (PickupKind::Ore, 25)
            };
            world.pickups.push(Pickup::new(
                npc.pos,
                Vec2::from_angle(angle) * speed,
                kind,
                value,
            ));
        }
    }

    bus.publish(Message::NpcDeath {
        npc: npc.id,
        class: npc.class,
        killed_by: match attribution {
            Attribution::Player => KilledBy::Player,
            Attribution::Npc => KilledBy::Npc,
        },
        x: npc.pos.x,
        y: npc.pos.y,
    });

    policy.note_death(npc.class, world.tick, config);
}

/// Fragment destroyed asteroids and drop their ore
pub fn update_asteroids(world: &mut WorldState, bus: &mut MessageBus, rng: &mut ChaCha8Rng) {
    let mut i = world.asteroids.len();
    while i > 0 {
        i -= 1;
        if world.asteroids[i].health > 0.0 {
            continue;
        }

        let parent = world.asteroids.remove(i);
        let tier = parent.tier();

        let drops = tier.ore_drops();
        for j in 0..drops {
            let angle = TAU / drops as f32 * j as f32;
            let dir = Vec2::from_angle(angle);
            world.pickups.push(Pickup::new(
                parent.pos + dir * 10.0,
                dir * 0.5 + parent.vel * 0.5,
                PickupKind::Ore,
                1,
            ));
        }

        bus.publish(Message::Explosion {
            x: parent.pos.x,
            y: parent.pos.y,
            size: ExplosionSize::Small,
            impact: false,
        });

        // Large rocks always calve three children, medium two or three,
        // small ones are terminal
        let children = match tier {
            AsteroidTier::Large => 3,
            AsteroidTier::Medium => 2 + rng.gen_range(0..2),
            AsteroidTier::Small => 0,
        };
        let child_radius = parent.radius * 0.55;
        let child_health = (parent.max_health * 0.55).ceil();

        for _ in 0..children {
            let angle = rng.gen::<f32>() * TAU;
            let dir = Vec2::from_angle(angle);
            world.asteroids.push(Asteroid {
                id: EntityId::new(),
                pos: parent.pos + dir * parent.radius,
                vel: dir * 0.5 + parent.vel,
                radius: child_radius,
                health: child_health,
                max_health: child_health,
                rotation: rng.gen::<f32>() * TAU,
                rotation_speed: (rng.gen::<f32>() - 0.5) * 0.02,
                shape_seed: rng.gen(),
            });
        }
    }
}

/// Drift, age out, and collect pickups
pub fn update_pickups(world: &mut WorldState, bus: &mut MessageBus) {
    let ship_pos = world.ship.pos;
    let ship_size = world.ship.size;
    let ship_alive = !world.ship.is_destroyed;

    let mut i = world.pickups.len();
    while i > 0 {
        i -= 1;

        {
            let pickup = &mut world.pickups[i];
            let vel = pickup.vel;
            pickup.pos += vel;
            pickup.vel *= 0.99;
            pickup.age += 1;
        }

        if world.pickups[i].expired() {
            world.pickups.remove(i);
            bus.publish(Message::PickupExpired);
            continue;
        }

        if ship_alive && world.pickups[i].pos.distance(&ship_pos) < ship_size + 10.0 {
            let pickup = world.pickups.remove(i);
            // Ore is sold on the spot; both kinds land in the wallet
            world.ship.credits += pickup.value;
            bus.publish(Message::PickupCollected {
                kind: pickup.kind,
                value: pickup.value,
            });
        }
    }
}
