//! Weapon fire resolution
//!
//! A shot spawns just off the shooter's nose with velocity
//! `heading-vector * weapon.speed + shooter.velocity`, after perturbing the
//! heading by a spread sample. Player shots additionally carry bloom:
//! sustained fire loosens the grouping, holding fire tightens it back up.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::ai::AiDecision;
use crate::core::config::SimConfig;
use crate::core::types::Vec2;
use crate::entity::projectile::{Projectile, ProjectileOwner};
use crate::entity::weapon::WeaponSpec;
use crate::events::{Message, MessageBus};
use crate::world::WorldState;

/// Uniform sample from `[-spread, +spread]`
fn sample_spread(rng: &mut ChaCha8Rng, spread: f32) -> f32 {
    if spread <= 0.0 {
        0.0
    } else {
        (rng.gen::<f32>() * 2.0 - 1.0) * spread
    }
}

/// Build a projectile leaving the shooter's nose
fn spawn_projectile(
    pos: Vec2,
    vel: Vec2,
    size: f32,
    heading: f32,
    weapon: &WeaponSpec,
    owner: ProjectileOwner,
    is_player: bool,
) -> Projectile {
    let dir = Vec2::from_angle(heading);
    Projectile {
        pos: pos + dir * (size + 5.0),
        vel: dir * weapon.kind.speed() + vel,
        owner,
        weapon: weapon.kind,
        damage: weapon.damage,
        age: 0,
        is_player,
    }
}

/// Resolve the fire intents of this tick's AI decisions
pub fn fire_npc_decisions(
    world: &mut WorldState,
    decisions: &[AiDecision],
    bus: &mut MessageBus,
    rng: &mut ChaCha8Rng,
) {
    let spread_mult = world.debug.spread_mult;

    for (i, decision) in decisions.iter().enumerate().take(world.npcs.len()) {
        if !decision.should_fire {
            continue;
        }

        let npc = &world.npcs[i];
        let weapon = match npc.weapon {
            Some(weapon) => weapon,
            None => continue,
        };
        if npc.weapon_cooldown > 0 {
            continue;
        }

        let (pos, vel, size, id) = (npc.pos, npc.vel, npc.size, npc.id);
        let heading = npc.heading + sample_spread(rng, weapon.kind.spread() * spread_mult);

        world.projectiles.push(spawn_projectile(
            pos,
            vel,
            size,
            heading,
            &weapon,
            ProjectileOwner::Npc(id),
            false,
        ));
        world.npcs[i].weapon_cooldown = weapon.cooldown;

        bus.publish(Message::WeaponFired {
            weapon: weapon.kind,
            shooter: Some(id),
            is_player: false,
        });
    }
}

/// Resolve the player's fire intent for this tick
pub fn fire_player(
    world: &mut WorldState,
    bus: &mut MessageBus,
    rng: &mut ChaCha8Rng,
    config: &SimConfig,
) {
    let ship = &world.ship;
    if ship.is_destroyed || ship.is_landed || ship.weapon_cooldown > 0 {
        return;
    }
    let weapon = match ship.active_weapon() {
        Some(weapon) => *weapon,
        None => return,
    };

    let spread = (weapon.kind.spread() + ship.bloom) * world.debug.spread_mult;
    let heading = ship.heading + sample_spread(rng, spread);
    let (pos, vel, size) = (ship.pos, ship.vel, ship.size);

    world.projectiles.push(spawn_projectile(
        pos,
        vel,
        size,
        heading,
        &weapon,
        ProjectileOwner::Player,
        true,
    ));

    let ship = &mut world.ship;
    ship.weapon_cooldown = weapon.cooldown;
    ship.bloom = (ship.bloom + config.bloom_per_shot).min(config.bloom_max);

    bus.publish(Message::WeaponFired {
        weapon: weapon.kind,
        shooter: None,
        is_player: true,
    });
}
