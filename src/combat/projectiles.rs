//! Projectile advancement and collision resolution
//!
//! Per projectile and in this order: the player ship (skipped for
//! player-owned shots), then NPCs (skipping the owner), then asteroids.
//! The first qualifying hit consumes the projectile. Outcomes are
//! published, never applied to rendering or audio directly.

use crate::combat::apply_damage;
use crate::core::types::point_in_circle;
use crate::entity::npc::Attribution;
use crate::entity::projectile::Projectile;
use crate::events::{ExplosionSize, HitTarget, Message, MessageBus};
use crate::world::WorldState;

pub fn update_projectiles(world: &mut WorldState, bus: &mut MessageBus) {
    let mut i = world.projectiles.len();
    while i > 0 {
        i -= 1;

        {
            let proj = &mut world.projectiles[i];
            proj.pos += proj.vel;
            proj.age += 1;

            if proj.expired() {
                let weapon = proj.weapon;
                world.projectiles.remove(i);
                bus.publish(Message::ProjectileExpired { weapon });
                continue;
            }
        }

        let proj = world.projectiles[i].clone();

        if !proj.is_player
            && !world.ship.is_destroyed
            && point_in_circle(proj.pos, world.ship.pos, world.ship.size)
        {
            hit_player(world, &proj, bus);
            world.projectiles.remove(i);
            continue;
        }

        if let Some(j) = world.npcs.iter().position(|npc| {
            !proj.owned_by(npc.id) && point_in_circle(proj.pos, npc.pos, npc.size)
        }) {
            hit_npc(world, j, &proj, bus);
            world.projectiles.remove(i);
            continue;
        }

        if let Some(j) = world
            .asteroids
            .iter()
            .position(|a| point_in_circle(proj.pos, a.pos, a.radius))
        {
            hit_asteroid(world, j, &proj, bus);
            world.projectiles.remove(i);
        }
    }
}

fn hit_player(world: &mut WorldState, proj: &Projectile, bus: &mut MessageBus) {
    // God mode zeroes the damage; the hit is still consumed and published
    let damage = if world.debug.god_mode { 0.0 } else { proj.damage };

    let ship = &mut world.ship;
    let had_shield = ship.shield > 0.0;
    let split = apply_damage(&mut ship.shield, &mut ship.health, damage);

    if had_shield {
        bus.publish(Message::ShieldHit {
            damage: split.shield,
        });
    } else {
        bus.publish(Message::ShipDamage { damage: split.hull });
    }
    bus.publish(Message::ProjectileHit {
        target: HitTarget::PlayerShip,
        damage,
        x: proj.pos.x,
        y: proj.pos.y,
        is_player_projectile: false,
    });
    bus.publish(Message::Explosion {
        x: proj.pos.x,
        y: proj.pos.y,
        size: ExplosionSize::Small,
        impact: true,
    });
    bus.publish(Message::DebugDamage {
        x: proj.pos.x,
        y: proj.pos.y,
        amount: damage,
    });

    let ship = &mut world.ship;
    if ship.health <= 0.0 && !ship.is_destroyed {
        ship.is_destroyed = true;
        let (x, y) = (ship.pos.x, ship.pos.y);
        bus.publish(Message::ShipDeath);
        bus.publish(Message::Explosion {
            x,
            y,
            size: ExplosionSize::Large,
            impact: false,
        });
        bus.publish(Message::UiMessage {
            message: "SHIP DESTROYED".into(),
            kind: crate::events::NoticeKind::Error,
        });
    }
}

fn hit_npc(world: &mut WorldState, index: usize, proj: &Projectile, bus: &mut MessageBus) {
    let npc = &mut world.npcs[index];
    apply_damage(&mut npc.shield, &mut npc.health, proj.damage);

    // Kill attribution happens exactly once, at the moment of death
    if npc.health <= 0.0 && npc.killed_by.is_none() {
        npc.killed_by = Some(if proj.is_player {
            Attribution::Player
        } else {
            Attribution::Npc
        });
    }

    let id = npc.id;
    bus.publish(Message::ProjectileHit {
        target: HitTarget::Npc(id),
        damage: proj.damage,
        x: proj.pos.x,
        y: proj.pos.y,
        is_player_projectile: proj.is_player,
    });
    bus.publish(Message::Explosion {
        x: proj.pos.x,
        y: proj.pos.y,
        size: ExplosionSize::Small,
        impact: true,
    });
    bus.publish(Message::DebugDamage {
        x: proj.pos.x,
        y: proj.pos.y,
        amount: proj.damage,
    });
}

fn hit_asteroid(world: &mut WorldState, index: usize, proj: &Projectile, bus: &mut MessageBus) {
    let asteroid = &mut world.asteroids[index];
    asteroid.health = (asteroid.health - proj.damage).max(0.0);

    let id = asteroid.id;
    bus.publish(Message::ProjectileHit {
        target: HitTarget::Asteroid(id),
        damage: proj.damage,
        x: proj.pos.x,
        y: proj.pos.y,
        is_player_projectile: proj.is_player,
    });
    bus.publish(Message::Explosion {
        x: proj.pos.x,
        y: proj.pos.y,
        size: ExplosionSize::Small,
        impact: true,
    });
}
