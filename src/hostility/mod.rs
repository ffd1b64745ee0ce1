//! Hostility tracker
//!
//! Runs once per tick, before any AI decisions: derives whether the player
//! is currently provoking lawful factions and advances the patrol
//! warning/stand-down state machine attached to the ship.
//!
//! The warning is a property of the player, not per-NPC; one lawful agent
//! in range is enough to trigger it system-wide.

use crate::core::config::SimConfig;
use crate::core::types::normalize_angle;
use crate::entity::npc::Behavior;
use crate::events::{Message, MessageBus, NoticeKind};
use crate::world::WorldState;

/// Per-tick hostility derivation. `is_hostile` is never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostilityStatus {
    pub is_hostile: bool,
    pub recently_fired: bool,
}

/// Derive the player's hostility for this tick.
///
/// A player is hostile if a recent projectile of theirs points within a
/// narrow cone at a lawful or passive NPC nearby, or if their kill record
/// marks them a career criminal (many kills, mostly not pirates).
pub fn assess(world: &WorldState, config: &SimConfig) -> HostilityStatus {
    let ship = &world.ship;
    let mut status = HostilityStatus::default();

    if !ship.is_destroyed {
        'projectiles: for proj in &world.projectiles {
            if !proj.is_player || proj.age >= config.hostile_projectile_age {
                continue;
            }
            status.recently_fired = true;

            let travel_angle = proj.vel.angle();
            for npc in &world.npcs {
                if !matches!(npc.behavior, Behavior::Lawful | Behavior::Passive) {
                    continue;
                }
                if npc.pos.distance(&proj.pos) < config.hostile_scan_radius {
                    let to_npc = proj.pos.angle_to(&npc.pos);
                    if normalize_angle(to_npc - travel_angle).abs() < config.hostile_fire_cone {
                        status.is_hostile = true;
                        break 'projectiles;
                    }
                }
            }
        }
    }

    // Career criminal: too many kills, too few of them pirates
    if ship.kills > config.career_kill_threshold
        && (ship.pirate_kills as f32) < ship.kills as f32 * 0.5
    {
        status.is_hostile = true;
    }

    status
}

/// Advance the warning/stand-down state machine.
///
/// peaceful -> warned (hostile, lawful agent in warning range)
/// warned -> expired (after the warning duration; patrols may engage)
/// warned/expired -> standing down (forgiveness window elapses in peace)
/// standing down -> peaceful (grace period ends)
pub fn advance_warning_state(
    world: &mut WorldState,
    status: HostilityStatus,
    bus: &mut MessageBus,
    config: &SimConfig,
) {
    let tick = world.tick;

    if status.is_hostile {
        let record = &world.ship.hostility;
        if !record.warning_shown && !record.warning_expired {
            let patrol_nearby = world.npcs.iter().any(|npc| {
                npc.behavior == Behavior::Lawful
                    && npc.pos.distance(&world.ship.pos) < config.warning_range
            });

            if patrol_nearby {
                let record = &mut world.ship.hostility;
                record.warning_shown = true;
                record.warning_tick = tick;
                record.warning_expired = false;
                record.standing_down = false;
                bus.publish(Message::PatrolWarning {
                    message: "PATROL WARNING: CEASE HOSTILE ACTIONS".into(),
                });
                bus.publish(Message::UiMessage {
                    message: "PATROL WARNING: CEASE HOSTILE ACTIONS".into(),
                    kind: NoticeKind::Warning,
                });
            }
        }

        let record = &mut world.ship.hostility;
        if record.warning_shown
            && !record.warning_expired
            && tick - record.warning_tick > config.warning_duration_ticks
        {
            record.warning_expired = true;
            tracing::debug!(tick, "patrol warning expired; patrols weapons-free");
        }
    }

    // Peace long enough after a warning earns a stand-down
    if !status.recently_fired && world.ship.hostility.warning_shown {
        let record = &mut world.ship.hostility;
        if tick - record.warning_tick > config.forgiveness_ticks && !record.standing_down {
            record.standing_down = true;
            record.stand_down_tick = tick;
            record.warning_shown = false;
            record.warning_expired = false;
            bus.publish(Message::PatrolStandDown {
                message: "PATROL: STANDING DOWN".into(),
            });
        }
    }

    // Stand-down grace self-clears
    let record = &mut world.ship.hostility;
    if record.standing_down && tick - record.stand_down_tick >= config.stand_down_ticks {
        record.standing_down = false;
    }

    debug_assert!(
        !(record.warning_active() && record.standing_down),
        "warning and stand-down must never overlap"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::entity::npc::{Npc, NpcClass};
    use crate::entity::projectile::{Projectile, ProjectileOwner};
    use crate::entity::weapon::WeaponKind;

    fn player_shot_at(world: &mut WorldState, heading: f32) {
        world.projectiles.push(Projectile {
            pos: world.ship.pos,
            vel: Vec2::from_angle(heading) * 2.0,
            owner: ProjectileOwner::Player,
            weapon: WeaponKind::Laser,
            damage: 10.0,
            age: 0,
            is_player: true,
        });
    }

    #[test]
    fn test_fire_into_cone_at_trader_is_hostile() {
        let config = SimConfig::default();
        let mut world = WorldState::new();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Trader, Vec2::new(300.0, 0.0)));
        player_shot_at(&mut world, 0.0);

        let status = assess(&world, &config);
        assert!(status.is_hostile);
        assert!(status.recently_fired);
    }

    #[test]
    fn test_fire_away_from_trader_is_not_hostile() {
        let config = SimConfig::default();
        let mut world = WorldState::new();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Trader, Vec2::new(300.0, 0.0)));
        player_shot_at(&mut world, std::f32::consts::PI);

        let status = assess(&world, &config);
        assert!(!status.is_hostile);
        assert!(status.recently_fired);
    }

    #[test]
    fn test_fire_at_pirate_is_not_hostile() {
        let config = SimConfig::default();
        let mut world = WorldState::new();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Pirate, Vec2::new(300.0, 0.0)));
        player_shot_at(&mut world, 0.0);

        assert!(!assess(&world, &config).is_hostile);
    }

    #[test]
    fn test_old_projectiles_are_ignored() {
        let config = SimConfig::default();
        let mut world = WorldState::new();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Trader, Vec2::new(300.0, 0.0)));
        player_shot_at(&mut world, 0.0);
        world.projectiles[0].age = 30;

        let status = assess(&world, &config);
        assert!(!status.is_hostile);
        assert!(!status.recently_fired);
    }

    #[test]
    fn test_career_criminal_is_hostile_without_recent_fire() {
        let config = SimConfig::default();
        let mut world = WorldState::new();
        world.ship.kills = 6;
        world.ship.pirate_kills = 2;

        let status = assess(&world, &config);
        assert!(status.is_hostile);
        assert!(!status.recently_fired);
    }

    #[test]
    fn test_pirate_hunter_is_not_a_career_criminal() {
        let config = SimConfig::default();
        let mut world = WorldState::new();
        world.ship.kills = 10;
        world.ship.pirate_kills = 8;

        assert!(!assess(&world, &config).is_hostile);
    }

    #[test]
    fn test_warning_needs_a_patrol_in_range() {
        let config = SimConfig::default();
        let mut bus = MessageBus::new();
        let mut world = WorldState::new();
        let hostile = HostilityStatus {
            is_hostile: true,
            recently_fired: true,
        };

        // No patrol anywhere: no warning
        advance_warning_state(&mut world, hostile, &mut bus, &config);
        assert!(!world.ship.hostility.warning_shown);

        // Patrol in range: warning fires once
        world
            .npcs
            .push(Npc::from_class(NpcClass::Patrol, Vec2::new(500.0, 0.0)));
        advance_warning_state(&mut world, hostile, &mut bus, &config);
        assert!(world.ship.hostility.warning_shown);
        assert!(bus
            .log()
            .iter()
            .any(|m| m.kind() == "patrol.warning"));
    }

    #[test]
    fn test_warning_expires_after_duration() {
        let config = SimConfig::default();
        let mut bus = MessageBus::new();
        let mut world = WorldState::new();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Patrol, Vec2::new(500.0, 0.0)));
        let hostile = HostilityStatus {
            is_hostile: true,
            recently_fired: true,
        };

        world.tick = 100;
        advance_warning_state(&mut world, hostile, &mut bus, &config);
        assert!(!world.ship.hostility.warning_expired);

        world.tick = 100 + config.warning_duration_ticks + 1;
        advance_warning_state(&mut world, hostile, &mut bus, &config);
        assert!(world.ship.hostility.warning_expired);
    }

    #[test]
    fn test_stand_down_after_forgiveness_then_clears() {
        let config = SimConfig::default();
        let mut bus = MessageBus::new();
        let mut world = WorldState::new();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Patrol, Vec2::new(500.0, 0.0)));

        world.tick = 10;
        advance_warning_state(
            &mut world,
            HostilityStatus {
                is_hostile: true,
                recently_fired: true,
            },
            &mut bus,
            &config,
        );
        assert!(world.ship.hostility.warning_shown);

        // Peaceful past the forgiveness window: stand down begins
        world.tick = 10 + config.forgiveness_ticks + 1;
        advance_warning_state(&mut world, HostilityStatus::default(), &mut bus, &config);
        let record = &world.ship.hostility;
        assert!(record.standing_down);
        assert!(!record.warning_shown);
        assert!(!record.warning_expired);
        assert!(bus.log().iter().any(|m| m.kind() == "patrol.standDown"));

        // Grace period ends: fully peaceful
        world.tick += config.stand_down_ticks;
        advance_warning_state(&mut world, HostilityStatus::default(), &mut bus, &config);
        assert!(!world.ship.hostility.standing_down);
    }
}
