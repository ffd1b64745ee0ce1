//! Trader/freighter behavior: haul cargo between planets, run from trouble
//!
//! Flee checks come first: an armed, firing player close by or any pirate
//! in knife range turns the hauler straight away from the threat. Otherwise
//! it navigates to its assigned destination, braking on approach and
//! marking itself for docking on arrival.

use rand_chacha::ChaCha8Rng;
use std::f32::consts::{FRAC_PI_3, FRAC_PI_6};

use crate::ai::memory::{AiMemory, MacroState};
use crate::ai::{comm, AiDecision};
use crate::core::config::SimConfig;
use crate::core::types::{normalize_angle, Vec2};
use crate::entity::npc::{Behavior, Npc};
use crate::events::{Message, MessageBus};
use crate::world::WorldState;

const PANIC_LINES: &[&str] = &[
    "Help! Help!",
    "Someone help!",
    "I'm under attack!",
    "Mayday! Mayday!",
];

/// Throttle between distress beacons (6 s)
const DISTRESS_THROTTLE: u64 = 360;

pub fn evaluate(
    npc: &Npc,
    world: &WorldState,
    mem: &mut AiMemory,
    rng: &mut ChaCha8Rng,
    bus: &mut MessageBus,
    config: &SimConfig,
    distress_out: &mut Vec<Vec2>,
) -> AiDecision {
    let mut decision = AiDecision::idle(npc.heading);
    let ship = &world.ship;
    let mut fleeing = false;

    // Threat 1: the player, armed and shooting, close by
    if !ship.is_destroyed && npc.pos.distance(&ship.pos) < config.trader_player_threat_range {
        let shots_nearby = world.projectiles.iter().any(|p| {
            p.is_player && p.pos.distance(&npc.pos) < config.trader_player_threat_range
        });
        if ship.weapon_cooldown > 0 || shots_nearby {
            decision.desired_heading = ship.pos.angle_to(&npc.pos);
            fleeing = true;

            comm(
                bus,
                rng,
                npc.id,
                PANIC_LINES,
                &mut mem.last_panic_comm,
                world.tick,
                240,
            );
            send_distress(npc, world.tick, mem, bus, distress_out);
        }
    }

    // Threat 2: any pirate in knife range
    if !fleeing {
        for other in &world.npcs {
            if other.behavior != Behavior::Aggressive {
                continue;
            }
            if npc.pos.distance(&other.pos) < config.trader_pirate_threat_range {
                decision.desired_heading = other.pos.angle_to(&npc.pos);
                fleeing = true;

                comm(
                    bus,
                    rng,
                    npc.id,
                    &["Pirates!"],
                    &mut mem.last_panic_comm,
                    world.tick,
                    300,
                );
                send_distress(npc, world.tick, mem, bus, distress_out);
                break;
            }
        }
    }

    if fleeing {
        decision.fleeing = true;
        mem.state = MacroState::Fleeing;
        // Thrust only once roughly pointed away; a tight turn first
        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        decision.should_thrust = angle_diff.abs() < FRAC_PI_6;
        return decision;
    }

    if mem.state == MacroState::Fleeing {
        mem.state = MacroState::Traveling;
    }

    // Destination run. No assigned planet means drifting until one is set.
    let planet = match npc.target_planet.and_then(|id| world.planet(id)) {
        Some(planet) => planet,
        None => return decision,
    };

    let dist = npc.pos.distance(&planet.pos);
    if dist > planet.radius + 50.0 {
        mem.state = MacroState::Traveling;
        decision.desired_heading = npc.pos.angle_to(&planet.pos);

        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < FRAC_PI_3 {
            let to_planet = (planet.pos - npc.pos).normalize();
            let closing_speed = npc.vel.dot(&to_planet);

            if dist < planet.radius + config.trader_brake_range
                && closing_speed > npc.max_speed * config.trader_brake_speed_fraction
            {
                decision.should_brake = true;
            } else {
                decision.should_thrust = true;
            }
        }
    } else {
        // Arrived: dock instead of colliding with the planet
        decision.dock = true;
        bus.publish(Message::WarpEffect {
            x: npc.pos.x,
            y: npc.pos.y,
            kind: crate::events::WarpKind::Land,
        });
    }

    decision
}

fn send_distress(
    npc: &Npc,
    tick: u64,
    mem: &mut AiMemory,
    bus: &mut MessageBus,
    distress_out: &mut Vec<Vec2>,
) {
    let due = mem
        .last_distress
        .map_or(true, |t| tick.saturating_sub(t) > DISTRESS_THROTTLE);
    if due {
        mem.last_distress = Some(tick);
        bus.publish(Message::Distress {
            npc: npc.id,
            x: npc.pos.x,
            y: npc.pos.y,
        });
        distress_out.push(npc.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PlanetId;
    use crate::entity::npc::NpcClass;
    use crate::entity::planet::Planet;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn setup() -> (WorldState, ChaCha8Rng, MessageBus, SimConfig) {
        let mut world = WorldState::new();
        world.ship.pos = Vec2::new(5000.0, 5000.0);
        world
            .planets
            .push(Planet::new(0, "Depot", Vec2::new(1000.0, 0.0), 80.0, true));
        (
            world,
            ChaCha8Rng::seed_from_u64(42),
            MessageBus::new(),
            SimConfig::default(),
        )
    }

    fn trader_bound_for_depot(pos: Vec2) -> Npc {
        let mut npc = Npc::from_class(NpcClass::Trader, pos);
        npc.target_planet = Some(PlanetId(0));
        npc
    }

    #[test]
    fn test_flees_armed_player_and_sends_distress() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(200.0, 0.0);
        world.ship.weapon_cooldown = 5;

        let trader = trader_bound_for_depot(Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &trader,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(decision.fleeing);
        // Directly away from the player at (200, 0) means -x
        assert!((normalize_angle(decision.desired_heading - PI)).abs() < 1e-5);
        assert_eq!(distress.len(), 1);
        assert!(bus.log().iter().any(|m| m.kind() == "npc.distress"));
    }

    #[test]
    fn test_idle_player_nearby_is_not_a_threat() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(200.0, 0.0);
        world.ship.weapon_cooldown = 0;

        let trader = trader_bound_for_depot(Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &trader,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(!decision.fleeing);
        assert!(distress.is_empty());
    }

    #[test]
    fn test_flees_pirate_in_knife_range() {
        let (mut world, mut rng, mut bus, config) = setup();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Pirate, Vec2::new(150.0, 0.0)));

        let trader = trader_bound_for_depot(Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &trader,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(decision.fleeing);
        assert_eq!(mem.state, MacroState::Fleeing);
    }

    #[test]
    fn test_distress_beacon_is_throttled() {
        let (mut world, mut rng, mut bus, config) = setup();
        world
            .npcs
            .push(Npc::from_class(NpcClass::Pirate, Vec2::new(150.0, 0.0)));

        let trader = trader_bound_for_depot(Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        for tick in 0..10 {
            world.tick = tick;
            evaluate(
                &trader,
                &world,
                &mut mem,
                &mut rng,
                &mut bus,
                &config,
                &mut distress,
            );
        }
        assert_eq!(distress.len(), 1);
    }

    #[test]
    fn test_steers_toward_destination() {
        let (world, mut rng, mut bus, config) = setup();
        let trader = trader_bound_for_depot(Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &trader,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(decision.desired_heading.abs() < 1e-5);
        assert!(decision.should_thrust);
        assert!(!decision.should_brake);
    }

    #[test]
    fn test_brakes_on_fast_approach() {
        let (world, mut rng, mut bus, config) = setup();
        // 150 u from the surface, closing fast
        let mut trader = trader_bound_for_depot(Vec2::new(770.0, 0.0));
        trader.heading = 0.0;
        trader.vel = Vec2::new(0.4, 0.0);

        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &trader,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(decision.should_brake);
        assert!(!decision.should_thrust);
    }

    #[test]
    fn test_docks_on_arrival() {
        let (world, mut rng, mut bus, config) = setup();
        let trader = trader_bound_for_depot(Vec2::new(900.0, 0.0));

        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &trader,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(decision.dock);
        assert!(bus.log().iter().any(|m| m.kind() == "warp.effect.created"));
    }

    #[test]
    fn test_no_destination_is_a_noop() {
        let (world, mut rng, mut bus, config) = setup();
        let npc = Npc::from_class(NpcClass::Freighter, Vec2::new(0.0, 0.0));

        let mut mem = AiMemory::default();
        let mut distress = Vec::new();
        let decision = evaluate(
            &npc,
            &world,
            &mut mem,
            &mut rng,
            &mut bus,
            &config,
            &mut distress,
        );

        assert!(!decision.should_thrust);
        assert!(!decision.should_brake);
        assert!(!decision.dock);
    }
}
