//! Pirate behavior: hunt the player and merchant shipping, run from the law
//!
//! Priority chain: evade a pursuing patrol, else hunt the nearest valid
//! target, else wander. First matching rule wins.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, TAU};

use crate::ai::memory::{AiMemory, MacroState};
use crate::ai::{comm, intercept_heading, AiDecision};
use crate::core::config::SimConfig;
use crate::core::types::{normalize_angle, Vec2};
use crate::entity::npc::{Behavior, Npc};
use crate::events::MessageBus;
use crate::world::WorldState;

const FLEE_LINES: &[&str] = &[
    "It's the feds!",
    "Patrol incoming!",
    "Time to go!",
    "Not today!",
];

const ATTACK_LINES: &[&str] = &[
    "Surrender your cargo!",
    "This is a raid!",
    "You're mine now!",
    "Nowhere to run!",
];

const TAUNT_LINES: &[&str] = &[
    "You think the patrols can save you?",
    "Bounty hunter, huh? Try me.",
    "Your head's worth credits.",
];

pub fn evaluate(
    npc: &Npc,
    world: &WorldState,
    mem: &mut AiMemory,
    rng: &mut ChaCha8Rng,
    bus: &mut MessageBus,
    config: &SimConfig,
) -> AiDecision {
    let mut decision = AiDecision::idle(npc.heading);
    let ship = &world.ship;

    // A notorious bounty hunter gets taunted on approach
    if world.reputation.pirate <= -5 && npc.pos.distance(&ship.pos) < 450.0 {
        comm(
            bus,
            rng,
            npc.id,
            TAUNT_LINES,
            &mut mem.last_taunt,
            world.tick,
            480,
        );
    }

    // Rule 1: a patrol locked onto us nearby means run
    let threat = world
        .npcs
        .iter()
        .filter(|other| other.behavior == Behavior::Lawful && other.pursuing)
        .map(|other| (other.pos, npc.pos.distance(&other.pos)))
        .filter(|(_, d)| *d < config.pirate_evade_range)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((patrol_pos, _)) = threat {
        // Directly away, with a little lateral jitter so the flight path
        // does not collapse into a straight chase line
        let away = patrol_pos.angle_to(&npc.pos);
        decision.desired_heading = away + (rng.gen::<f32>() - 0.5) * 0.2;
        decision.fleeing = true;
        mem.state = MacroState::Fleeing;

        comm(
            bus,
            rng,
            npc.id,
            FLEE_LINES,
            &mut mem.last_flee_comm,
            world.tick,
            300,
        );

        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < FRAC_PI_6 {
            decision.should_thrust = true;
        } else if angle_diff.abs() < FRAC_PI_3 {
            decision.should_thrust = true;
            decision.thrust_power = 0.6;
        }
        return decision;
    }

    // Rule 2: hunt the nearest valid target (player or merchant)
    let mut target: Option<(Vec2, Vec2)> = None;
    let mut target_dist = config.pirate_engage_range;

    if !ship.is_destroyed && !ship.is_landed {
        let d = npc.pos.distance(&ship.pos);
        if d < target_dist {
            target = Some((ship.pos, ship.vel));
            target_dist = d;
        }
    }

    for other in &world.npcs {
        if other.behavior != Behavior::Passive {
            continue;
        }
        let d = npc.pos.distance(&other.pos);
        if d < target_dist {
            target = Some((other.pos, other.vel));
            target_dist = d;
        }
    }

    if let Some((target_pos, target_vel)) = target {
        mem.state = MacroState::Pursuing;
        decision.pursuing = true;

        if target_dist < 400.0 {
            comm(
                bus,
                rng,
                npc.id,
                ATTACK_LINES,
                &mut mem.last_attack_comm,
                world.tick,
                480,
            );
        }

        decision.desired_heading =
            intercept_heading(npc.pos, target_pos, target_vel, target_dist, npc.max_speed);
        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);

        // Arrive bands: ease off close in rather than orbiting the target
        if target_dist > 180.0 {
            if angle_diff.abs() < FRAC_PI_3 {
                decision.should_thrust = true;
            }
        } else if target_dist > 110.0 {
            if angle_diff.abs() < FRAC_PI_4 {
                decision.should_thrust = true;
                decision.thrust_power = 0.6;
            }
        } else if target_dist < 90.0 {
            decision.should_brake = true;
        }

        if target_dist < config.pirate_fire_range
            && angle_diff.abs() < FRAC_PI_6
            && npc.weapon_cooldown == 0
        {
            decision.should_fire = true;
        }
    } else {
        // Rule 3: wander on a slowly drifting random heading
        mem.state = MacroState::Wandering;
        if mem.wander_angle.is_none() || rng.gen::<f32>() < config.wander_reroll_chance {
            mem.wander_angle = Some(rng.gen::<f32>() * TAU);
        }
        decision.desired_heading = mem.wander_angle.unwrap_or(npc.heading);

        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < FRAC_PI_4 {
            decision.should_thrust = true;
        }
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::npc::NpcClass;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn setup() -> (WorldState, ChaCha8Rng, MessageBus, SimConfig) {
        (
            WorldState::new(),
            ChaCha8Rng::seed_from_u64(42),
            MessageBus::new(),
            SimConfig::default(),
        )
    }

    #[test]
    fn test_evade_flees_away_from_pursuing_patrol_and_never_fires() {
        let (mut world, mut rng, mut bus, config) = setup();
        // Park the player far away so the pirate has no target
        world.ship.pos = Vec2::new(5000.0, 5000.0);

        let mut patrol = Npc::from_class(NpcClass::Patrol, Vec2::new(200.0, 0.0));
        patrol.pursuing = true;
        world.npcs.push(patrol);
        let pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));

        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        assert!(decision.fleeing);
        assert!(!decision.should_fire);
        assert_eq!(mem.state, MacroState::Fleeing);
        // Away from the patrol means roughly -x, i.e. |heading| near PI
        // (within the 0.1 rad jitter)
        assert!(normalize_angle(decision.desired_heading - PI).abs() < 0.15);
    }

    #[test]
    fn test_patrol_not_pursuing_is_ignored() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(500.0, 0.0);

        let patrol = Npc::from_class(NpcClass::Patrol, Vec2::new(200.0, 0.0));
        world.npcs.push(patrol);
        let pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));

        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        assert!(!decision.fleeing);
        assert_eq!(mem.state, MacroState::Pursuing);
    }

    #[test]
    fn test_hunts_player_with_intercept_heading() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(500.0, 0.0);
        world.ship.vel = Vec2::default();

        let pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        assert!(decision.pursuing);
        // Stationary player: intercept is the direct bearing
        assert!(decision.desired_heading.abs() < 1e-5);
        // Too far to fire
        assert!(!decision.should_fire);
    }

    #[test]
    fn test_fires_when_close_and_aligned() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(200.0, 0.0);

        let mut pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));
        pirate.heading = 0.0;
        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        assert!(decision.should_fire);
    }

    #[test]
    fn test_holds_fire_when_misaligned() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(200.0, 0.0);

        let mut pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));
        pirate.heading = PI / 2.0;
        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        assert!(!decision.should_fire);
    }

    #[test]
    fn test_prefers_closer_merchant_over_player() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(700.0, 0.0);
        world
            .npcs
            .push(Npc::from_class(NpcClass::Trader, Vec2::new(0.0, 300.0)));

        let pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        // Heading toward the trader (+y), not the player (+x)
        assert!((decision.desired_heading - PI / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_wanders_with_no_targets() {
        let (mut world, mut rng, mut bus, config) = setup();
        world.ship.pos = Vec2::new(5000.0, 5000.0);

        let pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(0.0, 0.0));
        let mut mem = AiMemory::default();
        let decision = evaluate(&pirate, &world, &mut mem, &mut rng, &mut bus, &config);

        assert_eq!(mem.state, MacroState::Wandering);
        assert!(mem.wander_angle.is_some());
        assert!(!decision.should_fire);
    }
}
