//! Patrol behavior: hunt pirates, police the player
//!
//! Priority chain: answer a distress commitment, engage an attacking pirate,
//! pursue a hostile player once the warning has expired, shadow the player
//! during the warning window, otherwise drift on a reversible patrol angle.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use crate::ai::memory::{AiMemory, MacroState};
use crate::ai::{comm, intercept_heading, AiDecision};
use crate::core::config::SimConfig;
use crate::core::types::normalize_angle;
use crate::entity::npc::{Behavior, Npc};
use crate::events::{Message, MessageBus};
use crate::hostility::HostilityStatus;
use crate::world::WorldState;

const PURSUIT_LINES: &[&str] = &[
    "Stop right there!",
    "Halt, criminal!",
    "You're under arrest!",
    "Cease and desist!",
];

const HAIL_LINES: &[&str] = &[
    "PATROL: Good hunting, captain.",
    "PATROL: We appreciate your service.",
    "PATROL: Stay sharp out there.",
];

/// Hit chance by distance bucket; tuned for feel, not ballistics
fn accuracy_for_distance(dist: f32) -> f32 {
    if dist < 150.0 {
        0.8
    } else if dist < 300.0 {
        0.5
    } else if dist < 450.0 {
        0.3
    } else {
        0.2
    }
}

/// Fast-moving targets are harder to hit, down to a floor
fn movement_penalty(target_speed: f32, config: &SimConfig) -> f32 {
    (1.0 - (target_speed / config.accuracy_reference_speed) * 0.4)
        .max(config.movement_penalty_floor)
}

pub fn evaluate(
    npc: &Npc,
    world: &WorldState,
    status: HostilityStatus,
    mem: &mut AiMemory,
    rng: &mut ChaCha8Rng,
    bus: &mut MessageBus,
    config: &SimConfig,
) -> AiDecision {
    let mut decision = AiDecision::idle(npc.heading);
    let ship = &world.ship;
    let dist_to_player = npc.pos.distance(&ship.pos);

    // A decorated pirate hunter gets a friendly hail in passing
    if world.reputation.patrol >= 6 && dist_to_player < 450.0 {
        comm(
            bus,
            rng,
            npc.id,
            HAIL_LINES,
            &mut mem.last_hail,
            world.tick,
            540,
        );
    }

    // A standing distress commitment overrides everything else
    if let Some(target) = mem.respond_target {
        if world.tick < target.expires {
            let dist = npc.pos.distance(&target.pos);
            decision.desired_heading = npc.pos.angle_to(&target.pos);
            decision.pursuing = true;
            mem.state = MacroState::Responding;

            let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
            if angle_diff.abs() < PI * 0.9 {
                decision.should_thrust = true;
            }
            if dist < 120.0 {
                mem.respond_target = None;
                decision.pursuing = false;
            }
            return decision;
        }
        mem.respond_target = None;
    }

    // A pirate hunter gets patrol backup and longer sensor sweeps
    let player_is_friendly = ship.pirate_kills >= 3
        && (ship.kills == 0 || ship.pirate_kills as f32 >= ship.kills as f32 * 0.8);
    let detect_range = if player_is_friendly {
        config.patrol_detect_range_friendly
    } else {
        config.patrol_detect_range
    };

    // PRIORITY 1: find a pirate worth engaging. One caught in the act
    // (shooting, shaking down a merchant, or on a friendly player) is taken
    // at any distance; otherwise the nearest inside sensor range.
    let mut target: Option<&Npc> = None;
    let mut target_dist = f32::MAX;

    for other in &world.npcs {
        if other.behavior != Behavior::Aggressive {
            continue;
        }
        let dist = npc.pos.distance(&other.pos);

        let shooting_now = other.weapon_cooldown > 0;
        let near_merchant = world.npcs.iter().any(|victim| {
            victim.behavior == Behavior::Passive && other.pos.distance(&victim.pos) < 400.0
        });
        let on_friendly_player =
            player_is_friendly && other.pos.distance(&ship.pos) < 500.0 && !ship.is_destroyed;

        if shooting_now || near_merchant || on_friendly_player {
            target = Some(other);
            target_dist = dist;
            if on_friendly_player && !mem.shown_help_comm {
                mem.shown_help_comm = true;
                bus.publish(Message::PatrolAssist {
                    message: "PATROL: ENGAGING HOSTILE - ASSISTANCE PROVIDED".into(),
                });
            }
            break;
        } else if dist < detect_range && dist < target_dist {
            target = Some(other);
            target_dist = dist;
        }
    }

    if let Some(pirate) = target {
        // PRIORITY 3 in the original ordering: run down the pirate
        decision.pursuing = true;
        mem.state = MacroState::Pursuing;
        mem.pursuit_ticks += 1;

        if target_dist < 500.0 {
            comm(
                bus,
                rng,
                npc.id,
                PURSUIT_LINES,
                &mut mem.last_pursuit_comm,
                world.tick,
                360,
            );
        }

        decision.desired_heading =
            intercept_heading(npc.pos, pirate.pos, pirate.vel, target_dist, npc.max_speed);
        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < PI * 0.9 {
            decision.should_thrust = true;
        }

        // Fire with accuracy falloff; a miss still burns half the cooldown
        if target_dist < config.patrol_pirate_fire_range
            && angle_diff.abs() < FRAC_PI_2
            && npc.weapon_cooldown == 0
        {
            let accuracy = accuracy_for_distance(target_dist);
            let penalty = movement_penalty(pirate.vel.length(), config);
            if rng.gen::<f32>() < accuracy * penalty {
                decision.should_fire = true;
            } else {
                decision.half_cooldown = true;
            }
        }

        // Pursuit is abandoned probabilistically: long chases go stale,
        // distant runners get away
        if target_dist > config.pursuit_break_range && rng.gen::<f32>() < 0.05 {
            decision.pursuing = false;
            mem.pursuit_ticks = 0;
            mem.state = MacroState::Patrolling;
        }
        if mem.pursuit_ticks > config.pursuit_give_up_ticks && rng.gen::<f32>() < 0.1 {
            decision.pursuing = false;
            mem.pursuit_ticks = 0;
            mem.state = MacroState::Patrolling;
        }

        return decision;
    }

    mem.pursuit_ticks = 0;

    let record = &ship.hostility;
    if status.is_hostile && record.warning_expired && dist_to_player < 1000.0 && !ship.is_destroyed
    {
        // PRIORITY 2: the warning ran out; the player is fair game
        mem.state = MacroState::Pursuing;
        decision.pursuing = true;

        if dist_to_player < 400.0 {
            comm(
                bus,
                rng,
                npc.id,
                &["Criminal detected!"],
                &mut mem.last_hostile_comm,
                world.tick,
                300,
            );
        }

        decision.desired_heading =
            intercept_heading(npc.pos, ship.pos, ship.vel, dist_to_player, npc.max_speed);
        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < PI * 0.9 {
            decision.should_thrust = true;
        }

        if dist_to_player < config.patrol_player_fire_range
            && angle_diff.abs() < FRAC_PI_3
            && npc.weapon_cooldown == 0
        {
            decision.should_fire = true;
        }
    } else if status.is_hostile
        && record.warning_shown
        && !record.warning_expired
        && dist_to_player < 1000.0
    {
        // Warning window: close in, weapons cold
        mem.state = MacroState::Warning;

        if !mem.shown_warning_comm {
            mem.shown_warning_comm = true;
            bus.publish(Message::NpcComm {
                npc: npc.id,
                message: "CEASE FIRE!".into(),
            });
        }

        decision.desired_heading =
            intercept_heading(npc.pos, ship.pos, ship.vel, dist_to_player, npc.max_speed);
        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < PI * 0.9 {
            decision.should_thrust = true;
        }
    } else {
        // PRIORITY 4: reversible patrol-angle drift
        mem.state = MacroState::Patrolling;
        mem.shown_warning_comm = false;

        let angle = match mem.patrol_angle {
            Some(angle) => angle,
            None => {
                mem.patrol_speed = 0.008 + rng.gen::<f32>() * 0.008;
                mem.patrol_direction = if rng.gen::<f32>() < 0.5 { 1.0 } else { -1.0 };
                let initial = rng.gen::<f32>() * std::f32::consts::TAU;
                mem.patrol_angle = Some(initial);
                initial
            }
        };

        if rng.gen::<f32>() < 0.02 {
            mem.patrol_direction *= -1.0;
            mem.patrol_speed = 0.008 + rng.gen::<f32>() * 0.008;
        }

        let next = angle + mem.patrol_speed * mem.patrol_direction;
        mem.patrol_angle = Some(next);
        decision.desired_heading = next;

        if rng.gen::<f32>() < 0.3 {
            decision.desired_heading += (rng.gen::<f32>() - 0.5) * 0.5;
        }

        let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
        if angle_diff.abs() < FRAC_PI_3 {
            decision.should_thrust = true;
        }
    }

    decision
}
