//! AI decision engine
//!
//! For every NPC, the evaluator matching its behavior tag produces a single
//! decision record. Evaluators never mutate other entities: they read world
//! state plus the tick's hostility status, update only their own memory
//! entry, and publish comm messages. Decisions are applied in a separate
//! pass.

pub mod memory;
pub mod orbit;
pub mod patrol;
pub mod pirate;
pub mod trader;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimConfig;
use crate::core::types::{normalize_angle, EntityId, Tick, Vec2};
use crate::entity::npc::{Behavior, Npc};
use crate::events::{Message, MessageBus};
use crate::hostility::HostilityStatus;
use crate::world::WorldState;
use memory::{AiMemoryTable, RespondTarget};

/// Turn rate multiplier while fleeing
pub const FLEE_TURN_MULT: f32 = 2.5;

/// How long a patrol stays committed to a distress location (6 s)
const RESPOND_DURATION_TICKS: u64 = 360;

/// Radius inside which the nearest patrol answers a distress call
const RESPOND_RANGE: f32 = 1600.0;

/// One decision record per NPC per tick
#[derive(Debug, Clone, PartialEq)]
pub struct AiDecision {
    pub desired_heading: f32,
    pub should_thrust: bool,
    pub should_brake: bool,
    pub should_fire: bool,
    pub thrust_power: f32,
    /// Fleeing agents get the turn-rate boost and advertise it to others
    pub fleeing: bool,
    /// Advertised so pirates can spot a patrol locked onto them
    pub pursuing: bool,
    /// Failed accuracy roll: the shot is skipped but half the cooldown is
    /// still consumed
    pub half_cooldown: bool,
    /// Passive hauler arrived at its destination
    pub dock: bool,
}

impl AiDecision {
    /// No-op decision holding the current heading
    pub fn idle(heading: f32) -> Self {
        Self {
            desired_heading: heading,
            should_thrust: false,
            should_brake: false,
            should_fire: false,
            thrust_power: 1.0,
            fleeing: false,
            pursuing: false,
            half_cooldown: false,
            dock: false,
        }
    }
}

/// Heading that leads a moving target: aim at
/// `target_pos + target_vel * (dist / (own_max_speed * 50))`
pub fn intercept_heading(
    from: Vec2,
    target_pos: Vec2,
    target_vel: Vec2,
    dist: f32,
    own_max_speed: f32,
) -> f32 {
    let intercept_time = dist / (own_max_speed * 50.0);
    let aim = target_pos + target_vel * intercept_time;
    from.angle_to(&aim)
}

/// Publish a throttled one-liner on the comm channel
pub(crate) fn comm(
    bus: &mut MessageBus,
    rng: &mut ChaCha8Rng,
    npc: EntityId,
    lines: &[&str],
    last: &mut Option<Tick>,
    tick: Tick,
    throttle: Tick,
) {
    let due = last.map_or(true, |t| tick.saturating_sub(t) > throttle);
    if due {
        let line = lines[rng.gen_range(0..lines.len())];
        bus.publish(Message::NpcComm {
            npc,
            message: line.to_string(),
        });
        *last = Some(tick);
    }
}

/// The decision engine: evaluator dispatch plus the AI memory side table
#[derive(Default)]
pub struct AiEngine {
    pub memory: AiMemoryTable,
}

impl AiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce one decision per NPC, in array order.
    ///
    /// Distress calls published by passive agents this tick are routed to
    /// the nearest patrol afterwards, so the response starts next tick.
    pub fn decide_all(
        &mut self,
        world: &WorldState,
        status: HostilityStatus,
        rng: &mut ChaCha8Rng,
        bus: &mut MessageBus,
        config: &SimConfig,
    ) -> Vec<AiDecision> {
        let mut distress: Vec<Vec2> = Vec::new();

        let decisions: Vec<AiDecision> = world
            .npcs
            .iter()
            .map(|npc| {
                let mem = self.memory.entry(npc.id);
                match npc.behavior {
                    Behavior::Aggressive => pirate::evaluate(npc, world, mem, rng, bus, config),
                    Behavior::Lawful => {
                        patrol::evaluate(npc, world, status, mem, rng, bus, config)
                    }
                    Behavior::Passive => {
                        trader::evaluate(npc, world, mem, rng, bus, config, &mut distress)
                    }
                    Behavior::Default => orbit::evaluate(npc, mem, rng),
                }
            })
            .collect();

        for pos in distress {
            self.route_distress(world, pos, bus, rng);
        }

        decisions
    }

    /// Commit the nearest patrol to a distress location
    fn route_distress(
        &mut self,
        world: &WorldState,
        pos: Vec2,
        bus: &mut MessageBus,
        rng: &mut ChaCha8Rng,
    ) {
        let responder = world
            .npcs
            .iter()
            .filter(|n| n.behavior == Behavior::Lawful)
            .map(|n| (n.id, n.pos.distance(&pos)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        if let Some((id, dist)) = responder {
            if dist < RESPOND_RANGE {
                let mem = self.memory.entry(id);
                mem.respond_target = Some(RespondTarget {
                    pos,
                    expires: world.tick + RESPOND_DURATION_TICKS,
                });
                comm(
                    bus,
                    rng,
                    id,
                    &["PATROL: Responding to distress"],
                    &mut mem.last_pursuit_comm,
                    world.tick,
                    RESPOND_DURATION_TICKS,
                );
            }
        }
    }

    /// Drop memory for agents no longer in the world
    pub fn prune(&mut self, world: &WorldState) {
        let live: ahash::AHashSet<EntityId> = world.npcs.iter().map(|n| n.id).collect();
        self.memory.retain_live(|id| live.contains(&id));
    }
}

/// Apply a decision to its NPC: rotation (boosted while fleeing), lateral
/// damping, thrust or brake, and the cross-agent-visible flags. Firing is
/// resolved by the combat module from the same decision.
pub fn apply_decision(npc: &mut Npc, decision: &AiDecision) {
    use std::f32::consts::PI;

    let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
    if angle_diff.abs() > 0.01 {
        let turn_rate = if decision.fleeing {
            npc.turn_rate * FLEE_TURN_MULT
        } else {
            npc.turn_rate
        };
        npc.heading =
            normalize_angle(npc.heading + angle_diff.abs().min(turn_rate) * angle_diff.signum());
    }

    // Damp velocity that fights the desired direction; prevents endless
    // orbiting around targets
    if npc.vel.length() > 1e-4 {
        let misalign = normalize_angle(npc.vel.angle() - decision.desired_heading).abs();
        if misalign > PI * 0.5 {
            npc.vel *= 0.95;
        } else if misalign > PI * 0.35 {
            npc.vel *= 0.98;
        }
    }

    if decision.should_thrust {
        npc.vel += Vec2::from_angle(npc.heading) * (npc.thrust * decision.thrust_power);
    } else if decision.should_brake {
        npc.vel *= 0.95;
    }

    npc.fleeing = decision.fleeing;
    npc.pursuing = decision.pursuing;

    if decision.dock {
        npc.ready_to_dock = true;
    }

    if decision.half_cooldown {
        if let Some(weapon) = &npc.weapon {
            npc.weapon_cooldown = weapon.cooldown / 2;
        }
    }
}
