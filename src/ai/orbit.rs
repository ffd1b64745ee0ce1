//! Fallback behavior: circle a fixed patrol center
//!
//! Used for agents with no specialized evaluator. The center is captured on
//! first evaluation; the orbit angle advances a little every tick.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::FRAC_PI_3;

use crate::ai::memory::{AiMemory, MacroState};
use crate::ai::AiDecision;
use crate::core::types::{normalize_angle, Vec2};
use crate::entity::npc::Npc;

/// Radians the orbit target advances per tick
const ORBIT_STEP: f32 = 0.005;

pub fn evaluate(npc: &Npc, mem: &mut AiMemory, rng: &mut ChaCha8Rng) -> AiDecision {
    let mut decision = AiDecision::idle(npc.heading);

    let center = match mem.orbit_center {
        Some(center) => center,
        None => {
            mem.orbit_center = Some(npc.pos);
            mem.orbit_radius = 300.0 + rng.gen::<f32>() * 200.0;
            mem.orbit_angle = 0.0;
            npc.pos
        }
    };

    mem.state = MacroState::Patrolling;
    mem.orbit_angle += ORBIT_STEP;

    let target = center + Vec2::from_angle(mem.orbit_angle) * mem.orbit_radius;
    decision.desired_heading = npc.pos.angle_to(&target);

    let angle_diff = normalize_angle(decision.desired_heading - npc.heading);
    if angle_diff.abs() < FRAC_PI_3 {
        decision.should_thrust = true;
    }

    decision
}
