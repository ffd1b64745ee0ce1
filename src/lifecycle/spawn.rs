//! Spawn policy
//!
//! Weighted class selection with per-class suppression after a recent death
//! of that class. When every class is suppressed, the roll silently falls
//! back to the unweighted base odds; this anti-clustering valve is kept as
//! found in the field.

use ahash::AHashMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

use crate::core::config::SimConfig;
use crate::core::types::{Tick, Vec2};
use crate::entity::npc::{Npc, NpcClass};
use crate::events::{Message, MessageBus, WarpKind};
use crate::world::WorldState;

const BASE_WEIGHTS: [(NpcClass, f32); 4] = [
    (NpcClass::Freighter, 0.25),
    (NpcClass::Trader, 0.3),
    (NpcClass::Patrol, 0.2),
    (NpcClass::Pirate, 0.25),
];

pub struct SpawnPolicy {
    next_spawn: Tick,
    suppressed_until: AHashMap<NpcClass, Tick>,
}

impl SpawnPolicy {
    pub fn new() -> Self {
        Self {
            next_spawn: 180,
            suppressed_until: AHashMap::new(),
        }
    }

    /// Record a death so the class sits out its suppression window
    pub fn note_death(&mut self, class: NpcClass, tick: Tick, config: &SimConfig) {
        let window = if class == NpcClass::Pirate {
            config.pirate_suppress_ticks
        } else {
            config.spawn_class_cooldown_ticks
        };
        self.suppressed_until.insert(class, tick + window);
    }

    fn is_suppressed(&self, class: NpcClass, tick: Tick) -> bool {
        self.suppressed_until
            .get(&class)
            .map_or(false, |&until| tick < until)
    }

    /// Pick a class by weight among non-suppressed candidates; if all are
    /// suppressed, revert to the base odds
    pub fn choose_class(&self, tick: Tick, rng: &mut ChaCha8Rng) -> NpcClass {
        let candidates: Vec<(NpcClass, f32)> = BASE_WEIGHTS
            .iter()
            .filter(|(class, _)| !self.is_suppressed(*class, tick))
            .copied()
            .collect();
        let pool: &[(NpcClass, f32)] = if candidates.is_empty() {
            &BASE_WEIGHTS
        } else {
            &candidates
        };

        let total: f32 = pool.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen::<f32>() * total;
        for (class, weight) in pool {
            roll -= weight;
            if roll <= 0.0 {
                return *class;
            }
        }
        pool[pool.len() - 1].0
    }

    /// Spawn one NPC if the timer is due and local density allows it
    pub fn maybe_spawn(
        &mut self,
        world: &mut WorldState,
        bus: &mut MessageBus,
        rng: &mut ChaCha8Rng,
        config: &SimConfig,
    ) {
        if world.tick < self.next_spawn {
            return;
        }

        let nearby = world
            .npcs
            .iter()
            .filter(|n| n.pos.distance(&world.ship.pos) < config.nearby_range)
            .count();
        if world.npcs.len() >= config.max_npcs || nearby >= config.max_nearby_npcs {
            return;
        }

        let class = self.choose_class(world.tick, rng);
        spawn_npc(world, class, bus, rng);

        // Denser neighborhoods slow the faucet down
        let delay = 180 + nearby as u64 * 120;
        self.next_spawn = world.tick + (rng.gen::<f32>() * delay as f32) as u64 + delay / 2;
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Create an NPC of the given class at a class-appropriate location
pub fn spawn_npc(
    world: &mut WorldState,
    class: NpcClass,
    bus: &mut MessageBus,
    rng: &mut ChaCha8Rng,
) {
    let ship_pos = world.ship.pos;
    let angle = rng.gen::<f32>() * TAU;
    let dir = Vec2::from_angle(angle);

    let (pos, vel, effect) = match class {
        NpcClass::Trader if !world.planets.is_empty() => {
            // Haulers lift off from a planet
            let planet = &world.planets[rng.gen_range(0..world.planets.len())];
            let dist = planet.radius + 100.0 + rng.gen::<f32>() * 100.0;
            (
                planet.pos + dir * dist,
                dir * (0.45 * 0.5),
                WarpKind::Takeoff,
            )
        }
        NpcClass::Pirate => {
            // Pirates warp in on the fringe, drifting inward
            let dist = 1200.0 + rng.gen::<f32>() * 300.0;
            (ship_pos + dir * dist, dir * (-0.7 * 0.3), WarpKind::Arrive)
        }
        NpcClass::Patrol => {
            let dist = 400.0 + rng.gen::<f32>() * 400.0;
            (ship_pos + dir * dist, dir * (-1.2 * 0.5), WarpKind::Arrive)
        }
        _ => {
            let dist = 600.0 + rng.gen::<f32>() * 600.0;
            let vel_dir = Vec2::from_angle(rng.gen::<f32>() * TAU);
            (ship_pos + dir * dist, vel_dir * (0.25 * 0.3), WarpKind::Arrive)
        }
    };

    let mut npc = Npc::from_class(class, pos);
    npc.vel = vel;
    npc.heading = if vel.length() > 1e-4 { vel.angle() } else { angle };

    if matches!(class, NpcClass::Trader | NpcClass::Freighter) && !world.planets.is_empty() {
        let planet = &world.planets[rng.gen_range(0..world.planets.len())];
        npc.target_planet = Some(planet.id);
    }

    bus.publish(Message::WarpEffect {
        x: pos.x,
        y: pos.y,
        kind: effect,
    });
    bus.publish(Message::NpcSpawned {
        npc: npc.id,
        class,
    });
    tracing::debug!(class = class.name(), "spawned npc");

    world.npcs.push(npc);
}
