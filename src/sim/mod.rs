//! Simulation orchestration
//!
//! One fixed-timestep tick runs, in order: command drain, hostility
//! tracker, AI decisions (array order), combat resolution (fire, motion,
//! projectile collisions), lifecycle & loot, spawn policy. Everything is
//! synchronous; no operation suspends mid-tick. External mutation enters
//! only through the command queue, drained at tick start.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{self, AiEngine};
use crate::combat;
use crate::combat::physics::PlayerInput;
use crate::core::config::{config, SimConfig};
use crate::events::{Message, MessageBus, NoticeKind};
use crate::hostility;
use crate::lifecycle::{self, spawn::SpawnPolicy};
use crate::save::SaveData;
use crate::world::WorldState;

/// External inputs, queued and drained at tick start
#[derive(Debug, Clone)]
pub enum Command {
    SetThrust(bool),
    SetBrake(bool),
    /// -1.0 (left) .. 1.0 (right)
    SetTurn(f32),
    SetFiring(bool),
    SwitchWeapon,
    Land,
    Respawn,
    Pause,
    Resume,
    SetGodMode(bool),
    SetSpreadMult(f32),
    LoadSave(Box<SaveData>),
}

pub struct Simulation {
    pub world: WorldState,
    pub bus: MessageBus,
    pub ai: AiEngine,
    pub spawn: SpawnPolicy,
    pub rng: ChaCha8Rng,
    pub config: SimConfig,
    pub input: PlayerInput,
    pub paused: bool,
    commands: VecDeque<Command>,
}

impl Simulation {
    /// A fresh simulation on the global config, seeded for determinism
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, config().clone())
    }

    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = WorldState::with_starter_system(&mut rng);
        Self::from_world(world, rng, config)
    }

    /// Build on an explicit world; scenario tests use this
    pub fn from_world(world: WorldState, rng: ChaCha8Rng, config: SimConfig) -> Self {
        Self {
            world,
            bus: MessageBus::new(),
            ai: AiEngine::new(),
            spawn: SpawnPolicy::new(),
            rng,
            config,
            input: PlayerInput::default(),
            paused: false,
            commands: VecDeque::new(),
        }
    }

    pub fn push_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Advance the simulation one tick
    pub fn tick(&mut self) {
        self.drain_commands();
        if self.paused {
            return;
        }

        self.world.tick += 1;

        // 1. Hostility tracker
        let status = hostility::assess(&self.world, &self.config);
        hostility::advance_warning_state(&mut self.world, status, &mut self.bus, &self.config);

        // 2. AI decisions for every NPC, applied in array order
        let decisions = self.ai.decide_all(
            &self.world,
            status,
            &mut self.rng,
            &mut self.bus,
            &self.config,
        );
        for (npc, decision) in self.world.npcs.iter_mut().zip(&decisions) {
            ai::apply_decision(npc, decision);
        }

        // 3. Combat resolution: fire, motion, projectile collisions
        if self.input.firing {
            combat::fire::fire_player(&mut self.world, &mut self.bus, &mut self.rng, &self.config);
        }
        combat::fire::fire_npc_decisions(&mut self.world, &decisions, &mut self.bus, &mut self.rng);
        combat::physics::update_player(&mut self.world, &self.input, &mut self.bus, &self.config);
        combat::physics::update_npcs(&mut self.world);
        combat::physics::update_asteroids(&mut self.world, &mut self.rng);
        combat::projectiles::update_projectiles(&mut self.world, &mut self.bus);

        // 4. Lifecycle & loot
        lifecycle::update_npcs(
            &mut self.world,
            &mut self.bus,
            &mut self.rng,
            &mut self.spawn,
            &self.config,
        );
        lifecycle::update_asteroids(&mut self.world, &mut self.bus, &mut self.rng);
        lifecycle::update_pickups(&mut self.world, &mut self.bus);

        // 5. Spawn policy
        self.spawn
            .maybe_spawn(&mut self.world, &mut self.bus, &mut self.rng, &self.config);

        self.ai.prune(&self.world);

        // HUD snapshot for external collaborators
        let snapshot = self.world.ship.snapshot();
        self.bus.publish(Message::UiUpdate { ship: snapshot });
    }

    pub fn run_ticks(&mut self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::SetThrust(active) => self.input.thrust = active,
                Command::SetBrake(active) => self.input.brake = active,
                Command::SetTurn(direction) => self.input.turn = direction.clamp(-1.0, 1.0),
                Command::SetFiring(active) => self.input.firing = active,
                Command::SwitchWeapon => {
                    self.world.ship.switch_weapon();
                    if let Some(weapon) = self.world.ship.active_weapon() {
                        let name = weapon.kind.name();
                        self.bus.publish(Message::UiMessage {
                            message: format!("Weapon: {name}"),
                            kind: NoticeKind::Info,
                        });
                    }
                }
                Command::Land => self.try_land(),
                Command::Respawn => {
                    if self.world.ship.is_destroyed {
                        self.world.ship.respawn();
                        self.bus.publish(Message::ShipRespawn);
                    }
                }
                Command::Pause => self.paused = true,
                Command::Resume => self.paused = false,
                Command::SetGodMode(enabled) => self.world.debug.god_mode = enabled,
                Command::SetSpreadMult(mult) => {
                    self.world.debug.spread_mult = mult.clamp(0.2, 3.0);
                }
                Command::LoadSave(data) => {
                    data.apply(&mut self.world);
                    self.bus.publish(Message::UiMessage {
                        message: "Save loaded".into(),
                        kind: NoticeKind::Info,
                    });
                }
            }
        }
    }

    /// Land on a nearby landable planet: repair, refuel, clear the local
    /// traffic, and pause for the station screens.
    fn try_land(&mut self) {
        let ship = &self.world.ship;
        if ship.is_destroyed || ship.is_landed {
            return;
        }

        let target = self
            .world
            .planets
            .iter()
            .find(|p| p.landable && ship.pos.distance(&p.pos) < p.radius + 50.0)
            .map(|p| (p.id, p.pos, p.radius, p.name.clone()));

        if let Some((planet_id, planet_pos, radius, name)) = target {
            let ship = &mut self.world.ship;
            let approach = planet_pos.angle_to(&ship.pos);
            ship.pos = planet_pos + crate::core::types::Vec2::from_angle(approach) * (radius + 40.0);
            ship.vel = crate::core::types::Vec2::default();
            ship.is_landed = true;
            ship.landed_planet = Some(planet_id);
            ship.landing_cooldown = 60;
            ship.fuel = ship.max_fuel;
            ship.health = ship.max_health;
            ship.credits += 50;

            self.world.npcs.clear();
            self.world.projectiles.clear();

            self.bus.publish(Message::UiMessage {
                message: format!("Docked at {name}"),
                kind: NoticeKind::Info,
            });
            self.paused = true;
        }
    }

    /// Drain the messages published since the last call
    pub fn take_messages(&mut self) -> Vec<Message> {
        self.bus.take_log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::entity::npc::{Npc, NpcClass};

    fn quiet_config() -> SimConfig {
        // No ambient spawning so scenarios stay controlled
        let mut config = SimConfig::default();
        config.max_npcs = 0;
        config
    }

    fn bare_sim() -> Simulation {
        Simulation::from_world(
            WorldState::new(),
            ChaCha8Rng::seed_from_u64(42),
            quiet_config(),
        )
    }

    #[test]
    fn test_pause_freezes_the_world() {
        let mut sim = bare_sim();
        sim.push_command(Command::Pause);
        sim.tick();
        assert_eq!(sim.world.tick, 0);

        sim.push_command(Command::Resume);
        sim.tick();
        assert_eq!(sim.world.tick, 1);
    }

    #[test]
    fn test_commands_drain_at_tick_start() {
        let mut sim = bare_sim();
        sim.push_command(Command::SetThrust(true));
        sim.tick();
        assert!(sim.input.thrust);
        assert!(sim.world.ship.vel.length() > 0.0);
    }

    #[test]
    fn test_firing_input_spawns_projectiles() {
        let mut sim = bare_sim();
        sim.push_command(Command::SetFiring(true));
        sim.tick();
        assert_eq!(sim.world.projectiles.len(), 1);
    }

    #[test]
    fn test_respawn_after_death() {
        let mut sim = bare_sim();
        sim.world.ship.health = 0.0;
        sim.world.ship.is_destroyed = true;

        sim.push_command(Command::Respawn);
        sim.tick();

        assert!(!sim.world.ship.is_destroyed);
        assert!(sim
            .take_messages()
            .iter()
            .any(|m| m.kind() == "ship.respawn"));
    }

    #[test]
    fn test_respawn_ignored_while_alive() {
        let mut sim = bare_sim();
        sim.push_command(Command::Respawn);
        sim.tick();
        assert!(!sim.take_messages().iter().any(|m| m.kind() == "ship.respawn"));
    }

    #[test]
    fn test_landing_repairs_and_pauses() {
        let mut sim = bare_sim();
        sim.world.planets.push(crate::entity::planet::Planet::new(
            0,
            "Port",
            Vec2::new(100.0, 0.0),
            80.0,
            true,
        ));
        sim.world.ship.pos = Vec2::new(10.0, 0.0);
        sim.world.ship.health = 40.0;
        sim.world
            .npcs
            .push(Npc::from_class(NpcClass::Pirate, Vec2::new(300.0, 0.0)));

        sim.push_command(Command::Land);
        sim.tick();

        assert!(sim.world.ship.is_landed);
        assert_eq!(sim.world.ship.health, sim.world.ship.max_health);
        assert!(sim.world.npcs.is_empty());
        assert!(sim.paused);
    }

    #[test]
    fn test_ui_update_published_every_tick() {
        let mut sim = bare_sim();
        sim.run_ticks(3);
        let updates = sim
            .take_messages()
            .iter()
            .filter(|m| m.kind() == "ui.update")
            .count();
        assert_eq!(updates, 3);
    }

    #[test]
    fn test_dead_npc_is_gone_by_end_of_tick() {
        let mut sim = bare_sim();
        let mut pirate = Npc::from_class(NpcClass::Pirate, Vec2::new(200.0, 0.0));
        pirate.health = 0.0;
        sim.world.npcs.push(pirate);

        sim.tick();
        assert!(sim.world.npcs.is_empty());
    }

    #[test]
    fn test_same_seed_same_world_evolution() {
        let make = || {
            let mut sim = Simulation::with_config(7, SimConfig::default());
            sim.run_ticks(120);
            (
                sim.world.npcs.len(),
                sim.world.npcs.iter().map(|n| n.pos).collect::<Vec<_>>(),
                sim.world.asteroids.len(),
            )
        };
        assert_eq!(make(), make());
    }
}
