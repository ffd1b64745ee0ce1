//! Hostility tracker integration tests
//!
//! The full warning timeline, driven through real ticks with real player
//! fire: provocation, warning, expiry (patrols weapons-free), forgiveness,
//! and stand-down.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use driftspace::core::config::SimConfig;
use driftspace::core::types::Vec2;
use driftspace::entity::npc::{Npc, NpcClass};
use driftspace::events::Message;
use driftspace::sim::{Command, Simulation};
use driftspace::world::WorldState;

fn quiet_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.max_npcs = 0;
    config
}

/// Player fires toward a trader with a patrol in warning range, then goes
/// quiet. The record must pass through warned -> expired -> standing down
/// -> peaceful, with the matching messages, and patrols must hold fire
/// until the warning expires.
#[test]
fn test_full_warning_timeline() {
    let mut sim = Simulation::from_world(
        WorldState::new(),
        ChaCha8Rng::seed_from_u64(42),
        quiet_config(),
    );

    // Trader dead ahead of the player's gun line; patrol off to the side,
    // unarmed so the fire log stays player-only
    sim.world
        .npcs
        .push(Npc::from_class(NpcClass::Trader, Vec2::new(300.0, 0.0)));
    let mut patrol = Npc::from_class(NpcClass::Patrol, Vec2::new(0.0, 600.0));
    patrol.weapon = None;
    sim.world.npcs.push(patrol);

    // Open fire on the trader's bearing. The tracker runs at tick start,
    // so the first projectile registers on the following tick.
    sim.push_command(Command::SetFiring(true));
    for _ in 0..10 {
        sim.tick();
        if sim.world.ship.hostility.warning_shown {
            break;
        }
    }

    let record = &sim.world.ship.hostility;
    assert!(record.warning_shown, "warning never fired");
    assert!(!record.warning_expired);
    let warning_tick = record.warning_tick;
    assert!(sim
        .take_messages()
        .iter()
        .any(|m| m.kind() == "patrol.warning"));

    // Keep shooting through the warning window
    let warning_duration = sim.config.warning_duration_ticks;
    while sim.world.tick <= warning_tick + warning_duration {
        sim.tick();
    }
    assert!(sim.world.ship.hostility.warning_expired);

    // Nothing but the player ever fired during the window
    let npc_shots = sim
        .take_messages()
        .iter()
        .filter(|m| {
            matches!(
                m,
                Message::WeaponFired {
                    is_player: false,
                    ..
                }
            )
        })
        .count();
    assert_eq!(npc_shots, 0);

    // Cease fire and wait out the forgiveness window
    sim.push_command(Command::SetFiring(false));
    let forgiveness = sim.config.forgiveness_ticks;
    while sim.world.tick <= warning_tick + forgiveness + 1 {
        sim.tick();
    }

    let record = &sim.world.ship.hostility;
    assert!(record.standing_down);
    assert!(!record.warning_shown);
    assert!(!record.warning_expired);
    assert!(sim
        .take_messages()
        .iter()
        .any(|m| m.kind() == "patrol.standDown"));

    // The grace period clears itself
    let stand_down = sim.config.stand_down_ticks;
    for _ in 0..=stand_down {
        sim.tick();
    }
    assert!(!sim.world.ship.hostility.standing_down);
    assert!(!sim.world.ship.hostility.warning_shown);
}

/// A career criminal record keeps the player hostile with no recent fire;
/// the warning machinery still runs off it.
#[test]
fn test_career_criminal_triggers_warning_without_firing() {
    let mut sim = Simulation::from_world(
        WorldState::new(),
        ChaCha8Rng::seed_from_u64(42),
        quiet_config(),
    );
    sim.world.ship.kills = 8;
    sim.world.ship.pirate_kills = 1;

    let mut patrol = Npc::from_class(NpcClass::Patrol, Vec2::new(0.0, 400.0));
    patrol.weapon = None;
    sim.world.npcs.push(patrol);

    sim.tick();
    assert!(sim.world.ship.hostility.warning_shown);
}

/// No lawful witness in range: shooting at a trader riles nobody, because
/// the warning needs a patrol close enough to deliver it.
#[test]
fn test_no_warning_without_patrol_in_range() {
    let mut sim = Simulation::from_world(
        WorldState::new(),
        ChaCha8Rng::seed_from_u64(42),
        quiet_config(),
    );
    sim.world
        .npcs
        .push(Npc::from_class(NpcClass::Trader, Vec2::new(300.0, 0.0)));
    let mut patrol = Npc::from_class(NpcClass::Patrol, Vec2::new(0.0, 2500.0));
    patrol.weapon = None;
    sim.world.npcs.push(patrol);

    sim.push_command(Command::SetFiring(true));
    for _ in 0..30 {
        sim.tick();
    }

    assert!(!sim.world.ship.hostility.warning_shown);
}
