//! Driftspace - Entry Point
//!
//! Runs the simulation headless for a fixed number of ticks, or drops into
//! a small interactive loop for poking at the world by hand.

use clap::Parser;
use std::io::{self, Write};

use driftspace::core::config::{set_config, SimConfig};
use driftspace::core::error::Result;
use driftspace::entity::npc::NpcClass;
use driftspace::lifecycle::spawn::spawn_npc;
use driftspace::sim::Simulation;

#[derive(Parser, Debug)]
#[command(name = "driftspace", about = "Headless space combat simulation core")]
struct Args {
    /// RNG seed for a reproducible run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Run this many ticks and exit; 0 drops into the interactive loop
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Optional TOML config overriding the tuning defaults
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driftspace=info".into()),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let config = SimConfig::from_path(path)?;
        if set_config(config).is_err() {
            tracing::warn!("config was already initialized; --config ignored");
        }
    }

    tracing::info!(seed = args.seed, "driftspace starting");
    let mut sim = Simulation::new(args.seed);

    if args.ticks > 0 {
        sim.run_ticks(args.ticks);
        print_status(&sim);
        let messages = sim.take_messages();
        println!("{} messages published", messages.len());
        return Ok(());
    }

    println!("\n=== DRIFTSPACE ===");
    println!("Headless combat & agent simulation core");
    println!();
    println!("Commands:");
    println!("  tick / t          - Advance simulation by one tick");
    println!("  run <n>           - Run n simulation ticks");
    println!("  status / s        - Show world status");
    println!("  spawn <class>     - Spawn a pirate/patrol/trader/freighter");
    println!("  quit / q          - Exit");
    println!();

    loop {
        print_status(&sim);
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            sim.tick();
            report_messages(&mut sim);
            continue;
        }

        if input == "status" || input == "s" {
            print_detailed_status(&sim);
            continue;
        }

        if let Some(rest) = input.strip_prefix("run ") {
            match rest.parse::<u64>() {
                Ok(n) => {
                    println!("Running {n} ticks...");
                    sim.run_ticks(n);
                    report_messages(&mut sim);
                }
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }

        if let Some(name) = input.strip_prefix("spawn ") {
            let class = match name {
                "pirate" => Some(NpcClass::Pirate),
                "patrol" => Some(NpcClass::Patrol),
                "trader" => Some(NpcClass::Trader),
                "freighter" => Some(NpcClass::Freighter),
                _ => None,
            };
            match class {
                Some(class) => {
                    spawn_npc(&mut sim.world, class, &mut sim.bus, &mut sim.rng);
                    println!("Spawned {}", class.name());
                }
                None => println!("Usage: spawn <pirate|patrol|trader|freighter>"),
            }
            continue;
        }

        println!("Unknown command: {input}");
    }

    Ok(())
}

fn print_status(sim: &Simulation) {
    let world = &sim.world;
    println!(
        "[tick {}] npcs: {} | projectiles: {} | asteroids: {} | pickups: {} | credits: {} | hull: {:.0}/{:.0}",
        world.tick,
        world.npcs.len(),
        world.projectiles.len(),
        world.asteroids.len(),
        world.pickups.len(),
        world.ship.credits,
        world.ship.health,
        world.ship.max_health,
    );
}

fn print_detailed_status(sim: &Simulation) {
    let world = &sim.world;
    println!("Ship: pos ({:.0}, {:.0}) heading {:.2}", world.ship.pos.x, world.ship.pos.y, world.ship.heading);
    println!(
        "  kills: {} ({} pirates) | reputation: patrol {}, pirate {}",
        world.ship.kills, world.ship.pirate_kills, world.reputation.patrol, world.reputation.pirate
    );
    for npc in &world.npcs {
        let state = sim
            .ai
            .memory
            .get(npc.id)
            .map(|m| format!("{:?}", m.state))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<9} at ({:>6.0}, {:>6.0}) hull {:>3.0} {}",
            npc.class.name(),
            npc.pos.x,
            npc.pos.y,
            npc.health,
            state,
        );
    }
}

fn report_messages(sim: &mut Simulation) {
    for message in sim.take_messages() {
        match &message {
            driftspace::events::Message::UiUpdate { .. } => {}
            other => println!("  [{}] {:?}", other.kind(), other),
        }
    }
}
