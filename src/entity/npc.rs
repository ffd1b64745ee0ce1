//! Non-player agents
//!
//! An NPC is a plain data aggregate: stat block plus motion state plus the
//! few flags other agents are allowed to read (pursuing, fleeing, cooldown).
//! Behavior-private bookkeeping lives in the AI memory side table, not here.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, PlanetId, Vec2};
use crate::entity::weapon::{WeaponKind, WeaponSpec};

/// Behavior tag driving which evaluator runs for this agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    Aggressive,
    Lawful,
    Passive,
    Default,
}

/// Ship classes the spawn policy can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcClass {
    Pirate,
    Patrol,
    Trader,
    Freighter,
}

impl NpcClass {
    pub fn behavior(&self) -> Behavior {
        match self {
            NpcClass::Pirate => Behavior::Aggressive,
            NpcClass::Patrol => Behavior::Lawful,
            NpcClass::Trader | NpcClass::Freighter => Behavior::Passive,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NpcClass::Pirate => "pirate",
            NpcClass::Patrol => "patrol",
            NpcClass::Trader => "trader",
            NpcClass::Freighter => "freighter",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    pub class: NpcClass,
    pub behavior: Behavior,

    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,

    pub size: f32,
    pub max_speed: f32,
    pub thrust: f32,
    pub turn_rate: f32,

    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,

    /// Bounty base awarded (in full or half) when the player kills this NPC
    pub credits: u32,

    pub weapon: Option<WeaponSpec>,
    pub weapon_cooldown: u32,

    /// Ticks alive
    pub lifetime: u64,

    /// Destination for passive haulers
    pub target_planet: Option<PlanetId>,
    /// Set on arrival; the lifecycle manager removes the agent as a landing
    pub ready_to_dock: bool,

    /// Cross-agent-visible AI flags: pirates evade pursuing patrols, and
    /// fleeing agents get a turn-rate boost
    pub pursuing: bool,
    pub fleeing: bool,

    /// Kill attribution, set exactly once at the moment health reaches zero
    pub killed_by: Option<Attribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribution {
    Player,
    Npc,
}

impl Npc {
    /// Construct an NPC of the given class from its stat template
    pub fn from_class(class: NpcClass, pos: Vec2) -> Self {
        let (max_speed, thrust, turn_rate, size, credits, health, weapon) = match class {
            NpcClass::Freighter => (
                0.25,
                0.002,
                0.006,
                22.0,
                800,
                150.0,
                Some(WeaponSpec::new(WeaponKind::Laser, 3.0, 40)),
            ),
            NpcClass::Trader => (0.45, 0.004, 0.012, 12.0, 200, 50.0, None),
            NpcClass::Pirate => (
                0.7,
                0.007,
                0.02,
                11.0,
                150,
                80.0,
                Some(WeaponSpec::new(WeaponKind::Laser, 10.0, 18)),
            ),
            NpcClass::Patrol => (
                1.2,
                0.015,
                0.08,
                16.0,
                100,
                150.0,
                Some(WeaponSpec::new(WeaponKind::Rapid, 6.0, 20)),
            ),
        };

        Self {
            id: EntityId::new(),
            class,
            behavior: class.behavior(),
            pos,
            vel: Vec2::default(),
            heading: 0.0,
            size,
            max_speed,
            thrust,
            turn_rate,
            health,
            max_health: health,
            shield: 0.0,
            max_shield: 0.0,
            credits,
            weapon,
            weapon_cooldown: 0,
            lifetime: 0,
            target_planet: None,
            ready_to_dock: false,
            pursuing: false,
            fleeing: false,
            killed_by: None,
        }
    }
}
