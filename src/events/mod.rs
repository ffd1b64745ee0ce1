//! Message bus: synchronous publish/subscribe between simulation components
//! and external collaborators (renderer, audio, HUD).
//!
//! Delivery is immediate and in-process. A failing listener is logged and
//! skipped; sibling listeners and the running tick are never interrupted.
//! Every published message is also appended to an inspectable log so
//! collaborators that poll once per frame (and tests) can drain it.

use crate::core::error::Result;
use crate::core::types::EntityId;
use crate::entity::npc::NpcClass;
use crate::entity::pickup::PickupKind;
use crate::entity::ship::ShipSnapshot;
use crate::entity::weapon::WeaponKind;

/// Who dealt the killing blow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KilledBy {
    Player,
    Npc,
}

/// What a projectile hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    PlayerShip,
    Npc(EntityId),
    Asteroid(EntityId),
}

/// Visual size classification for explosion cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

/// Departure/arrival effect classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarpKind {
    Arrive,
    Depart,
    Land,
    Takeoff,
}

/// Severity tag for human-readable notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Messages exchanged over the bus.
///
/// `kind()` returns the wire name each variant travels under, which is the
/// contract external collaborators subscribe against.
#[derive(Debug, Clone)]
pub enum Message {
    NpcSpawned {
        npc: EntityId,
        class: NpcClass,
    },
    NpcDeath {
        npc: EntityId,
        class: NpcClass,
        killed_by: KilledBy,
        x: f32,
        y: f32,
    },
    ShipDeath,
    ShipRespawn,
    WeaponFired {
        weapon: WeaponKind,
        shooter: Option<EntityId>,
        is_player: bool,
    },
    ProjectileHit {
        target: HitTarget,
        damage: f32,
        x: f32,
        y: f32,
        is_player_projectile: bool,
    },
    ProjectileExpired {
        weapon: WeaponKind,
    },
    Explosion {
        x: f32,
        y: f32,
        size: ExplosionSize,
        /// Minor impact flash rather than a full kill explosion
        impact: bool,
    },
    ShipDamage {
        damage: f32,
    },
    ShieldHit {
        damage: f32,
    },
    PatrolWarning {
        message: String,
    },
    PatrolStandDown {
        message: String,
    },
    PatrolAssist {
        message: String,
    },
    Distress {
        npc: EntityId,
        x: f32,
        y: f32,
    },
    NpcComm {
        npc: EntityId,
        message: String,
    },
    PickupCollected {
        kind: PickupKind,
        value: u32,
    },
    PickupExpired,
    WarpEffect {
        x: f32,
        y: f32,
        kind: WarpKind,
    },
    UiMessage {
        message: String,
        kind: NoticeKind,
    },
    UiUpdate {
        ship: ShipSnapshot,
    },
    DebugDamage {
        x: f32,
        y: f32,
        amount: f32,
    },
}

impl Message {
    /// Wire name of this message, as consumed by external collaborators
    pub fn kind(&self) -> &'static str {
        match self {
            Message::NpcSpawned { .. } => "npc.spawn",
            Message::NpcDeath { .. } => "npc.death",
            Message::ShipDeath => "ship.death",
            Message::ShipRespawn => "ship.respawn",
            Message::WeaponFired { .. } => "weapon.fired",
            Message::ProjectileHit { .. } => "physics.projectile.hit",
            Message::ProjectileExpired { .. } => "physics.projectile.expired",
            Message::Explosion { .. } => "combat.explosion",
            Message::ShipDamage { .. } => "ship.damage",
            Message::ShieldHit { .. } => "combat.shield.hit",
            Message::PatrolWarning { .. } => "patrol.warning",
            Message::PatrolStandDown { .. } => "patrol.standDown",
            Message::PatrolAssist { .. } => "patrol.assist",
            Message::Distress { .. } => "npc.distress",
            Message::NpcComm { .. } => "npc.comm",
            Message::PickupCollected { .. } => "physics.pickup.collected",
            Message::PickupExpired => "physics.pickup.expired",
            Message::WarpEffect { .. } => "warp.effect.created",
            Message::UiMessage { .. } => "ui.message",
            Message::UiUpdate { .. } => "ui.update",
            Message::DebugDamage { .. } => "debug.damage",
        }
    }
}

type Listener = Box<dyn FnMut(&Message) -> Result<()>>;

/// Synchronous dispatcher. Constructed explicitly per simulation and passed
/// by reference; there is no global instance.
#[derive(Default)]
pub struct MessageBus {
    listeners: Vec<(Option<&'static str>, Listener)>,
    log: Vec<Message>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every message
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Message) -> Result<()> + 'static,
    {
        self.listeners.push((None, Box::new(listener)));
    }

    /// Subscribe to messages with a specific wire name
    pub fn subscribe_to<F>(&mut self, kind: &'static str, listener: F)
    where
        F: FnMut(&Message) -> Result<()> + 'static,
    {
        self.listeners.push((Some(kind), Box::new(listener)));
    }

    /// Publish a message: dispatch to listeners immediately, then log it.
    ///
    /// A listener error never interrupts sibling listeners or the tick.
    pub fn publish(&mut self, message: Message) {
        for (filter, listener) in &mut self.listeners {
            if filter.map_or(true, |kind| kind == message.kind()) {
                if let Err(e) = listener(&message) {
                    tracing::warn!("listener failed for {}: {}", message.kind(), e);
                }
            }
        }
        self.log.push(message);
    }

    /// Messages published since the last drain
    pub fn log(&self) -> &[Message] {
        &self.log
    }

    /// Drain the message log (collaborators call this once per frame)
    pub fn take_log(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.log)
    }
}
