//! Driftspace - combat and agent-behavior simulation core
//!
//! The headless heart of a space trading/combat game: per-tick NPC decision
//! making, player hostility tracking, projectile combat, and entity
//! lifecycle. Rendering, audio, UI, raw input, and persistence are external
//! collaborators that talk to this core over the message bus and command
//! queue.

pub mod ai;
pub mod combat;
pub mod core;
pub mod entity;
pub mod events;
pub mod hostility;
pub mod lifecycle;
pub mod save;
pub mod sim;
pub mod world;
