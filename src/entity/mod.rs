//! Entity data aggregates
//!
//! Entities are plain serde-friendly structs; behavior lives in the ai,
//! combat, and lifecycle modules.

pub mod asteroid;
pub mod npc;
pub mod pickup;
pub mod planet;
pub mod projectile;
pub mod ship;
pub mod weapon;
