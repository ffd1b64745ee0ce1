//! Floating pickups: ore from mining, credits and cargo from kills

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Ore,
    Credits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PickupKind,
    pub value: u32,
    pub age: u64,
    pub max_age: u64,
}

impl Pickup {
    /// Default drift lifetime before a pickup fades out
    pub const LIFETIME: u64 = 600;

    pub fn new(pos: Vec2, vel: Vec2, kind: PickupKind, value: u32) -> Self {
        Self {
            pos,
            vel,
            kind,
            value,
            age: 0,
            max_age: Self::LIFETIME,
        }
    }

    pub fn expired(&self) -> bool {
        self.age >= self.max_age
    }
}
