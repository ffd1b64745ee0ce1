//! Planets: static world features used for trader destinations, departure
//! classification, and player landing. Rendering and station UI are external.

use serde::{Deserialize, Serialize};

use crate::core::types::{PlanetId, Vec2};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub pos: Vec2,
    pub radius: f32,
    pub landable: bool,
}

impl Planet {
    pub fn new(id: u32, name: &str, pos: Vec2, radius: f32, landable: bool) -> Self {
        Self {
            id: PlanetId(id),
            name: name.to_string(),
            pos,
            radius,
            landable,
        }
    }
}
