//! Combat resolver: weapon fire, projectile advancement, collisions, and
//! damage with shield-then-hull precedence.

pub mod fire;
pub mod physics;
pub mod projectiles;

/// How a hit's damage was absorbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSplit {
    pub shield: f32,
    pub hull: f32,
}

/// Subtract damage from shield first; overflow carries to hull. Both pools
/// are clamped at zero and never exceed their maximums.
pub fn apply_damage(shield: &mut f32, health: &mut f32, damage: f32) -> DamageSplit {
    let damage = damage.max(0.0);
    let to_shield = damage.min(*shield);
    *shield -= to_shield;

    let overflow = damage - to_shield;
    let to_hull = overflow.min(*health);
    *health -= to_hull;

    DamageSplit {
        shield: to_shield,
        hull: to_hull,
    }
}
