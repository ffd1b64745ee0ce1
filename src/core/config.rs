//! Simulation configuration with documented constants
//!
//! All tunable heuristics are collected here with explanations of their
//! purpose. Structural constants (angle fractions, clamp factors) live next
//! to the code that uses them.

use serde::{Deserialize, Serialize};

use crate::core::error::{DriftError, Result};

/// Configuration for the simulation systems
///
/// These values have been tuned to produce good gameplay feel. None of them
/// are physical laws; behaviors are heuristic and intentionally exploitable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === HOSTILITY TRACKER ===
    /// Max age (ticks) of a player projectile still counted as "recent fire"
    pub hostile_projectile_age: u64,

    /// Radius (world units) around a projectile scanned for lawful/passive
    /// targets when deciding whether the player is shooting at innocents
    pub hostile_scan_radius: f32,

    /// Half-angle (radians) of the cone a projectile must point within
    /// at a lawful/passive NPC to count as hostile fire
    pub hostile_fire_cone: f32,

    /// Kill count above which the career-criminal rule starts applying
    pub career_kill_threshold: u32,

    /// Distance (world units) inside which a lawful NPC can deliver the
    /// first patrol warning
    pub warning_range: f32,

    /// Ticks after the warning before patrols are cleared to engage (2 s)
    pub warning_duration_ticks: u64,

    /// Ticks of peace after the warning before patrols stand down (5 s)
    pub forgiveness_ticks: u64,

    /// Ticks the stand-down grace lasts before returning to peaceful (2 s)
    pub stand_down_ticks: u64,

    // === PIRATE AI ===
    /// Distance at which a pursuing patrol triggers pirate evasion
    pub pirate_evade_range: f32,

    /// Distance inside which a pirate picks a target to hunt
    pub pirate_engage_range: f32,

    /// Distance inside which an aligned pirate opens fire
    pub pirate_fire_range: f32,

    /// Per-tick probability of re-rolling the wander heading
    pub wander_reroll_chance: f32,

    // === PATROL AI ===
    /// Distance at which a patrol notices a pirate
    pub patrol_detect_range: f32,

    /// Extended detection range when the player is a known pirate hunter
    pub patrol_detect_range_friendly: f32,

    /// Distance inside which a patrol fires on a hostile player
    pub patrol_player_fire_range: f32,

    /// Distance inside which a patrol fires on a pursued pirate
    pub patrol_pirate_fire_range: f32,

    /// Reference speed the accuracy movement penalty is normalized against.
    ///
    /// Not derived from any ship stat; a tunable heuristic. Faster targets
    /// are harder to hit, bottoming out at `movement_penalty_floor`.
    pub accuracy_reference_speed: f32,

    /// Lower bound of the movement penalty multiplier
    pub movement_penalty_floor: f32,

    /// Pursuit duration (ticks) beyond which a patrol may give up
    pub pursuit_give_up_ticks: u32,

    /// Distance beyond which a patrol may randomly break off pursuit
    pub pursuit_break_range: f32,

    // === TRADER AI ===
    /// Distance inside which an armed, firing player spooks a trader
    pub trader_player_threat_range: f32,

    /// Distance inside which any pirate spooks a trader
    pub trader_pirate_threat_range: f32,

    /// Distance from the destination at which braking can kick in
    pub trader_brake_range: f32,

    /// Fraction of max speed above which an approaching trader brakes
    pub trader_brake_speed_fraction: f32,

    // === COMBAT ===
    /// Bloom added to the player's spread per shot (radians)
    pub bloom_per_shot: f32,

    /// Bloom ceiling (radians)
    pub bloom_max: f32,

    /// Multiplicative bloom decay applied every tick
    pub bloom_decay: f32,

    // === LIFECYCLE ===
    /// Distance from the player beyond which an NPC despawns
    pub despawn_range: f32,

    /// Extra distance past a planet's radius that still counts as "landing"
    /// when classifying a despawn as land vs. depart
    pub planet_landing_margin: f32,

    /// Probability a destroyed pirate drops loot
    pub pirate_loot_chance: f32,

    /// Flat credit bonus on top of the bounty for a player kill
    pub kill_bonus_credits: u32,

    // === SPAWN POLICY ===
    /// Hard cap on live NPCs
    pub max_npcs: usize,

    /// Cap on NPCs within `nearby_range` of the player
    pub max_nearby_npcs: usize,

    /// Radius that defines "nearby" for spawn density purposes
    pub nearby_range: f32,

    /// Ticks a class is suppressed after one of its members dies
    pub spawn_class_cooldown_ticks: u64,

    /// Shorter suppression window for pirates (keeps pressure on)
    pub pirate_suppress_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        use std::f32::consts::FRAC_PI_6;
        Self {
            // Hostility
            hostile_projectile_age: 30,
            hostile_scan_radius: 400.0,
            hostile_fire_cone: FRAC_PI_6,
            career_kill_threshold: 5,
            warning_range: 1000.0,
            warning_duration_ticks: 120,
            forgiveness_ticks: 300,
            stand_down_ticks: 120,

            // Pirate
            pirate_evade_range: 600.0,
            pirate_engage_range: 800.0,
            pirate_fire_range: 250.0,
            wander_reroll_chance: 0.01,

            // Patrol
            patrol_detect_range: 1200.0,
            patrol_detect_range_friendly: 1500.0,
            patrol_player_fire_range: 450.0,
            patrol_pirate_fire_range: 600.0,
            accuracy_reference_speed: 0.8,
            movement_penalty_floor: 0.5,
            pursuit_give_up_ticks: 300,
            pursuit_break_range: 800.0,

            // Trader
            trader_player_threat_range: 300.0,
            trader_pirate_threat_range: 200.0,
            trader_brake_range: 200.0,
            trader_brake_speed_fraction: 0.3,

            // Combat
            bloom_per_shot: 0.02,
            bloom_max: 0.12,
            bloom_decay: 0.97,

            // Lifecycle
            despawn_range: 3000.0,
            planet_landing_margin: 100.0,
            pirate_loot_chance: 0.6,
            kill_bonus_credits: 25,

            // Spawn
            max_npcs: 12,
            max_nearby_npcs: 5,
            nearby_range: 1000.0,
            spawn_class_cooldown_ticks: 360,
            pirate_suppress_ticks: 270,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML string (missing fields fall back to defaults)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig =
            toml::from_str(content).map_err(|e| DriftError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.forgiveness_ticks <= self.warning_duration_ticks {
            return Err(DriftError::Config(format!(
                "forgiveness_ticks ({}) must exceed warning_duration_ticks ({})",
                self.forgiveness_ticks, self.warning_duration_ticks
            )));
        }

        if self.pirate_fire_range > self.pirate_engage_range {
            return Err(DriftError::Config(format!(
                "pirate_fire_range ({}) must be <= pirate_engage_range ({})",
                self.pirate_fire_range, self.pirate_engage_range
            )));
        }

        if !(0.0..=1.0).contains(&self.pirate_loot_chance)
            || !(0.0..=1.0).contains(&self.wander_reroll_chance)
        {
            return Err(DriftError::Config("probabilities must be in [0, 1]".into()));
        }

        if self.movement_penalty_floor <= 0.0 || self.accuracy_reference_speed <= 0.0 {
            return Err(DriftError::Config(
                "accuracy parameters must be positive".into(),
            ));
        }

        if self.bloom_decay <= 0.0 || self.bloom_decay >= 1.0 {
            return Err(DriftError::Config(
                "bloom_decay must be in (0, 1) for recovery to converge".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimConfig {
    CONFIG.get_or_init(SimConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimConfig) -> std::result::Result<(), SimConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_forgiveness_must_exceed_warning() {
        let mut config = SimConfig::default();
        config.forgiveness_ticks = config.warning_duration_ticks;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_overrides_merge_with_defaults() {
        let config = SimConfig::from_toml_str("despawn_range = 5000.0\nmax_npcs = 4\n").unwrap();
        assert_eq!(config.despawn_range, 5000.0);
        assert_eq!(config.max_npcs, 4);
        // Untouched fields keep their defaults
        assert_eq!(config.pirate_engage_range, 800.0);
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        assert!(SimConfig::from_toml_str("despawn_range = \"far\"").is_err());
    }
}
