//! Simulation configuration constants and tunable parameters.

/// Errors raised when a [`SimConfig`] contains values the core cannot honour.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidDuration { field: &'static str, value: f32 },

    #[error("{field} must be a finite, positive number (got {value})")]
    InvalidRate { field: &'static str, value: f32 },

    #[error("max_enemies must be at least 1")]
    NoEnemyCapacity,
}

/// Tunable parameters shared by every component of the simulation.
///
/// Durations are expressed in simulated seconds and consumed through the
/// `dt` passed to [`crate::Simulation::tick`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Base seed for every random draw. Queues are replayable from
    /// `(seed, cycle, actor)`.
    pub seed: u64,

    /// Delay between a sub-phase reporting completion and the coordinator
    /// advancing to the next stage.
    pub settle_delay: f32,

    /// Delay after the initial enemy pass before idle enemies are re-scanned.
    pub rescan_delay: f32,

    /// Pause between two consecutive enemy skills.
    pub skill_pacing: f32,

    /// Default charge accumulation rate for player actions (units per second).
    pub charge_rate: f32,

    /// Default per-slot charge cap for player actions.
    pub charge_max: f32,

    /// Upper bound on simultaneously registered enemies. Spawns past this
    /// limit are dropped.
    pub max_enemies: usize,

    /// Starting hit points of the player's base.
    pub base_hp: i32,
}

impl SimConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of charge slots an energy store can hold.
    pub const MAX_SLOTS: usize = 4;
    /// Maximum energy budget (skill charges) of a single enemy.
    pub const MAX_SKILL_BUDGET: u32 = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SETTLE_DELAY: f32 = 0.5;
    pub const DEFAULT_RESCAN_DELAY: f32 = 0.25;
    pub const DEFAULT_SKILL_PACING: f32 = 0.4;
    pub const DEFAULT_CHARGE_RATE: f32 = 1.0;
    pub const DEFAULT_CHARGE_MAX: f32 = 3.0;
    pub const DEFAULT_MAX_ENEMIES: usize = 64;
    pub const DEFAULT_BASE_HP: i32 = 100;

    pub fn new() -> Self {
        Self {
            seed: 0,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            rescan_delay: Self::DEFAULT_RESCAN_DELAY,
            skill_pacing: Self::DEFAULT_SKILL_PACING,
            charge_rate: Self::DEFAULT_CHARGE_RATE,
            charge_max: Self::DEFAULT_CHARGE_MAX,
            max_enemies: Self::DEFAULT_MAX_ENEMIES,
            base_hp: Self::DEFAULT_BASE_HP,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    /// Configuration with every delay set to zero. Useful for tests that
    /// want the coordinator to advance as fast as completion allows.
    pub fn instant() -> Self {
        Self {
            settle_delay: 0.0,
            rescan_delay: 0.0,
            skill_pacing: 0.0,
            ..Self::new()
        }
    }

    /// Checks that every duration and rate is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("settle_delay", self.settle_delay),
            ("rescan_delay", self.rescan_delay),
            ("skill_pacing", self.skill_pacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }

        for (field, value) in [
            ("charge_rate", self.charge_rate),
            ("charge_max", self.charge_max),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidRate { field, value });
            }
        }

        if self.max_enemies == 0 {
            return Err(ConfigError::NoEnemyCapacity);
        }

        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
        assert_eq!(SimConfig::instant().validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_delay() {
        let config = SimConfig {
            settle_delay: -1.0,
            ..SimConfig::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration {
                field: "settle_delay",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_finite_rate() {
        let config = SimConfig {
            charge_rate: f32::NAN,
            ..SimConfig::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate {
                field: "charge_rate",
                ..
            })
        ));
    }
}
