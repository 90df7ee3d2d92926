//! Common error infrastructure for battle-core.
//!
//! Concern-specific errors (`ConfigError`, `CycleError`, `RegistryError`,
//! `SkillTableError`) live next to the code that raises them. This module
//! provides the shared severity classification they all report through
//! [`SimError`].
//!
//! None of these errors is raised from inside a running battle. Stale
//! handles, early removal and budget exhaustion are handled where they occur;
//! only requests made from outside the tick loop can fail.

use crate::config::ConfigError;
use crate::engine::CycleError;
use crate::registry::RegistryError;
use crate::skills::SkillTableError;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (e.g. after the battle ends)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry once the simulation is back in a phase that accepts the request.
    ///
    /// Examples: trigger during battle, reset during battle
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown actor, duplicate skill entry, negative delay
    Validation,

    /// Unexpected state inconsistency.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all battle-core errors.
pub trait SimError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for logs and tests.
    fn error_code(&self) -> &'static str;
}

impl SimError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidDuration { .. } => "CONFIG_INVALID_DURATION",
            ConfigError::InvalidRate { .. } => "CONFIG_INVALID_RATE",
            ConfigError::NoEnemyCapacity => "CONFIG_NO_ENEMY_CAPACITY",
        }
    }
}

impl SimError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::EnemyCapacity { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::UnknownActor(_) => "REGISTRY_UNKNOWN_ACTOR",
            RegistryError::WrongKind { .. } => "REGISTRY_WRONG_KIND",
            RegistryError::UnknownTemplate(_) => "REGISTRY_UNKNOWN_TEMPLATE",
            RegistryError::EnemyCapacity { .. } => "REGISTRY_ENEMY_CAPACITY",
        }
    }
}

impl SimError for CycleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CycleError::BattleInProgress { .. } | CycleError::ResetDuringBattle { .. } => {
                ErrorSeverity::Recoverable
            }
            CycleError::Registry(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CycleError::BattleInProgress { .. } => "CYCLE_BATTLE_IN_PROGRESS",
            CycleError::ResetDuringBattle { .. } => "CYCLE_RESET_DURING_BATTLE",
            CycleError::Registry(err) => err.error_code(),
        }
    }
}

impl SimError for SkillTableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            SkillTableError::DuplicateSkill(_) => "SKILL_DUPLICATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::engine::Phase;

    #[test]
    fn phase_errors_are_recoverable() {
        let err = CycleError::BattleInProgress {
            phase: Phase::Prepare,
        };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "CYCLE_BATTLE_IN_PROGRESS");
    }

    #[test]
    fn registry_errors_keep_their_code_when_wrapped() {
        let err = CycleError::from(RegistryError::UnknownActor(ActorId::new(3, 1)));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "REGISTRY_UNKNOWN_ACTOR");
        assert_eq!(err.to_string(), "actor #3v1 is not registered");
    }
}
