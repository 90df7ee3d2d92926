use core::fmt;

use crate::actor::ActorKind;

/// One of the two sequential passes of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SubPhase {
    Actions,
    Enemies,
}

impl SubPhase {
    /// Registry list iterated by this sub-phase.
    pub const fn participants(self) -> ActorKind {
        match self {
            SubPhase::Actions => ActorKind::Action,
            SubPhase::Enemies => ActorKind::Enemy,
        }
    }

    pub const fn next(self) -> Option<SubPhase> {
        match self {
            SubPhase::Actions => Some(SubPhase::Enemies),
            SubPhase::Enemies => None,
        }
    }
}

/// Macro phase of the simulation. Cyclic: `Prepare → Battle(Actions) →
/// Battle(Enemies) → Prepare`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Charging input is accepted; nothing executes.
    #[default]
    Prepare,
    Battle(SubPhase),
}

impl Phase {
    pub const fn is_prepare(self) -> bool {
        matches!(self, Phase::Prepare)
    }

    pub const fn is_battle(self) -> bool {
        matches!(self, Phase::Battle(_))
    }

    pub const fn sub_phase(self) -> Option<SubPhase> {
        match self {
            Phase::Prepare => None,
            Phase::Battle(sub) => Some(sub),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Prepare => f.write_str("prepare"),
            Phase::Battle(sub) => write!(f, "battle.{sub}"),
        }
    }
}

/// Progress within the current sub-phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Stage {
    /// Participants are executing.
    Running,
    /// Everyone finished; waiting out the settle delay.
    Settling { remaining: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_dotted_battle_phases() {
        assert_eq!(Phase::Prepare.to_string(), "prepare");
        assert_eq!(Phase::Battle(SubPhase::Enemies).to_string(), "battle.enemies");
    }

    #[test]
    fn sub_phases_run_actions_then_enemies() {
        assert_eq!(SubPhase::Actions.next(), Some(SubPhase::Enemies));
        assert_eq!(SubPhase::Enemies.next(), None);
        assert_eq!(SubPhase::Enemies.participants(), ActorKind::Enemy);
    }
}
