//! Enemy skills: catalogue, weighted queue building, and execution.
//!
//! An enemy turns its energy budget into a [`SkillQueue`] with
//! [`SkillQueueBuilder`], then runs it with a [`SkillExecutor`]. Selection is
//! two-stage: weights and caps decide *how often* each skill is drawn, and the
//! fixed [`SkillKind::tier`] table decides *in what order* the drawn skills
//! run.

mod executor;
mod queue;
mod task;

pub use executor::{ExecutorStatus, SkillExecutor};
pub use queue::{SkillQueue, SkillQueueBuilder};
pub use task::{EnemyProfile, SkillProgress, SkillTask};

/// One discrete enemy behaviour.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillKind {
    /// Advance toward the base over several ticks.
    Move,
    /// Spawn a child enemy next to the caster.
    Spawn,
    /// Fire a projectile at the base and wait for it to land.
    Strike,
    /// Raise a shield that absorbs the next hit.
    Shield,
    /// Become untargetable by area damage until the enemy next executes.
    Hide,
}

impl SkillKind {
    /// Priority tier used to reorder a drawn queue. Lower tiers run first:
    /// movement, then offence, then defence.
    pub const fn tier(self) -> u8 {
        match self {
            SkillKind::Move => 0,
            SkillKind::Spawn => 1,
            SkillKind::Strike => 2,
            SkillKind::Shield => 3,
            SkillKind::Hide => 4,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Weight and per-cycle cap of one skill in a [`SkillTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillEntry {
    pub kind: SkillKind,
    /// Relative draw weight. Zero-weight entries are never drawn.
    pub weight: u16,
    /// Maximum selections per cycle. `Some(0)` removes the skill for the
    /// whole cycle; `None` means uncapped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cap: Option<u32>,
}

impl SkillEntry {
    pub const fn new(kind: SkillKind, weight: u16) -> Self {
        Self {
            kind,
            weight,
            cap: None,
        }
    }

    pub const fn capped(kind: SkillKind, weight: u16, cap: u32) -> Self {
        Self {
            kind,
            weight,
            cap: Some(cap),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillTableError {
    #[error("skill {0} appears more than once in the table")]
    DuplicateSkill(SkillKind),
}

/// Ordered set of skills an enemy can draw from.
///
/// Entry order matters: during a draw the cumulative weights are walked in
/// table order, so ties resolve to the earlier entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillTable {
    entries: Vec<SkillEntry>,
}

impl SkillTable {
    pub fn new(entries: Vec<SkillEntry>) -> Result<Self, SkillTableError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), SkillTableError> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.kind == entry.kind) {
                return Err(SkillTableError::DuplicateSkill(entry.kind));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn entry(&self, kind: SkillKind) -> Option<&SkillEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
