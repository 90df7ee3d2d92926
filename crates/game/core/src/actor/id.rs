use core::fmt;

/// Generational handle to an actor in the [`super::ActorArena`].
///
/// A handle whose actor has been despawned never resolves again, even if the
/// slot is reused: the generation no longer matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId {
    pub index: u32,
    pub generation: u32,
}

impl ActorId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
