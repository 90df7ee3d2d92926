//! Live membership of Battle participants and aggregate completion.
//!
//! The [`Registry`] keeps one ordered list per [`ActorKind`]. Entries are
//! generational handles, so an actor despawned from the [`ActorArena`]
//! leaves a stale entry behind that [`Registry::prune`] removes before any
//! completion check. Iteration order is insertion order.

use crate::actor::{ActorArena, ActorId, ActorKind};

/// Lookups that name an actor or template the simulation does not know.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("actor {0} is not registered")]
    UnknownActor(ActorId),

    #[error("actor {id} is not of kind {expected}")]
    WrongKind { id: ActorId, expected: ActorKind },

    #[error("enemy template '{0}' is not registered")]
    UnknownTemplate(String),

    #[error("enemy capacity of {max} reached")]
    EnemyCapacity { max: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    actions: Vec<ActorId>,
    enemies: Vec<ActorId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the list for `kind`. Returns `false` if it was
    /// already registered.
    pub fn register(&mut self, id: ActorId, kind: ActorKind) -> bool {
        let list = self.list_mut(kind);
        if list.contains(&id) {
            return false;
        }
        list.push(id);
        tracing::trace!(target: "battle::registry", actor = %id, %kind, "registered");
        true
    }

    /// Removes `id` from whichever list holds it and returns that list's kind.
    pub fn unregister(&mut self, id: ActorId) -> Option<ActorKind> {
        for kind in [ActorKind::Action, ActorKind::Enemy] {
            let list = self.list_mut(kind);
            if let Some(pos) = list.iter().position(|entry| *entry == id) {
                list.remove(pos);
                tracing::trace!(target: "battle::registry", actor = %id, %kind, "unregistered");
                return Some(kind);
            }
        }
        None
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actions.contains(&id) || self.enemies.contains(&id)
    }

    /// Drops entries whose actor no longer exists. Returns how many were
    /// removed.
    pub fn prune(&mut self, arena: &ActorArena) -> usize {
        let before = self.actions.len() + self.enemies.len();
        self.actions.retain(|id| arena.contains(*id));
        self.enemies.retain(|id| arena.contains(*id));
        let removed = before - (self.actions.len() + self.enemies.len());
        if removed > 0 {
            tracing::debug!(target: "battle::registry", removed, "pruned stale entries");
        }
        removed
    }

    /// Registered handles of `kind`, in insertion order, including stale ones.
    pub fn entries(&self, kind: ActorKind) -> &[ActorId] {
        match kind {
            ActorKind::Action => &self.actions,
            ActorKind::Enemy => &self.enemies,
        }
    }

    /// Live, active handles of `kind` in insertion order.
    pub fn live(&self, kind: ActorKind, arena: &ActorArena) -> Vec<ActorId> {
        self.entries(kind)
            .iter()
            .copied()
            .filter(|id| arena.get(*id).is_some_and(|actor| actor.is_active()))
            .collect()
    }

    /// Whether every live, active entry of `kind` has completed this cycle.
    ///
    /// Prunes first. An empty live set is complete.
    pub fn all_completed(&mut self, kind: ActorKind, arena: &ActorArena) -> bool {
        self.prune(arena);
        self.entries(kind).iter().all(|id| {
            // A checked-out actor is mid-step and therefore not done.
            match arena.get(*id) {
                Some(actor) => !actor.is_active() || actor.is_completed(),
                None => !arena.contains(*id),
            }
        })
    }

    pub fn len(&self, kind: ActorKind) -> usize {
        self.entries(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.enemies.is_empty()
    }

    fn list_mut(&mut self, kind: ActorKind) -> &mut Vec<ActorId> {
        match kind {
            ActorKind::Action => &mut self.actions,
            ActorKind::Enemy => &mut self.enemies,
        }
    }
}

/// Cached "all completed" flag per registry list.
///
/// The coordinator waits on [`Self::is_complete`]; the flag is recomputed
/// with [`Self::evaluate`] whenever an actor reports completion or leaves the
/// registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    actions: bool,
    enemies: bool,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self, kind: ActorKind) -> bool {
        match kind {
            ActorKind::Action => self.actions,
            ActorKind::Enemy => self.enemies,
        }
    }

    /// Recomputes the flag for `kind` and returns it.
    pub fn evaluate(&mut self, kind: ActorKind, registry: &mut Registry, arena: &ActorArena) -> bool {
        let complete = registry.all_completed(kind, arena);
        let flag = self.flag_mut(kind);
        if complete != *flag {
            tracing::debug!(target: "battle::registry", %kind, complete, "completion changed");
        }
        *flag = complete;
        complete
    }

    /// Clears both flags at the start of a cycle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn flag_mut(&mut self, kind: ActorKind) -> &mut bool {
        match kind {
            ActorKind::Action => &mut self.actions,
            ActorKind::Enemy => &mut self.enemies,
        }
    }
}
