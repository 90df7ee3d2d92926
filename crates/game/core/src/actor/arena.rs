//! Generational storage for live actors.

use super::{Actor, ActorId};

enum Entry {
    Vacant,
    Occupied(Box<dyn Actor>),
    /// Temporarily moved out while the actor runs a step.
    CheckedOut,
}

struct Slot {
    generation: u32,
    entry: Entry,
}

/// Owns every live actor. Handles are generational, so a handle to a
/// despawned actor is detectably stale.
#[derive(Default)]
pub struct ActorArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ActorArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, actor: Box<dyn Actor>) -> ActorId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Entry::Occupied(actor);
            return ActorId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Entry::Occupied(actor),
        });
        ActorId::new(index, 0)
    }

    /// Removes the actor, invalidating every outstanding handle to it.
    /// Checked-out actors cannot be despawned.
    pub fn despawn(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        let slot = self.slot_mut(id)?;
        if !matches!(slot.entry, Entry::Occupied(_)) {
            return None;
        }
        let Entry::Occupied(actor) = std::mem::replace(&mut slot.entry, Entry::Vacant) else {
            return None;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(actor)
    }

    /// Whether `id` still refers to a live actor (checked-out actors count).
    pub fn contains(&self, id: ActorId) -> bool {
        self.slot(id)
            .is_some_and(|slot| !matches!(slot.entry, Entry::Vacant))
    }

    pub fn get(&self, id: ActorId) -> Option<&dyn Actor> {
        match &self.slot(id)?.entry {
            Entry::Occupied(actor) => Some(actor.as_ref()),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut (dyn Actor + 'static)> {
        match &mut self.slot_mut(id)?.entry {
            Entry::Occupied(actor) => Some(actor.as_mut()),
            _ => None,
        }
    }

    /// Moves the actor out so it can run with mutable access to the rest of
    /// the world. Must be paired with [`Self::restore`].
    pub fn take(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        let slot = self.slot_mut(id)?;
        if !matches!(slot.entry, Entry::Occupied(_)) {
            return None;
        }
        match std::mem::replace(&mut slot.entry, Entry::CheckedOut) {
            Entry::Occupied(actor) => Some(actor),
            other => {
                slot.entry = other;
                None
            }
        }
    }

    pub fn restore(&mut self, id: ActorId, actor: Box<dyn Actor>) {
        if let Some(slot) = self.slot_mut(id)
            && matches!(slot.entry, Entry::CheckedOut)
        {
            slot.entry = Entry::Occupied(actor);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn slot(&self, id: ActorId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: ActorId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorContext, ActorCore, ActorKind};

    struct Dummy(ActorCore);

    impl Actor for Dummy {
        fn kind(&self) -> ActorKind {
            ActorKind::Action
        }
        fn name(&self) -> &str {
            "dummy"
        }
        fn core(&self) -> &ActorCore {
            &self.0
        }
        fn core_mut(&mut self) -> &mut ActorCore {
            &mut self.0
        }
        fn execute(&mut self, _ctx: &mut ActorContext<'_>) {}
        fn resume(&mut self, _dt: f32, _ctx: &mut ActorContext<'_>) {}
    }

    fn dummy() -> Box<dyn Actor> {
        Box::new(Dummy(ActorCore::default()))
    }

    #[test]
    fn stale_handles_do_not_resolve() {
        let mut arena = ActorArena::new();
        let first = arena.spawn(dummy());
        assert!(arena.despawn(first).is_some());
        assert!(!arena.contains(first));

        let second = arena.spawn(dummy());
        assert_eq!(second.index, first.index);
        assert_ne!(second.generation, first.generation);
        assert!(arena.get(first).is_none());
        assert!(arena.get(second).is_some());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn checked_out_actor_is_still_live() {
        let mut arena = ActorArena::new();
        let id = arena.spawn(dummy());
        let actor = arena.take(id).unwrap();

        assert!(arena.contains(id));
        assert!(arena.get(id).is_none());
        assert!(arena.despawn(id).is_none());
        assert!(arena.take(id).is_none());

        arena.restore(id, actor);
        assert!(arena.get(id).is_some());
    }
}
