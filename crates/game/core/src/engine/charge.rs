//! Prepare-phase charging: a held input fills the selected action's store.

use super::Simulation;
use crate::actor::{ActorId, ActorKind};
use crate::registry::RegistryError;
use crate::world::SimEvent;

/// Tracks the charge input and which action receives it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChargeController {
    selected: Option<ActorId>,
    held: bool,
}

impl ChargeController {
    pub fn selected(&self) -> Option<ActorId> {
        self.selected
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Drops the held input without locking in a slot.
    pub(super) fn release(&mut self) {
        self.held = false;
    }
}

impl Simulation {
    /// Samples the charge key. A held → released edge during Prepare locks in
    /// the selected action's active slot.
    pub fn set_charge_input(&mut self, held: bool) {
        let released = self.charge.held && !held;
        self.charge.held = held;
        if released && self.phase.is_prepare() {
            self.finalize_selected_slot();
        }
    }

    /// Directs charging at `id`, which must be a registered action.
    pub fn select_action(&mut self, id: ActorId) -> Result<(), RegistryError> {
        let actor = self.arena.get(id).ok_or(RegistryError::UnknownActor(id))?;
        if actor.kind() != ActorKind::Action {
            return Err(RegistryError::WrongKind {
                id,
                expected: ActorKind::Action,
            });
        }
        self.set_selected(Some(id));
        Ok(())
    }

    pub fn selected_action(&self) -> Option<ActorId> {
        self.charge.selected
    }

    pub(super) fn tick_charging(&mut self, dt: f32) {
        if !self.charge.held {
            return;
        }
        let Some(id) = self.charge.selected else {
            return;
        };
        if let Some(store) = self.arena.get_mut(id).and_then(|actor| actor.energy_mut()) {
            store.accumulate(dt);
        }
    }

    /// Selects the first registered action whose slots are not all locked in,
    /// or clears the selection when every action is charged.
    pub(super) fn select_next_uncharged(&mut self) {
        let next = self
            .registry
            .live(ActorKind::Action, &self.arena)
            .into_iter()
            .find(|id| {
                self.arena
                    .get(*id)
                    .and_then(|actor| actor.energy())
                    .is_some_and(|store| !store.has_completed_all_slots())
            });
        self.set_selected(next);
    }

    pub(super) fn set_selected(&mut self, id: Option<ActorId>) {
        if self.charge.selected == id {
            return;
        }
        self.charge.selected = id;
        if let Some(id) = id {
            tracing::debug!(target: "battle::phase", action = %id, "action selected");
            self.emit(SimEvent::ActionSelected { id });
        }
    }

    fn finalize_selected_slot(&mut self) {
        let Some(id) = self.charge.selected else {
            return;
        };
        let Some(store) = self.arena.get_mut(id).and_then(|actor| actor.energy_mut()) else {
            return;
        };

        let slot = store.active_slot();
        let value = store.slot_values().get(slot).copied().unwrap_or_default();
        store.finalize_current_slot();
        let complete = store.has_completed_all_slots();

        self.emit(SimEvent::SlotFinalized { id, slot, value });
        if complete {
            self.select_next_uncharged();
        }
    }
}
