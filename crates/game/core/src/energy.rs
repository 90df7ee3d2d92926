//! Multi-slot charge accumulator.
//!
//! An [`EnergyStore`] fills one slot at a time while the charge input is held.
//! Releasing the input locks the active slot in and moves to the next one, so
//! a single press–hold–release gesture repeated `n` times feeds `n`
//! independently-timed effects (for example a throw force and a fuse delay).

use arrayvec::ArrayVec;

use crate::config::SimConfig;

type Slots = ArrayVec<f32, { SimConfig::MAX_SLOTS }>;

/// Per-actor charge store with an ordered, fixed number of slots.
///
/// # Invariants
///
/// - `0 <= slot_values[i] <= max_value`
/// - `active_slot < required_slots`
/// - `completed_slots <= required_slots`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyStore {
    max_value: f32,
    accumulation_rate: f32,
    slot_values: Slots,
    active_slot: usize,
    completed_slots: usize,
}

impl EnergyStore {
    /// Creates a single-slot store.
    pub fn new(max_value: f32, accumulation_rate: f32) -> Self {
        let mut store = Self {
            max_value,
            accumulation_rate,
            slot_values: Slots::new(),
            active_slot: 0,
            completed_slots: 0,
        };
        store.set_required_slots(1);
        store
    }

    /// Creates a store sized for `slots` slots (see [`Self::set_required_slots`]).
    pub fn with_slots(max_value: f32, accumulation_rate: f32, slots: usize) -> Self {
        let mut store = Self::new(max_value, accumulation_rate);
        store.set_required_slots(slots);
        store
    }

    /// Adds `accumulation_rate * dt` to the active slot, clamped to `max_value`.
    ///
    /// No-op when the store has no capacity or no rate.
    pub fn accumulate(&mut self, dt: f32) {
        if self.max_value <= 0.0 || self.accumulation_rate <= 0.0 || dt <= 0.0 {
            return;
        }
        let slot = &mut self.slot_values[self.active_slot];
        *slot = (*slot + self.accumulation_rate * dt).min(self.max_value);
    }

    /// Locks in the active slot and advances to the next one if any remain.
    pub fn finalize_current_slot(&mut self) {
        self.completed_slots = self.completed_slots.max(self.active_slot + 1);
        if self.active_slot + 1 < self.slot_values.len() {
            self.active_slot += 1;
        }
    }

    /// Returns the sum of every slot and resets the store.
    pub fn consume(&mut self) -> f32 {
        let total = self.total();
        self.reset();
        total
    }

    /// Returns a copy of every slot value and resets the store.
    pub fn consume_all_slots(&mut self) -> Vec<f32> {
        let values = self.slot_values.to_vec();
        self.reset();
        values
    }

    /// Resizes to `max(1, n)` slots (capped at [`SimConfig::MAX_SLOTS`]),
    /// zeroing every value and index.
    pub fn set_required_slots(&mut self, n: usize) {
        let n = n.clamp(1, SimConfig::MAX_SLOTS);
        self.slot_values.clear();
        for _ in 0..n {
            self.slot_values.push(0.0);
        }
        self.active_slot = 0;
        self.completed_slots = 0;
    }

    /// Zeroes every slot and resets indices without changing the slot count.
    pub fn reset(&mut self) {
        self.slot_values.iter_mut().for_each(|value| *value = 0.0);
        self.active_slot = 0;
        self.completed_slots = 0;
    }

    pub fn has_completed_all_slots(&self) -> bool {
        self.completed_slots >= self.required_slots().max(1)
    }

    pub fn required_slots(&self) -> usize {
        self.slot_values.len()
    }

    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    pub fn completed_slots(&self) -> usize {
        self.completed_slots
    }

    pub fn slot_values(&self) -> &[f32] {
        &self.slot_values
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn accumulation_rate(&self) -> f32 {
        self.accumulation_rate
    }

    /// Sum of every slot without consuming.
    pub fn total(&self) -> f32 {
        self.slot_values.iter().sum()
    }

    /// Whether slot `index` has reached `max_value`.
    pub fn is_full(&self, index: usize) -> bool {
        self.slot_values
            .get(index)
            .is_some_and(|value| *value >= self.max_value)
    }
}
