//! Presentation hooks for runtime orchestration.
//!
//! Hooks let UI, camera or audio layers react to the simulation without the
//! core knowing about them. Every method has a no-op default, so a hook only
//! implements the notifications it cares about. Hooks run on the simulation
//! worker, synchronously, after each command; they observe but never steer
//! the battle.
//!
//! # Execution Order
//!
//! Hooks are sorted by priority (lower values run first) and receive events
//! in emission order.

mod registry;
mod trace;

pub use registry::HookRegistry;
pub use trace::TraceHook;

use battle_core::{EffectKind, Phase, SimEvent, SubPhase};
use glam::Vec2;

/// Optional presentation callbacks.
pub trait PresentationHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    /// Returns the execution priority. Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn on_phase_changed(&self, _from: Phase, _to: Phase, _cycle: u64) {}

    fn on_sub_phase_started(&self, _sub_phase: SubPhase, _participants: usize) {}

    fn on_sub_phase_completed(&self, _sub_phase: SubPhase) {}

    fn on_effect(&self, _kind: EffectKind, _position: Vec2) {}

    /// Called for every event, after the typed callback (if any).
    fn on_event(&self, _event: &SimEvent) {}
}
