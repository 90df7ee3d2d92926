use battle_core::{EffectKind, Phase, SubPhase};
use glam::Vec2;

use super::PresentationHook;

/// Logs phase boundaries at info and effects at debug.
pub struct TraceHook;

impl PresentationHook for TraceHook {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn on_phase_changed(&self, from: Phase, to: Phase, cycle: u64) {
        tracing::info!(target: "runtime::hooks", %from, %to, cycle, "phase changed");
    }

    fn on_sub_phase_started(&self, sub_phase: SubPhase, participants: usize) {
        tracing::debug!(target: "runtime::hooks", %sub_phase, participants, "sub-phase started");
    }

    fn on_sub_phase_completed(&self, sub_phase: SubPhase) {
        tracing::debug!(target: "runtime::hooks", %sub_phase, "sub-phase completed");
    }

    fn on_effect(&self, kind: EffectKind, position: Vec2) {
        tracing::debug!(
            target: "runtime::hooks",
            %kind,
            x = position.x,
            y = position.y,
            "effect"
        );
    }
}
