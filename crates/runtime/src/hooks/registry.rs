//! Hook registry for dispatching simulation events to presentation hooks.

use std::sync::Arc;

use battle_core::SimEvent;

use super::{PresentationHook, TraceHook};

/// Registry that dispatches simulation events to presentation hooks.
#[derive(Clone)]
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn PresentationHook>]>,
}

impl HookRegistry {
    /// Creates a new hook registry. Hooks are sorted by priority (lower
    /// values first); equal priorities keep their given order.
    pub fn new(mut hooks: Vec<Arc<dyn PresentationHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Registry without any hooks.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Creates a registry with the default set of hooks.
    ///
    /// Default hooks include:
    /// - TraceHook: logs phase boundaries and effects
    pub fn default_hooks() -> Self {
        Self::new(vec![Arc::new(TraceHook) as Arc<dyn PresentationHook>])
    }

    /// Returns a registry with `hook` added to the current set.
    pub fn with(&self, hook: Arc<dyn PresentationHook>) -> Self {
        let mut hooks = self.hooks.to_vec();
        hooks.push(hook);
        Self::new(hooks)
    }

    /// Delivers one event to every hook in priority order.
    pub fn dispatch(&self, event: &SimEvent) {
        for hook in self.hooks.iter() {
            match event {
                SimEvent::PhaseChanged { from, to, cycle } => {
                    hook.on_phase_changed(*from, *to, *cycle)
                }
                SimEvent::SubPhaseStarted {
                    sub_phase,
                    participants,
                } => hook.on_sub_phase_started(*sub_phase, *participants),
                SimEvent::SubPhaseCompleted { sub_phase } => hook.on_sub_phase_completed(*sub_phase),
                SimEvent::Effect { kind, position } => hook.on_effect(*kind, *position),
                _ => {}
            }
            hook.on_event(event);
        }
    }

    /// Returns the number of hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use battle_core::{EffectKind, Phase, SubPhase};
    use glam::Vec2;

    struct Recorder {
        name: &'static str,
        priority: i32,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl PresentationHook for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_phase_changed(&self, _from: Phase, to: Phase, _cycle: u64) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, to));
        }

        fn on_effect(&self, kind: EffectKind, _position: Vec2) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, kind));
        }
    }

    #[test]
    fn dispatch_follows_priority() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let late: Arc<dyn PresentationHook> = Arc::new(Recorder {
            name: "late",
            priority: 10,
            log: log.clone(),
        });
        let early: Arc<dyn PresentationHook> = Arc::new(Recorder {
            name: "early",
            priority: -5,
            log: log.clone(),
        });
        let registry = HookRegistry::new(vec![late, early]);

        registry.dispatch(&SimEvent::PhaseChanged {
            from: Phase::Prepare,
            to: Phase::Battle(SubPhase::Actions),
            cycle: 0,
        });
        registry.dispatch(&SimEvent::Effect {
            kind: EffectKind::Hit,
            position: Vec2::ZERO,
        });
        // Not a typed callback; only `on_event` sees it.
        registry.dispatch(&SimEvent::ScoreAwarded {
            amount: 1,
            total: 1,
        });

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "early:battle.actions",
                "late:battle.actions",
                "early:hit",
                "late:hit",
            ]
        );
        assert_eq!(
            registry.hooks().collect::<Vec<_>>(),
            vec![("early", -5), ("late", 10)]
        );
    }

    #[test]
    fn with_keeps_existing_hooks() {
        let registry = HookRegistry::default_hooks();
        let extended = registry.with(Arc::new(TraceHook));
        assert_eq!(registry.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(HookRegistry::empty().is_empty());
    }
}
