//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use battle_core::SimEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Phase and sub-phase boundaries, selection and charging
    Phase,
    /// Registration, execution, skills, spawns, damage and score
    Combat,
    /// Presentation-only effects (projectiles, explosions, shields)
    Effects,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Phase, Topic::Combat, Topic::Effects];

    /// Topic a simulation event is routed to.
    pub fn of(event: &SimEvent) -> Topic {
        match event {
            SimEvent::PhaseChanged { .. }
            | SimEvent::SubPhaseStarted { .. }
            | SimEvent::SubPhaseCompleted { .. }
            | SimEvent::ActionSelected { .. }
            | SimEvent::SlotFinalized { .. } => Topic::Phase,
            SimEvent::Effect { .. } => Topic::Effects,
            SimEvent::ActorRegistered { .. }
            | SimEvent::ActorUnregistered { .. }
            | SimEvent::ActorExecuted { .. }
            | SimEvent::ActivationChanged { .. }
            | SimEvent::ActorCompleted { .. }
            | SimEvent::SkillStarted { .. }
            | SimEvent::EnemySpawned { .. }
            | SimEvent::EnemyDestroyed { .. }
            | SimEvent::ScoreAwarded { .. }
            | SimEvent::BaseDamaged { .. } => Topic::Combat,
        }
    }
}

/// Simulation event stamped with the cycle counter at publish time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub cycle: u64,
    pub payload: SimEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.payload)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events published while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    phase: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
    effects: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            phase: broadcast::channel(capacity).0,
            combat: broadcast::channel(capacity).0,
            effects: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Phase => &self.phase,
            Topic::Combat => &self.combat,
            Topic::Effects => &self.effects,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live receivers on a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
