//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! charging actions, stepping the simulation, or streaming events from
//! specific topics.
use std::collections::HashMap;

use glam::Vec2;
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{ActorId, Phase, SimSnapshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Summary of one finished Prepare → Battle → Prepare cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Cycle counter after the battle, i.e. the number of completed cycles.
    pub cycle: u64,
    /// Steps taken while the battle ran.
    pub ticks: usize,
    pub base_hp: i32,
    pub score: u64,
    pub enemies_left: usize,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Press or release the charge input.
    pub async fn set_charging(&self, held: bool) -> Result<()> {
        self.request(|reply| Command::SetCharging { held, reply })
            .await
    }

    /// Direct charging at a registered action.
    pub async fn select_action(&self, id: ActorId) -> Result<()> {
        self.request(|reply| Command::SelectAction { id, reply })
            .await?
    }

    /// Leave Prepare and start the action sub-phase.
    pub async fn trigger_battle(&self) -> Result<()> {
        self.request(|reply| Command::TriggerBattle { reply })
            .await?
    }

    /// Advance the simulation by `dt` seconds and return the resulting phase.
    pub async fn step(&self, dt: f32) -> Result<Phase> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(RuntimeError::InvalidStep { dt });
        }
        self.request(|reply| Command::Step { dt, reply }).await
    }

    /// Spawn an enemy from a registered template.
    pub async fn spawn_enemy(&self, template: impl Into<String>, position: Vec2) -> Result<ActorId> {
        let template = template.into();
        self.request(|reply| Command::SpawnEnemy {
            template,
            position,
            reply,
        })
        .await?
    }

    /// Remove an actor immediately, whatever the phase.
    pub async fn destroy(&self, id: ActorId) -> Result<()> {
        self.request(|reply| Command::Destroy { id, reply })
            .await?
    }

    /// Exclude an actor from its sub-phase (`false`) or return it (`true`).
    pub async fn set_active(&self, id: ActorId, active: bool) -> Result<()> {
        self.request(|reply| Command::SetActive { id, active, reply })
            .await?
    }

    /// Remove up to `amount` skill charges from an enemy's running queue.
    pub async fn drain_enemy_budget(&self, id: ActorId, amount: u32) -> Result<()> {
        self.request(|reply| Command::DrainBudget { id, amount, reply })
            .await?
    }

    /// Query a read-only snapshot of the simulation.
    pub async fn query_snapshot(&self) -> Result<SimSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply })
            .await
    }

    /// Hold the charge input on `id` for `seconds`, stepping by `dt`, then
    /// release it to lock in the active slot.
    pub async fn charge_slot(&self, id: ActorId, seconds: f32, dt: f32) -> Result<()> {
        self.select_action(id).await?;
        self.set_charging(true).await?;

        let mut remaining = seconds;
        while remaining > 0.0 {
            let step = dt.min(remaining);
            self.step(step).await?;
            remaining -= step;
        }

        self.set_charging(false).await
    }

    /// Trigger a battle and step by `dt` until the coordinator is back in
    /// Prepare.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::CycleTimeout`] if the battle is still running after
    /// `max_ticks` steps. The simulation keeps its state; stepping may resume.
    pub async fn run_cycle(&self, dt: f32, max_ticks: usize) -> Result<CycleReport> {
        self.trigger_battle().await?;

        let mut ticks = 0;
        let mut phase = self.query_snapshot().await?.phase;
        while phase.is_battle() {
            if ticks == max_ticks {
                return Err(RuntimeError::CycleTimeout { max_ticks });
            }
            phase = self.step(dt).await?;
            ticks += 1;
        }

        let snapshot = self.query_snapshot().await?;
        Ok(CycleReport {
            cycle: snapshot.cycle,
            ticks,
            base_hp: snapshot.base.hp,
            score: snapshot.score,
            enemies_left: snapshot.enemies.len(),
        })
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Phase` - Phase and sub-phase boundaries, charging
    /// - `Topic::Combat` - Registration, skills, spawns, damage, score
    /// - `Topic::Effects` - Presentation-only effects
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut phase_rx = handle.subscribe(Topic::Phase);
    /// while let Ok(event) = phase_rx.recv().await {
    ///     // Handle phase events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
