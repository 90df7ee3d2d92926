//! Simulation worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! them, and publishes the resulting events to the EventBus and hooks. With a
//! tick interval configured it also advances the simulation on its own.

use std::time::Duration;

use glam::Vec2;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::debug;

use battle_core::{ActorId, Phase, SimSnapshot, Simulation};

use crate::api::Result;
use crate::events::{Event, EventBus};
use crate::hooks::HookRegistry;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Press or release the charge input.
    SetCharging {
        held: bool,
        reply: oneshot::Sender<()>,
    },
    /// Direct charging at an action.
    SelectAction {
        id: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Leave Prepare and start the battle.
    TriggerBattle { reply: oneshot::Sender<Result<()>> },
    /// Advance the simulation by `dt` seconds.
    Step {
        dt: f32,
        reply: oneshot::Sender<Phase>,
    },
    /// Spawn an enemy from a registered template.
    SpawnEnemy {
        template: String,
        position: Vec2,
        reply: oneshot::Sender<Result<ActorId>>,
    },
    /// Remove an actor.
    Destroy {
        id: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Exclude an actor from its sub-phase, or return it.
    SetActive {
        id: ActorId,
        active: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Remove skill charges from an enemy's running queue.
    DrainBudget {
        id: ActorId,
        amount: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query a read-only snapshot.
    QuerySnapshot { reply: oneshot::Sender<SimSnapshot> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::SetCharging { .. } => "set_charging",
            Command::SelectAction { .. } => "select_action",
            Command::TriggerBattle { .. } => "trigger_battle",
            Command::Step { .. } => "step",
            Command::SpawnEnemy { .. } => "spawn_enemy",
            Command::Destroy { .. } => "destroy",
            Command::SetActive { .. } => "set_active",
            Command::DrainBudget { .. } => "drain_budget",
            Command::QuerySnapshot { .. } => "query_snapshot",
        }
    }
}

/// Background task that processes simulation commands.
///
/// The worker is the only owner of the simulation; every mutation goes
/// through a command, so ordering is the order commands arrive in.
pub struct SimulationWorker {
    sim: Simulation,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    hooks: HookRegistry,
    tick_interval: Option<Duration>,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        sim: Simulation,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        hooks: HookRegistry,
        tick_interval: Option<Duration>,
    ) -> Self {
        tracing::info!(
            target: "runtime::worker",
            phase = %sim.phase(),
            cycle = sim.cycle(),
            actions = sim.registry().len(battle_core::ActorKind::Action),
            enemies = sim.registry().len(battle_core::ActorKind::Enemy),
            hooks = hooks.len(),
            ?tick_interval,
            "SimulationWorker initialized"
        );

        Self {
            sim,
            command_rx,
            event_bus,
            hooks,
            tick_interval,
        }
    }

    /// Main worker loop. Exits once every command sender is dropped.
    pub async fn run(mut self) {
        // Events raised while building the simulation (registrations).
        self.flush_events();

        let mut ticker = self.tick_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let tick_dt = self.tick_interval.map_or(0.0, |period| period.as_secs_f32());

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut ticker) => {
                    self.step(tick_dt);
                }
            }
        }

        debug!(target: "runtime::worker", cycle = self.sim.cycle(), "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        let name = cmd.name();
        let delivered = match cmd {
            Command::SetCharging { held, reply } => {
                self.sim.set_charge_input(held);
                self.flush_events();
                reply.send(()).is_ok()
            }
            Command::SelectAction { id, reply } => {
                let result = self.sim.select_action(id).map_err(Into::into);
                self.flush_events();
                reply.send(result).is_ok()
            }
            Command::TriggerBattle { reply } => {
                let result = self.sim.trigger_battle().map_err(Into::into);
                if let Err(error) = &result {
                    debug!(target: "runtime::worker", %error, "trigger rejected");
                }
                self.flush_events();
                reply.send(result).is_ok()
            }
            Command::Step { dt, reply } => {
                let phase = self.step(dt);
                reply.send(phase).is_ok()
            }
            Command::SpawnEnemy {
                template,
                position,
                reply,
            } => {
                let result = self.sim.spawn_enemy(&template, position).map_err(Into::into);
                self.flush_events();
                reply.send(result).is_ok()
            }
            Command::Destroy { id, reply } => {
                let result = self.sim.destroy(id).map_err(Into::into);
                self.flush_events();
                reply.send(result).is_ok()
            }
            Command::SetActive { id, active, reply } => {
                let result = self.sim.set_active(id, active).map_err(Into::into);
                self.flush_events();
                reply.send(result).is_ok()
            }
            Command::DrainBudget { id, amount, reply } => {
                let result = self.sim.drain_enemy_budget(id, amount).map_err(Into::into);
                self.flush_events();
                reply.send(result).is_ok()
            }
            Command::QuerySnapshot { reply } => reply.send(self.sim.snapshot()).is_ok(),
        };

        if !delivered {
            debug!(target: "runtime::worker", command = name, "reply channel closed (caller dropped)");
        }
    }

    fn step(&mut self, dt: f32) -> Phase {
        self.sim.tick(dt);
        self.flush_events();
        self.sim.phase()
    }

    /// Drains simulation events, hands them to hooks, then publishes them.
    fn flush_events(&mut self) {
        let cycle = self.sim.cycle();
        for payload in self.sim.drain_events() {
            tracing::trace!(target: "runtime::worker", event = payload.label(), cycle, "publish");
            self.hooks.dispatch(&payload);
            self.event_bus.publish(Event { cycle, payload });
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
