//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use battle_core::{SimConfig, Simulation};

use crate::api::{ChargePlanner, CycleReport, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::hooks::{HookRegistry, PresentationHook};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Used when the builder is not given a prebuilt simulation.
    pub sim: SimConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Wall-clock stepping period. `None` means manual stepping through
    /// [`RuntimeHandle::step`].
    pub tick_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            tick_interval: None,
        }
    }
}

/// Main runtime that orchestrates the battle simulation
///
/// Design: Runtime owns the worker and coordinates cycles.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    planner: Option<Box<dyn ChargePlanner>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Set the charge planner
    pub fn set_planner(&mut self, planner: impl ChargePlanner + 'static) {
        self.planner = Some(Box::new(planner));
    }

    /// Play one full cycle: plan and apply charges, then run the battle.
    ///
    /// Without a planner every action goes into battle uncharged.
    pub async fn play_cycle(&self, dt: f32, max_ticks: usize) -> Result<CycleReport> {
        if let Some(planner) = &self.planner {
            let snapshot = self.handle.query_snapshot().await?;
            for order in planner.plan(&snapshot).await? {
                for seconds in order.slots {
                    self.handle.charge_slot(order.action, seconds, dt).await?;
                }
            }
        }

        let report = self.handle.run_cycle(dt, max_ticks).await?;
        tracing::info!(
            target: "runtime::worker",
            cycle = report.cycle,
            ticks = report.ticks,
            base_hp = report.base_hp,
            score = report.score,
            enemies_left = report.enemies_left,
            "cycle finished"
        );
        Ok(report)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker, so every other handle clone must be dropped
    /// first.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    simulation: Option<Simulation>,
    planner: Option<Box<dyn ChargePlanner>>,
    hooks: Option<HookRegistry>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            simulation: None,
            planner: None,
            hooks: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide a prebuilt simulation (e.g. from content files). Its own
    /// config takes precedence over [`RuntimeConfig::sim`].
    pub fn simulation(mut self, sim: Simulation) -> Self {
        self.simulation = Some(sim);
        self
    }

    /// Set the charge planner (optional)
    pub fn planner(mut self, planner: impl ChargePlanner + 'static) -> Self {
        self.planner = Some(Box::new(planner));
        self
    }

    /// Set custom presentation hooks.
    ///
    /// If not provided, the default hooks (TraceHook) are used.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Adds a hook to the current set (the defaults if none was set yet).
    pub fn add_hook(mut self, hook: Arc<dyn PresentationHook>) -> Self {
        let hooks = self.hooks.take().unwrap_or_default();
        self.hooks = Some(hooks.with(hook));
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let sim = match self.simulation {
            Some(sim) => sim,
            None => Simulation::new(self.config.sim.clone())?,
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let hooks = self.hooks.unwrap_or_default();

        let sim_worker = SimulationWorker::new(
            sim,
            command_rx,
            event_bus,
            hooks,
            self.config.tick_interval,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            planner: self.planner,
            sim_worker_handle,
        })
    }
}
