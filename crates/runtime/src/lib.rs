//! Runtime orchestration for the battle simulation.
//!
//! This crate wires the deterministic core into an async worker, a
//! topic-based event bus and optional presentation hooks. Consumers embed
//! [`Runtime`] to play cycles, subscribe to events, and interact with the
//! battle through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`hooks`] provides presentation callbacks
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod hooks;
pub mod runtime;

mod workers;

pub use api::{
    ChargeOrder, ChargePlanner, CycleReport, FixedPlanner, IdlePlanner, Result, RuntimeError,
    RuntimeHandle,
};
pub use events::{Event, EventBus, Topic};
pub use hooks::{HookRegistry, PresentationHook, TraceHook};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
