//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration or workers.

pub mod errors;
pub mod handle;
pub mod planner;

pub use errors::{Result, RuntimeError};
pub use handle::{CycleReport, RuntimeHandle};
pub use planner::{ChargeOrder, ChargePlanner, FixedPlanner, IdlePlanner};
