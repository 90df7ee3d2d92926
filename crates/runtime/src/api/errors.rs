//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and the simulation core so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{ConfigError, CycleError, ErrorSeverity, RegistryError, SimError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("invalid simulation config")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("battle did not return to prepare within {max_ticks} ticks")]
    CycleTimeout { max_ticks: usize },

    #[error("step size must be finite and positive (got {dt})")]
    InvalidStep { dt: f32 },
}

impl RuntimeError {
    /// Severity of the underlying simulation error, if any.
    pub fn severity(&self) -> Option<ErrorSeverity> {
        match self {
            RuntimeError::Config(err) => Some(err.severity()),
            RuntimeError::Cycle(err) => Some(err.severity()),
            RuntimeError::Registry(err) => Some(err.severity()),
            _ => None,
        }
    }
}
