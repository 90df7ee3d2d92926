//! Asynchronous abstraction for deciding how to charge actions.
//!
//! Runtime users plug in [`ChargePlanner`] implementations so Prepare can be
//! driven by human input, scripted fixtures, or simple policies.
use async_trait::async_trait;
use battle_core::{ActorId, SimSnapshot};

use super::errors::Result;

/// Charge to apply to one action: seconds of held input per slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeOrder {
    pub action: ActorId,
    pub slots: Vec<f32>,
}

/// Trait for planning the Prepare phase from a snapshot.
#[async_trait]
pub trait ChargePlanner: Send + Sync {
    /// Returns the charge orders to apply, in order, before the battle is
    /// triggered. Actions without an order go into battle uncharged.
    async fn plan(&self, snapshot: &SimSnapshot) -> Result<Vec<ChargeOrder>>;
}

/// A planner that never charges anything.
/// Useful for testing or as a fallback.
pub struct IdlePlanner;

#[async_trait]
impl ChargePlanner for IdlePlanner {
    async fn plan(&self, _snapshot: &SimSnapshot) -> Result<Vec<ChargeOrder>> {
        Ok(Vec::new())
    }
}

/// Charges every slot of every action for the same duration.
pub struct FixedPlanner {
    pub seconds: f32,
}

#[async_trait]
impl ChargePlanner for FixedPlanner {
    async fn plan(&self, snapshot: &SimSnapshot) -> Result<Vec<ChargeOrder>> {
        Ok(snapshot
            .actions
            .iter()
            .map(|action| ChargeOrder {
                action: action.id,
                slots: vec![self.seconds; action.slots.len()],
            })
            .collect())
    }
}
