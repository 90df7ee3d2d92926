//! Seeded random charge planner.
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use battle_core::{ExecutionState, SimSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::{ChargeOrder, ChargePlanner};

/// Charges each idle action's slots for a random duration in
/// `[min_seconds, max_seconds]`.
pub struct RandomPlanner {
    rng: Mutex<StdRng>,
    min_seconds: f32,
    max_seconds: f32,
}

impl RandomPlanner {
    pub fn new(seed: u64, min_seconds: f32, max_seconds: f32) -> Self {
        let (lo, hi) = if min_seconds <= max_seconds {
            (min_seconds, max_seconds)
        } else {
            (max_seconds, min_seconds)
        };
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            min_seconds: lo.max(0.0),
            max_seconds: hi.max(0.0),
        }
    }
}

#[async_trait]
impl ChargePlanner for RandomPlanner {
    async fn plan(&self, snapshot: &SimSnapshot) -> runtime::Result<Vec<ChargeOrder>> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let orders = snapshot
            .actions
            .iter()
            .filter(|action| action.state == ExecutionState::Idle)
            .map(|action| ChargeOrder {
                action: action.id,
                slots: action
                    .slots
                    .iter()
                    .map(|_| rng.gen_range(self.min_seconds..=self.max_seconds))
                    .collect(),
            })
            .collect();
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ActionKind, ActionTemplate, SimConfig, Simulation};

    fn snapshot() -> SimSnapshot {
        let mut sim = Simulation::new(SimConfig::instant()).unwrap();
        sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
        sim.add_action(ActionTemplate::new("bomb", ActionKind::Bomb));
        sim.snapshot()
    }

    #[tokio::test]
    async fn orders_cover_every_slot_within_bounds() {
        let planner = RandomPlanner::new(7, 0.2, 1.5);
        let orders = planner.plan(&snapshot()).await.unwrap();

        let slots: Vec<_> = orders.iter().map(|order| order.slots.len()).collect();
        assert_eq!(slots, vec![1, 2]);
        assert!(
            orders
                .iter()
                .flat_map(|order| &order.slots)
                .all(|s| (0.2..=1.5).contains(s))
        );
    }

    #[tokio::test]
    async fn same_seed_plans_the_same_holds() {
        let snapshot = snapshot();
        let first = RandomPlanner::new(11, 0.0, 2.0).plan(&snapshot).await.unwrap();
        let second = RandomPlanner::new(11, 0.0, 2.0).plan(&snapshot).await.unwrap();
        let holds = |orders: &[ChargeOrder]| {
            orders
                .iter()
                .flat_map(|order| order.slots.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(holds(&first), holds(&second));
    }

    #[test]
    fn swapped_bounds_are_normalized() {
        let planner = RandomPlanner::new(0, 3.0, -1.0);
        assert_eq!((planner.min_seconds, planner.max_seconds), (0.0, 3.0));
    }
}
