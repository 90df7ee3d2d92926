//! Weighted, capped skill selection followed by a stable tier reorder.

use strum::EnumCount;

use super::{SkillKind, SkillTable};
use crate::config::SimConfig;
use crate::rng::{RngOracle, SeedContext};

/// Ordered skills an enemy runs this cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillQueue {
    skills: Vec<SkillKind>,
    /// Index of the next skill to run.
    pub current_index: usize,
    counts: [u32; SkillKind::COUNT],
}

impl SkillQueue {
    /// Builds a queue from an explicit order. The tier reorder is not
    /// applied; use [`SkillQueueBuilder`] for drawn queues.
    pub fn from_skills(skills: Vec<SkillKind>) -> Self {
        let mut counts = [0; SkillKind::COUNT];
        for skill in &skills {
            counts[skill.index()] += 1;
        }
        Self {
            skills,
            current_index: 0,
            counts,
        }
    }

    pub fn skills(&self) -> &[SkillKind] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// How many times `kind` was selected this cycle.
    pub fn count(&self, kind: SkillKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Next skill to run, advancing the cursor.
    pub fn next_skill(&mut self) -> Option<SkillKind> {
        let skill = self.skills.get(self.current_index).copied()?;
        self.current_index += 1;
        Some(skill)
    }

    /// Skills not yet handed out.
    pub fn remaining(&self) -> usize {
        self.skills.len().saturating_sub(self.current_index)
    }

    pub fn clear(&mut self) {
        self.skills.clear();
        self.current_index = 0;
        self.counts = [0; SkillKind::COUNT];
    }
}

/// Produces a [`SkillQueue`] from a [`SkillTable`] and an energy budget.
///
/// # Algorithm
///
/// For each of `budget` draws:
/// 1. Candidates are the entries with non-zero weight still under their cap.
/// 2. If there are none, building stops early.
/// 3. A uniform roll in `[0, sum(weights))` is matched against the cumulative
///    weights in table order; the first bucket whose cumulative weight exceeds
///    the roll wins.
/// 4. The winner is appended and its per-cycle counter incremented.
///
/// After all draws the queue is stably sorted by [`SkillKind::tier`].
pub struct SkillQueueBuilder<'a> {
    table: &'a SkillTable,
    rng: &'a dyn RngOracle,
}

impl<'a> SkillQueueBuilder<'a> {
    pub fn new(table: &'a SkillTable, rng: &'a dyn RngOracle) -> Self {
        Self { table, rng }
    }

    pub fn build(&self, budget: u32, seeds: SeedContext) -> SkillQueue {
        let budget = budget.min(SimConfig::MAX_SKILL_BUDGET);
        let mut counts = [0u32; SkillKind::COUNT];
        let mut skills = Vec::with_capacity(budget as usize);

        for draw in 0..budget {
            let Some(kind) = self.draw(&counts, seeds.seed(draw)) else {
                tracing::trace!(
                    target: "battle::skills",
                    actor = seeds.actor,
                    draw,
                    "no eligible skills left, stopping early"
                );
                break;
            };
            counts[kind.index()] += 1;
            skills.push(kind);
        }

        // Stable: equal tiers keep their draw order.
        skills.sort_by_key(|kind| kind.tier());

        SkillQueue {
            skills,
            current_index: 0,
            counts,
        }
    }

    fn draw(&self, counts: &[u32; SkillKind::COUNT], seed: u64) -> Option<SkillKind> {
        let candidates = self.table.entries().iter().filter(|entry| {
            entry.weight > 0
                && entry
                    .cap
                    .is_none_or(|cap| counts[entry.kind.index()] < cap)
        });

        let total: u32 = candidates.clone().map(|entry| entry.weight as u32).sum();
        if total == 0 {
            return None;
        }

        let roll = self.rng.below(seed, total);
        let mut cumulative = 0u32;
        for entry in candidates {
            cumulative += entry.weight as u32;
            if roll < cumulative {
                return Some(entry.kind);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::skills::SkillEntry;

    /// Oracle whose every draw lands on the same roll.
    struct FixedRoll(u32);

    impl RngOracle for FixedRoll {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }

        fn below(&self, _seed: u64, bound: u32) -> u32 {
            self.0.min(bound - 1)
        }
    }

    fn table(entries: Vec<SkillEntry>) -> SkillTable {
        SkillTable::new(entries).unwrap()
    }

    fn seeds(cycle: u64) -> SeedContext {
        SeedContext::new(0xC0FFEE, cycle, 1)
    }

    #[test]
    fn caps_are_never_exceeded() {
        let table = table(vec![
            SkillEntry::capped(SkillKind::Spawn, 5, 2),
            SkillEntry::new(SkillKind::Move, 1),
            SkillEntry::capped(SkillKind::Shield, 3, 1),
        ]);
        let rng = PcgRng;
        let builder = SkillQueueBuilder::new(&table, &rng);

        for cycle in 0..10_000 {
            let queue = builder.build(8, seeds(cycle));
            let spawns = queue.skills().iter().filter(|k| **k == SkillKind::Spawn).count();
            let shields = queue.skills().iter().filter(|k| **k == SkillKind::Shield).count();
            assert!(spawns <= 2, "cycle {cycle}: {spawns} spawns");
            assert!(shields <= 1, "cycle {cycle}: {shields} shields");
            assert_eq!(queue.count(SkillKind::Spawn) as usize, spawns);
        }
    }

    #[test]
    fn weights_control_frequency() {
        let table = table(vec![
            SkillEntry::new(SkillKind::Hide, 3),
            SkillEntry::new(SkillKind::Move, 1),
        ]);
        let rng = PcgRng;
        let builder = SkillQueueBuilder::new(&table, &rng);

        let samples = 100_000;
        let hides = (0..samples)
            .filter(|cycle| builder.build(1, seeds(*cycle)).skills() == [SkillKind::Hide])
            .count();
        let frequency = hides as f64 / samples as f64;
        assert!(
            (frequency - 0.75).abs() < 0.01,
            "expected ~75% Hide, got {frequency}"
        );
    }

    #[test]
    fn final_order_is_non_decreasing_by_tier() {
        let table = table(vec![
            SkillEntry::new(SkillKind::Hide, 2),
            SkillEntry::new(SkillKind::Shield, 2),
            SkillEntry::new(SkillKind::Strike, 2),
            SkillEntry::capped(SkillKind::Spawn, 1, 1),
            SkillEntry::new(SkillKind::Move, 2),
        ]);
        let rng = PcgRng;
        let builder = SkillQueueBuilder::new(&table, &rng);

        for cycle in 0..2_000 {
            let queue = builder.build(10, seeds(cycle));
            assert_eq!(queue.len(), 10);
            assert!(
                queue
                    .skills()
                    .windows(2)
                    .all(|pair| pair[0].tier() <= pair[1].tier()),
                "unsorted queue {:?}",
                queue.skills()
            );
        }
    }

    #[test]
    fn zero_cap_removes_skill() {
        let table = table(vec![
            SkillEntry::capped(SkillKind::Strike, 100, 0),
            SkillEntry::new(SkillKind::Move, 1),
        ]);
        let rng = PcgRng;
        let queue = SkillQueueBuilder::new(&table, &rng).build(5, seeds(0));
        assert_eq!(queue.skills(), &[SkillKind::Move; 5]);
    }

    #[test]
    fn stops_early_when_everything_is_capped() {
        let table = table(vec![
            SkillEntry::capped(SkillKind::Strike, 1, 1),
            SkillEntry::capped(SkillKind::Move, 1, 1),
        ]);
        let rng = PcgRng;
        let queue = SkillQueueBuilder::new(&table, &rng).build(6, seeds(0));
        assert_eq!(queue.skills(), &[SkillKind::Move, SkillKind::Strike]);
    }

    #[test]
    fn empty_table_builds_empty_queue() {
        let table = SkillTable::default();
        let rng = PcgRng;
        let queue = SkillQueueBuilder::new(&table, &rng).build(4, seeds(0));
        assert!(queue.is_empty());
    }

    #[test]
    fn roll_on_boundary_picks_next_bucket() {
        let table = table(vec![
            SkillEntry::new(SkillKind::Hide, 2),
            SkillEntry::new(SkillKind::Move, 2),
        ]);

        let first = SkillQueueBuilder::new(&table, &FixedRoll(1)).build(1, seeds(0));
        assert_eq!(first.skills(), &[SkillKind::Hide]);

        let second = SkillQueueBuilder::new(&table, &FixedRoll(2)).build(1, seeds(0));
        assert_eq!(second.skills(), &[SkillKind::Move]);
    }

    #[test]
    fn reorder_happens_after_drawing() {
        // Every roll hits the first eligible bucket, so Hide is drawn until its
        // cap is exhausted, and only then Move. The reorder must still put
        // Move first.
        let table = table(vec![
            SkillEntry::capped(SkillKind::Hide, 1, 2),
            SkillEntry::new(SkillKind::Move, 1),
        ]);
        let queue = SkillQueueBuilder::new(&table, &FixedRoll(0)).build(3, seeds(0));
        assert_eq!(
            queue.skills(),
            &[SkillKind::Move, SkillKind::Hide, SkillKind::Hide]
        );
        assert_eq!(queue.count(SkillKind::Hide), 2);
    }

    #[test]
    fn same_seed_replays_same_queue() {
        let table = table(vec![
            SkillEntry::new(SkillKind::Strike, 2),
            SkillEntry::new(SkillKind::Move, 3),
            SkillEntry::new(SkillKind::Shield, 1),
        ]);
        let rng = PcgRng;
        let builder = SkillQueueBuilder::new(&table, &rng);
        assert_eq!(builder.build(6, seeds(17)), builder.build(6, seeds(17)));
    }

    #[test]
    fn cursor_walks_queue_once() {
        let mut queue = SkillQueue::from_skills(vec![SkillKind::Move, SkillKind::Strike]);
        assert_eq!(queue.next_skill(), Some(SkillKind::Move));
        assert_eq!(queue.remaining(), 1);
        assert_eq!(queue.next_skill(), Some(SkillKind::Strike));
        assert_eq!(queue.next_skill(), None);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.count(SkillKind::Move), 0);
    }
}
