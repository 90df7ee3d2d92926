//! Enemy actors: build a skill queue from their budget and run it.

use crate::actor::{Actor, ActorContext, ActorCore, ActorKind, ExecutionState};
use crate::config::SimConfig;
use crate::skills::{EnemyProfile, ExecutorStatus, SkillExecutor, SkillQueueBuilder, SkillTable};

/// Static description of an enemy type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub hp: i32,
    /// Skill charges restored at the start of every execution.
    pub energy_budget: u32,
    pub skills: SkillTable,
    #[cfg_attr(feature = "serde", serde(default))]
    pub profile: EnemyProfile,
    /// Score awarded when this enemy is destroyed.
    #[cfg_attr(feature = "serde", serde(default = "default_score"))]
    pub score: u64,
}

#[cfg(feature = "serde")]
fn default_score() -> u64 {
    EnemyTemplate::DEFAULT_SCORE
}

impl EnemyTemplate {
    pub const DEFAULT_SCORE: u64 = 10;

    pub fn new(name: impl Into<String>, hp: i32, energy_budget: u32, skills: SkillTable) -> Self {
        Self {
            name: name.into(),
            hp,
            energy_budget,
            skills,
            profile: EnemyProfile::default(),
            score: Self::DEFAULT_SCORE,
        }
    }

    pub fn with_profile(mut self, profile: EnemyProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }
}

/// Enemy participant of the `Battle.Enemies` sub-phase.
///
/// On execution the budget is restored to the template maximum, a fresh
/// queue is drawn for this cycle, and the executor runs it to completion.
pub struct EnemyActor {
    core: ActorCore,
    template: EnemyTemplate,
    executor: SkillExecutor,
}

impl EnemyActor {
    pub fn new(template: EnemyTemplate) -> Self {
        Self {
            core: ActorCore::new(None),
            template,
            executor: SkillExecutor::finished(),
        }
    }

    pub fn template(&self) -> &EnemyTemplate {
        &self.template
    }

    pub fn executor(&self) -> &SkillExecutor {
        &self.executor
    }

    /// Removes skill charges from the running queue. Entries that can no
    /// longer be paid for are skipped.
    pub fn drain_budget(&mut self, amount: u32) {
        self.executor.drain(amount);
    }

    fn step(&mut self, dt: f32, ctx: &mut ActorContext<'_>) {
        if self.executor.resume(dt, &self.template.profile, ctx) == ExecutorStatus::Finished {
            self.core.complete();
        }
    }
}

impl Actor for EnemyActor {
    fn kind(&self) -> ActorKind {
        ActorKind::Enemy
    }

    fn name(&self) -> &str {
        &self.template.name
    }

    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn execute(&mut self, ctx: &mut ActorContext<'_>) {
        if !self.core.begin() {
            return;
        }

        // Hiding lasts until the enemy acts again.
        if let Some(body) = ctx.battlefield.enemy_mut(ctx.id) {
            body.hidden = false;
        }

        let budget = self.template.energy_budget.min(SimConfig::MAX_SKILL_BUDGET);
        let queue = SkillQueueBuilder::new(&self.template.skills, ctx.rng).build(budget, ctx.seeds);
        tracing::debug!(
            target: "battle::skills",
            actor = %ctx.id,
            name = %self.template.name,
            budget,
            queue = ?queue.skills(),
            "skill queue built"
        );
        self.executor = SkillExecutor::new(queue, budget);
        self.step(0.0, ctx);
    }

    fn resume(&mut self, dt: f32, ctx: &mut ActorContext<'_>) {
        if self.core.state() != ExecutionState::Executing {
            return;
        }
        self.step(dt, ctx);
    }

    fn reset_for_new_cycle(&mut self) {
        self.executor = SkillExecutor::finished();
        self.core.reset();
    }

    fn as_enemy(&self) -> Option<&EnemyActor> {
        Some(self)
    }

    fn as_enemy_mut(&mut self) -> Option<&mut EnemyActor> {
        Some(self)
    }
}
