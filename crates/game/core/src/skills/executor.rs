//! Sequential, paced execution of a [`SkillQueue`].

use super::{EnemyProfile, SkillKind, SkillProgress, SkillQueue, SkillTask};
use crate::actor::ActorContext;
use crate::world::SimEvent;

#[derive(Clone, Debug, PartialEq)]
enum ExecutorState {
    Idle,
    Running { skill: SkillKind, task: SkillTask },
    Pacing { remaining: f32 },
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorStatus {
    Running,
    Finished,
}

/// Runs a queue one skill at a time.
///
/// For each entry the executor spends one unit of budget, starts the skill,
/// resumes it every tick until it reports [`SkillProgress::Done`], then waits
/// `skill_pacing` seconds before the next entry. Once the budget is spent the
/// remaining entries are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillExecutor {
    queue: SkillQueue,
    budget: u32,
    state: ExecutorState,
}

impl SkillExecutor {
    pub fn new(queue: SkillQueue, budget: u32) -> Self {
        Self {
            queue,
            budget,
            state: ExecutorState::Idle,
        }
    }

    /// Executor with nothing to run.
    pub fn finished() -> Self {
        Self {
            queue: SkillQueue::default(),
            budget: 0,
            state: ExecutorState::Finished,
        }
    }

    /// Advances by `dt`. The first call starts the first skill.
    pub fn resume(
        &mut self,
        dt: f32,
        profile: &EnemyProfile,
        ctx: &mut ActorContext<'_>,
    ) -> ExecutorStatus {
        match &mut self.state {
            ExecutorState::Idle => self.start_next(profile, ctx),
            ExecutorState::Running { task, .. } => {
                if task.resume(dt, ctx) == SkillProgress::Done {
                    self.finish_skill(profile, ctx)
                } else {
                    ExecutorStatus::Running
                }
            }
            ExecutorState::Pacing { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.start_next(profile, ctx)
                } else {
                    ExecutorStatus::Running
                }
            }
            ExecutorState::Finished => ExecutorStatus::Finished,
        }
    }

    /// Removes up to `amount` units of budget. Entries that can no longer be
    /// paid for are skipped.
    pub fn drain(&mut self, amount: u32) {
        self.budget = self.budget.saturating_sub(amount);
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn queue(&self) -> &SkillQueue {
        &self.queue
    }

    /// Skill whose effect is currently pending, if any.
    pub fn current_skill(&self) -> Option<SkillKind> {
        match &self.state {
            ExecutorState::Running { skill, .. } => Some(*skill),
            _ => None,
        }
    }

    fn finish_skill(&mut self, profile: &EnemyProfile, ctx: &mut ActorContext<'_>) -> ExecutorStatus {
        let pacing = ctx.config.skill_pacing;
        if pacing > 0.0 {
            self.state = ExecutorState::Pacing { remaining: pacing };
            return ExecutorStatus::Running;
        }
        self.start_next(profile, ctx)
    }

    fn start_next(&mut self, profile: &EnemyProfile, ctx: &mut ActorContext<'_>) -> ExecutorStatus {
        loop {
            if self.budget == 0 {
                if self.queue.remaining() > 0 {
                    tracing::debug!(
                        target: "battle::skills",
                        actor = %ctx.id,
                        skipped = self.queue.remaining(),
                        "budget exhausted, skipping remaining skills"
                    );
                }
                self.state = ExecutorState::Finished;
                return ExecutorStatus::Finished;
            }

            let index = self.queue.current_index;
            let Some(skill) = self.queue.next_skill() else {
                self.state = ExecutorState::Finished;
                return ExecutorStatus::Finished;
            };
            self.budget -= 1;

            tracing::trace!(target: "battle::skills", actor = %ctx.id, %skill, index, "skill started");
            ctx.commands.emit(SimEvent::SkillStarted {
                id: ctx.id,
                skill,
                index,
            });

            let task = SkillTask::start(skill, profile, ctx);
            if task != SkillTask::Instant {
                self.state = ExecutorState::Running { skill, task };
                return ExecutorStatus::Running;
            }

            let pacing = ctx.config.skill_pacing;
            if pacing > 0.0 {
                self.state = ExecutorState::Pacing { remaining: pacing };
                return ExecutorStatus::Running;
            }
        }
    }
}
