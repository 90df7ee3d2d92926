use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use battle_core::{
    ActionKind, ActionTemplate, CycleError, EffectKind, EnemyTemplate, ExecutionState, Phase,
    RegistryError, SimConfig, SimEvent, Simulation, SkillEntry, SkillKind, SkillTable, SubPhase,
};
use glam::Vec2;
use runtime::{
    FixedPlanner, PresentationHook, Runtime, RuntimeConfig, RuntimeError, Topic,
};

fn instant() -> RuntimeConfig {
    RuntimeConfig {
        sim: SimConfig::instant(),
        ..RuntimeConfig::default()
    }
}

fn template(name: &str, hp: i32, skill: SkillKind) -> EnemyTemplate {
    EnemyTemplate::new(
        name,
        hp,
        1,
        SkillTable::new(vec![SkillEntry::new(skill, 1)]).unwrap(),
    )
}

/// A simulation with one uncharged rock and one enemy at `position`.
fn skirmish(enemy: EnemyTemplate, position: Vec2) -> Simulation {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    sim.add_enemy(enemy, position).unwrap();
    sim
}

#[tokio::test]
async fn empty_cycle_reports_back_in_prepare() {
    let runtime = Runtime::builder().config(instant()).build().await.unwrap();
    let handle = runtime.handle();

    let report = handle.run_cycle(0.1, 10).await.unwrap();
    assert_eq!(report.cycle, 1);
    assert_eq!(report.ticks, 0);
    assert_eq!(report.base_hp, SimConfig::DEFAULT_BASE_HP);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn phase_topic_sees_both_sub_phases() {
    let sim = skirmish(template("wall", 10, SkillKind::Shield), Vec2::new(20.0, 0.0));
    let runtime = Runtime::builder().simulation(sim).build().await.unwrap();
    let handle = runtime.handle();
    let mut phase_rx = handle.subscribe(Topic::Phase);

    handle.run_cycle(0.1, 50).await.unwrap();

    let mut started = Vec::new();
    let mut last_phase = None;
    while let Ok(event) = phase_rx.try_recv() {
        assert_eq!(event.topic(), Topic::Phase);
        match event.payload {
            SimEvent::SubPhaseStarted { sub_phase, .. } => started.push(sub_phase),
            SimEvent::PhaseChanged { to, .. } => last_phase = Some(to),
            _ => {}
        }
    }
    assert_eq!(started, vec![SubPhase::Actions, SubPhase::Enemies]);
    assert_eq!(last_phase, Some(Phase::Prepare));
}

#[derive(Default)]
struct Counter {
    phases: AtomicUsize,
    effects: AtomicUsize,
}

impl PresentationHook for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn on_phase_changed(&self, _from: Phase, _to: Phase, _cycle: u64) {
        self.phases.fetch_add(1, Ordering::SeqCst);
    }

    fn on_effect(&self, _kind: EffectKind, _position: Vec2) {
        self.effects.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn hooks_observe_phases_and_effects() {
    let counter = Arc::new(Counter::default());
    let sim = skirmish(template("wall", 10, SkillKind::Shield), Vec2::new(20.0, 0.0));
    let runtime = Runtime::builder()
        .simulation(sim)
        .add_hook(counter.clone())
        .build()
        .await
        .unwrap();

    runtime.handle().run_cycle(0.1, 50).await.unwrap();

    // Prepare → Actions → Enemies → Prepare
    assert_eq!(counter.phases.load(Ordering::SeqCst), 3);
    // Launch and landing of the rock, and the wall's shield.
    assert!(counter.effects.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn errors_come_back_through_the_handle() {
    let sim = skirmish(template("archer", 10, SkillKind::Strike), Vec2::new(8.0, 0.0));
    let runtime = Runtime::builder().simulation(sim).build().await.unwrap();
    let handle = runtime.handle();

    handle.trigger_battle().await.unwrap();
    assert!(matches!(
        handle.trigger_battle().await,
        Err(RuntimeError::Cycle(CycleError::BattleInProgress { .. }))
    ));
    assert!(matches!(
        handle.spawn_enemy("ghost", Vec2::ZERO).await,
        Err(RuntimeError::Registry(RegistryError::UnknownTemplate(_)))
    ));
    assert!(matches!(
        handle.step(0.0).await,
        Err(RuntimeError::InvalidStep { .. })
    ));

    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.phase, Phase::Battle(SubPhase::Enemies));
    let archer = snapshot.enemies[0].id;

    handle.destroy(archer).await.unwrap();
    assert_eq!(handle.step(0.1).await.unwrap(), Phase::Prepare);
    assert!(handle.destroy(archer).await.is_err());
}

#[tokio::test]
async fn deactivated_enemy_stops_holding_the_pass() {
    let sim = skirmish(template("archer", 10, SkillKind::Strike), Vec2::new(80.0, 0.0));
    let runtime = Runtime::builder().simulation(sim).build().await.unwrap();
    let handle = runtime.handle();

    handle.trigger_battle().await.unwrap();
    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.phase, Phase::Battle(SubPhase::Enemies));
    let archer = snapshot.enemies[0].id;
    let rock = snapshot.actions[0].id;

    // Its strike is 10s out; benching the archer ends the pass now.
    handle.set_active(archer, false).await.unwrap();
    assert_eq!(handle.step(0.1).await.unwrap(), Phase::Prepare);
    assert_eq!(
        handle.query_snapshot().await.unwrap().base.hp,
        SimConfig::DEFAULT_BASE_HP
    );

    assert!(matches!(
        handle.drain_enemy_budget(rock, 1).await,
        Err(RuntimeError::Registry(RegistryError::WrongKind { .. }))
    ));
    handle.set_active(archer, true).await.unwrap();
    handle.trigger_battle().await.unwrap();
    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.enemy(archer).unwrap().state, ExecutionState::Executing);
}

#[tokio::test]
async fn run_cycle_times_out_without_losing_state() {
    let sim = skirmish(template("archer", 10, SkillKind::Strike), Vec2::new(80.0, 0.0));
    let runtime = Runtime::builder().simulation(sim).build().await.unwrap();
    let handle = runtime.handle();

    assert!(matches!(
        handle.run_cycle(0.1, 5).await,
        Err(RuntimeError::CycleTimeout { max_ticks: 5 })
    ));

    // The strike needs 10s in total; keep stepping by hand.
    let mut phase = handle.query_snapshot().await.unwrap().phase;
    for _ in 0..20 {
        if phase.is_prepare() {
            break;
        }
        phase = handle.step(1.0).await.unwrap();
    }
    assert_eq!(phase, Phase::Prepare);
    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.base.hp, SimConfig::DEFAULT_BASE_HP - 5);
}

#[tokio::test]
async fn planner_charges_before_the_battle() {
    let sim = skirmish(template("target", 5, SkillKind::Shield), Vec2::new(3.0, 0.0));
    let runtime = Runtime::builder()
        .simulation(sim)
        .planner(FixedPlanner { seconds: 1.0 })
        .build()
        .await
        .unwrap();

    // A one-second charge throws the rock exactly onto the target.
    let report = runtime.play_cycle(0.25, 50).await.unwrap();
    assert_eq!(report.cycle, 1);
    assert_eq!(report.enemies_left, 0);
    assert_eq!(report.score, EnemyTemplate::DEFAULT_SCORE);
}

#[tokio::test]
async fn ticker_advances_without_manual_steps() {
    let config = RuntimeConfig {
        tick_interval: Some(Duration::from_millis(5)),
        ..instant()
    };
    let sim = skirmish(template("archer", 10, SkillKind::Strike), Vec2::new(0.8, 0.0));
    let runtime = Runtime::builder()
        .config(config)
        .simulation(sim)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.trigger_battle().await.unwrap();
    let mut cycle = 0;
    for _ in 0..200 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cycle = handle.query_snapshot().await.unwrap().cycle;
        if cycle == 1 {
            break;
        }
    }
    assert_eq!(cycle, 1);
}

#[tokio::test]
async fn bundled_content_plays_consecutive_cycles() {
    let sim = battle_content::ContentFactory::build_simulation(battle_content::bundled_data_dir())
        .unwrap();
    let runtime = Runtime::builder()
        .simulation(sim)
        .planner(FixedPlanner { seconds: 0.5 })
        .build()
        .await
        .unwrap();

    let first = runtime.play_cycle(0.05, 2_000).await.unwrap();
    let second = runtime.play_cycle(0.05, 2_000).await.unwrap();
    assert_eq!((first.cycle, second.cycle), (1, 2));
    assert!(second.score >= first.score);
}
