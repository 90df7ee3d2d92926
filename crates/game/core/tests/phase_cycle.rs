use battle_core::{
    ActionKind, ActionTemplate, ActorId, CycleError, EnemyTemplate, ExecutionState, Phase,
    SimConfig, SimEvent, Simulation, SkillEntry, SkillKind, SkillTable, SubPhase,
};
use glam::Vec2;

fn enemy(name: &str, budget: u32, entries: Vec<SkillEntry>) -> EnemyTemplate {
    EnemyTemplate::new(name, 10, budget, SkillTable::new(entries).unwrap())
}

fn shield_only(name: &str) -> EnemyTemplate {
    enemy(name, 1, vec![SkillEntry::new(SkillKind::Shield, 1)])
}

fn striker(name: &str) -> EnemyTemplate {
    enemy(name, 1, vec![SkillEntry::new(SkillKind::Strike, 1)])
}

fn charge(sim: &mut Simulation, seconds: f32) {
    sim.set_charge_input(true);
    sim.tick(seconds);
    sim.set_charge_input(false);
}

fn index_of(events: &[SimEvent], what: &str, pred: impl Fn(&SimEvent) -> bool) -> usize {
    events
        .iter()
        .position(pred)
        .unwrap_or_else(|| panic!("missing event: {what}"))
}

#[test]
fn actions_complete_before_enemies_start() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    let stone = sim.add_action(ActionTemplate::new("stone", ActionKind::Throw));
    let grunt = sim
        .add_enemy(shield_only("grunt"), Vec2::new(20.0, 0.0))
        .unwrap();

    charge(&mut sim, 1.0);
    assert_eq!(sim.selected_action(), Some(stone));
    charge(&mut sim, 2.0);
    assert_eq!(sim.selected_action(), None);

    sim.trigger_battle().unwrap();
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Actions));

    // rock flies 3 units, stone 6 units, both at 10 units/s.
    sim.tick(0.5);
    assert_eq!(sim.actor(rock).unwrap().state(), ExecutionState::Completed);
    assert_eq!(sim.actor(stone).unwrap().state(), ExecutionState::Executing);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Actions));
    assert_eq!(
        sim.actor(grunt).unwrap().state(),
        ExecutionState::Idle,
        "enemies wait for the action pass"
    );

    sim.tick(0.5);
    assert_eq!(sim.phase(), Phase::Prepare);
    assert_eq!(sim.cycle(), 1);

    let events = sim.drain_events();
    let stone_done = index_of(&events, "stone completed", |e| {
        matches!(e, SimEvent::ActorCompleted { id, .. } if *id == stone)
    });
    let actions_done = index_of(&events, "actions completed", |e| {
        matches!(e, SimEvent::SubPhaseCompleted { sub_phase: SubPhase::Actions })
    });
    let enemies_start = index_of(&events, "enemies started", |e| {
        matches!(e, SimEvent::SubPhaseStarted { sub_phase: SubPhase::Enemies, .. })
    });
    let grunt_done = index_of(&events, "grunt completed", |e| {
        matches!(e, SimEvent::ActorCompleted { id, .. } if *id == grunt)
    });
    let enemies_done = index_of(&events, "enemies completed", |e| {
        matches!(e, SimEvent::SubPhaseCompleted { sub_phase: SubPhase::Enemies })
    });
    let prepare = index_of(&events, "back to prepare", |e| {
        matches!(e, SimEvent::PhaseChanged { to: Phase::Prepare, .. })
    });

    assert!(stone_done < actions_done);
    assert!(actions_done < enemies_start);
    assert!(enemies_start < grunt_done);
    assert!(grunt_done < enemies_done);
    assert!(enemies_done < prepare);
}

#[test]
fn settle_and_rescan_delays_hold_the_pass() {
    let config = SimConfig {
        settle_delay: 0.5,
        rescan_delay: 0.25,
        ..SimConfig::instant()
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    sim.add_enemy(shield_only("grunt"), Vec2::new(20.0, 0.0))
        .unwrap();

    // An uncharged throw lands at once.
    sim.trigger_battle().unwrap();
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Actions));

    sim.tick(0.3);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Actions));
    sim.tick(0.3);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Enemies));

    // The grunt finishes instantly, but the re-scan is still pending.
    sim.tick(0.1);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Enemies));
    sim.tick(0.2);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Enemies));
    sim.tick(0.5);
    assert_eq!(sim.phase(), Phase::Prepare);
}

#[test]
fn empty_battle_completes_immediately() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    sim.trigger_battle().unwrap();
    assert_eq!(sim.phase(), Phase::Prepare);
    assert_eq!(sim.cycle(), 1);

    let events = sim.drain_events();
    let started = events
        .iter()
        .filter(|e| matches!(e, SimEvent::SubPhaseStarted { participants: 0, .. }))
        .count();
    let completed = events
        .iter()
        .filter(|e| matches!(e, SimEvent::SubPhaseCompleted { .. }))
        .count();
    assert_eq!((started, completed), (2, 2));
}

#[test]
fn battle_rejects_trigger_and_reset() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    charge(&mut sim, 2.0);
    sim.trigger_battle().unwrap();

    assert_eq!(
        sim.trigger_battle(),
        Err(CycleError::BattleInProgress {
            phase: Phase::Battle(SubPhase::Actions)
        })
    );
    assert!(matches!(
        sim.reset_actor(rock),
        Err(CycleError::ResetDuringBattle { .. })
    ));
    assert_eq!(sim.actor(rock).unwrap().state(), ExecutionState::Executing);

    sim.tick(1.0);
    assert_eq!(sim.phase(), Phase::Prepare);
    assert!(sim.reset_actor(rock).is_ok());
    assert!(sim.reset_actor(ActorId::new(99, 0)).is_err());
}

#[test]
fn every_actor_is_reset_for_the_next_cycle() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    let grunt = sim
        .add_enemy(shield_only("grunt"), Vec2::new(20.0, 0.0))
        .unwrap();

    sim.set_charge_input(true);
    sim.tick(0.5);
    sim.trigger_battle().unwrap();
    sim.tick(1.0);
    assert_eq!(sim.phase(), Phase::Prepare);

    let action = sim.actor(rock).unwrap();
    assert_eq!(action.state(), ExecutionState::Idle);
    assert_eq!(action.energy().unwrap().total(), 0.0);
    assert_eq!(sim.actor(grunt).unwrap().state(), ExecutionState::Idle);
    assert_eq!(sim.selected_action(), Some(rock));

    // A second cycle runs the same participants again.
    sim.trigger_battle().unwrap();
    sim.tick(1.0);
    assert_eq!(sim.cycle(), 2);
}

#[test]
fn bomb_needs_two_releases_before_selection_moves() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let bomb = sim.add_action(ActionTemplate::new("bomb", ActionKind::Bomb));
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));

    charge(&mut sim, 1.0);
    assert_eq!(sim.selected_action(), Some(bomb));
    charge(&mut sim, 2.0);
    assert_eq!(sim.selected_action(), Some(rock));

    let snapshot = sim.snapshot();
    let bomb_view = snapshot.action(bomb).unwrap();
    assert_eq!(bomb_view.slots, vec![1.0, 2.0]);
    assert_eq!(bomb_view.completed_slots, 2);

    let finalized: Vec<_> = sim
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SimEvent::SlotFinalized { id, slot, .. } => Some((id, slot)),
            _ => None,
        })
        .collect();
    assert_eq!(finalized, vec![(bomb, 0), (bomb, 1)]);
}

#[test]
fn charging_is_ignored_during_battle() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    sim.add_enemy(striker("archer"), Vec2::new(8.0, 0.0))
        .unwrap();

    sim.trigger_battle().unwrap();
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Enemies));
    sim.set_charge_input(true);
    sim.tick(0.5);
    sim.set_charge_input(false);
    assert_eq!(sim.actor(rock).unwrap().energy().unwrap().total(), 0.0);
}

#[test]
fn same_seed_replays_the_same_queues() {
    let mixed = || {
        enemy(
            "mixed",
            6,
            vec![
                SkillEntry::new(SkillKind::Hide, 2),
                SkillEntry::new(SkillKind::Shield, 3),
                SkillEntry::capped(SkillKind::Move, 1, 2),
            ],
        )
    };
    let queues = |seed: u64| {
        let config = SimConfig {
            seed,
            ..SimConfig::instant()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.add_enemy(mixed(), Vec2::new(30.0, 0.0)).unwrap();
        sim.trigger_battle().unwrap();
        for _ in 0..20 {
            sim.tick(0.5);
        }
        assert_eq!(sim.cycle(), 1);
        sim.drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::SkillStarted { skill, .. } => Some(skill),
                _ => None,
            })
            .collect::<Vec<_>>()
    };

    let first = queues(42);
    assert_eq!(first, queues(42));
    assert_eq!(first.len(), 6);
    assert!(first.windows(2).all(|w| w[0].tier() <= w[1].tier()));
    assert!(first.iter().filter(|s| **s == SkillKind::Move).count() <= 2);
}

fn executed(events: &[SimEvent], actor: ActorId) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::ActorExecuted { id, .. } if *id == actor))
        .count()
}

#[test]
fn inactive_action_is_skipped_and_does_not_block() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    let stone = sim.add_action(ActionTemplate::new("stone", ActionKind::Throw));
    sim.add_enemy(shield_only("grunt"), Vec2::new(20.0, 0.0))
        .unwrap();

    // Benching the selected action moves charging on.
    sim.set_active(rock, false).unwrap();
    assert_eq!(sim.selected_action(), Some(stone));
    sim.set_active(rock, true).unwrap();
    sim.select_action(rock).unwrap();

    charge(&mut sim, 1.0);
    charge(&mut sim, 2.0);
    sim.set_active(stone, false).unwrap();

    sim.trigger_battle().unwrap();
    assert_eq!(sim.actor(rock).unwrap().state(), ExecutionState::Executing);
    assert_eq!(sim.actor(stone).unwrap().state(), ExecutionState::Idle);

    // Only the rock's 0.3s flight holds the action pass.
    sim.tick(0.4);
    assert_eq!(sim.phase(), Phase::Prepare);
    assert_eq!(sim.cycle(), 1);

    let events = sim.drain_events();
    assert_eq!(executed(&events, rock), 1);
    assert_eq!(executed(&events, stone), 0);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::ActivationChanged { id, active: false, .. } if *id == stone
    )));
}

#[test]
fn benching_a_running_action_completes_the_pass() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    let stone = sim.add_action(ActionTemplate::new("stone", ActionKind::Throw));
    charge(&mut sim, 1.0);
    charge(&mut sim, 2.0);

    sim.trigger_battle().unwrap();
    sim.tick(0.4);
    assert_eq!(sim.actor(rock).unwrap().state(), ExecutionState::Completed);
    assert_eq!(sim.actor(stone).unwrap().state(), ExecutionState::Executing);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Actions));

    sim.set_active(stone, false).unwrap();
    sim.tick(0.0);
    assert_eq!(sim.phase(), Phase::Prepare);
    assert!(sim.set_active(ActorId::new(99, 0), true).is_err());
}

#[test]
fn reactivated_action_joins_the_running_pass() {
    let mut sim = Simulation::new(SimConfig::instant()).unwrap();
    let rock = sim.add_action(ActionTemplate::new("rock", ActionKind::Throw));
    let stone = sim.add_action(ActionTemplate::new("stone", ActionKind::Throw));
    charge(&mut sim, 1.0);
    charge(&mut sim, 2.0);
    sim.set_active(stone, false).unwrap();

    sim.trigger_battle().unwrap();
    sim.tick(0.1);
    sim.set_active(stone, true).unwrap();
    sim.tick(0.0);
    assert_eq!(sim.actor(stone).unwrap().state(), ExecutionState::Executing);

    // The rock lands; the stone's 0.6s flight keeps the pass open.
    sim.tick(0.3);
    assert_eq!(sim.actor(rock).unwrap().state(), ExecutionState::Completed);
    assert_eq!(sim.phase(), Phase::Battle(SubPhase::Actions));
    sim.tick(0.4);
    assert_eq!(sim.phase(), Phase::Prepare);

    let events = sim.drain_events();
    assert_eq!(executed(&events, stone), 1);
}
