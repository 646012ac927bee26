use std::time::Duration;

use super::*;
use crate::{SimulatedTimers, TokioTimers};

type SimController = GestureController<SimulatedTimers>;

fn controller() -> (SimController, SimulatedTimers) {
    let clock = SimulatedTimers::new();
    (
        GestureController::new(GestureConfig::default(), clock.clone()),
        clock,
    )
}

fn advance(ctrl: &mut SimController, clock: &SimulatedTimers, ms: u64) -> Vec<GestureAction> {
    let mut actions = Vec::new();
    clock.advance(Duration::from_millis(ms), |handle| {
        actions.extend(ctrl.timer_fired(handle));
    });
    actions
}

#[test]
fn quick_release_is_a_tap() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();
    assert_eq!(ctrl.surface_phase(), GesturePhase::Armed);

    assert!(advance(&mut ctrl, &clock, 599).is_empty());
    assert_eq!(ctrl.release_surface(), Some(GestureAction::Tap));
    assert_eq!(ctrl.surface_phase(), GesturePhase::Idle);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn long_press_fires_hold_once_and_suppresses_tap() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();

    assert_eq!(advance(&mut ctrl, &clock, 601), vec![GestureAction::Hold]);
    assert_eq!(ctrl.surface_phase(), GesturePhase::LongPressFired);
    assert!(advance(&mut ctrl, &clock, 2_000).is_empty());
    assert_eq!(ctrl.release_surface(), None);
    assert_eq!(ctrl.surface_phase(), GesturePhase::Idle);
}

#[test]
fn leaving_the_surface_cancels_silently() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();
    advance(&mut ctrl, &clock, 300);
    ctrl.leave_surface();

    assert!(advance(&mut ctrl, &clock, 1_000).is_empty());
    assert_eq!(ctrl.release_surface(), None);
    assert_eq!(ctrl.live_timers(), 0);
}

#[test]
fn leaving_after_hold_returns_to_idle() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();
    assert_eq!(advance(&mut ctrl, &clock, 600), vec![GestureAction::Hold]);
    assert_eq!(ctrl.surface_phase(), GesturePhase::LongPressFired);

    ctrl.leave_surface();
    assert_eq!(ctrl.surface_phase(), GesturePhase::Idle);
    assert_eq!(ctrl.live_timers(), 0);
    assert_eq!(ctrl.release_surface(), None);
    assert!(advance(&mut ctrl, &clock, 1_000).is_empty());
}

#[test]
fn repressing_the_surface_restarts_the_hold_timer() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();
    assert!(advance(&mut ctrl, &clock, 400).is_empty());

    ctrl.press_surface();
    assert_eq!(ctrl.surface_phase(), GesturePhase::Armed);
    assert_eq!(clock.pending(), 1);
    assert!(advance(&mut ctrl, &clock, 400).is_empty());
    assert_eq!(advance(&mut ctrl, &clock, 200), vec![GestureAction::Hold]);
    assert_eq!(ctrl.release_surface(), None);
}

#[test]
fn turbo_emits_immediately_then_at_cadence() {
    let (mut ctrl, clock) = controller();
    let mut changes = vec![ctrl.press_step(1)];
    assert_eq!(ctrl.step_phase(), GesturePhase::TurboPending);

    // Delay plus three intervals.
    changes.extend(advance(&mut ctrl, &clock, 300 + 3 * 100));
    assert_eq!(changes, vec![GestureAction::Change(1); 4]);
    assert_eq!(ctrl.step_phase(), GesturePhase::TurboActive);
    assert_eq!(ctrl.live_timers(), 1);
}

#[test]
fn releasing_before_turbo_arms_emits_only_the_first_change() {
    let (mut ctrl, clock) = controller();
    assert_eq!(ctrl.press_step(-1), GestureAction::Change(-1));
    advance(&mut ctrl, &clock, 200);
    ctrl.release_step();

    assert!(advance(&mut ctrl, &clock, 1_000).is_empty());
    assert_eq!(ctrl.step_phase(), GesturePhase::Idle);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn releasing_turbo_stops_repetition() {
    let (mut ctrl, clock) = controller();
    ctrl.press_step(1);
    assert_eq!(advance(&mut ctrl, &clock, 550).len(), 2);
    ctrl.release_step();

    assert!(advance(&mut ctrl, &clock, 1_000).is_empty());
    assert_eq!(clock.pending(), 0);
}

#[test]
fn teardown_is_idempotent_and_final() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();
    ctrl.press_step(1);
    advance(&mut ctrl, &clock, 450);

    ctrl.teardown();
    ctrl.teardown();
    ctrl.release_step();
    ctrl.leave_surface();

    assert!(advance(&mut ctrl, &clock, 5_000).is_empty());
    assert_eq!(ctrl.release_surface(), None);
    assert_eq!(ctrl.surface_phase(), GesturePhase::Idle);
    assert_eq!(ctrl.step_phase(), GesturePhase::Idle);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn repress_restarts_without_overlapping_timers() {
    let (mut ctrl, clock) = controller();
    ctrl.press_step(1);
    assert_eq!(advance(&mut ctrl, &clock, 450).len(), 1);

    assert_eq!(ctrl.press_step(1), GestureAction::Change(1));
    assert_eq!(clock.pending(), 1);
    assert_eq!(ctrl.step_phase(), GesturePhase::TurboPending);

    // New arm at 750, first repeat at 850.
    assert!(advance(&mut ctrl, &clock, 300).is_empty());
    assert_eq!(advance(&mut ctrl, &clock, 100), vec![GestureAction::Change(1)]);
    assert_eq!(clock.pending(), 1);
}

#[test]
fn step_presses_do_not_reach_the_surface() {
    let (mut ctrl, clock) = controller();
    ctrl.press_surface();
    ctrl.press_step(-1);
    ctrl.release_step();
    assert_eq!(ctrl.surface_phase(), GesturePhase::Armed);

    let actions = advance(&mut ctrl, &clock, 600);
    assert_eq!(actions, vec![GestureAction::Hold]);

    let (mut idle, _clock) = controller();
    idle.press_step(1);
    idle.release_step();
    assert_eq!(idle.release_surface(), None);
}

#[test]
fn unknown_handles_are_ignored() {
    let (mut ctrl, _clock) = controller();
    ctrl.press_surface();
    assert_eq!(ctrl.timer_fired(TimerHandle(9_999)), None);
    assert_eq!(ctrl.surface_phase(), GesturePhase::Armed);
}

#[test]
fn dropping_the_controller_cancels_its_timers() {
    let clock = SimulatedTimers::new();
    {
        let mut ctrl = GestureController::new(GestureConfig::default(), clock.clone());
        ctrl.press_surface();
        ctrl.press_step(1);
        assert_eq!(clock.pending(), 2);
    }
    assert_eq!(clock.pending(), 0);
}

#[test]
fn custom_thresholds_are_respected() {
    let clock = SimulatedTimers::new();
    let mut ctrl = GestureController::new(GestureConfig::from_millis(200, 50, 10), clock.clone());
    ctrl.press_surface();
    let mut actions = Vec::new();
    clock.advance(Duration::from_millis(200), |handle| {
        actions.extend(ctrl.timer_fired(handle));
    });
    assert_eq!(actions, vec![GestureAction::Hold]);
}

#[tokio::test(start_paused = true)]
async fn tokio_timers_drive_turbo_cadence() {
    let (timers, mut fired) = TokioTimers::new();
    let mut ctrl = GestureController::new(GestureConfig::default(), timers);
    let mut changes = vec![ctrl.press_step(1)];

    let deadline = tokio::time::sleep(Duration::from_millis(650));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            Some(handle) = fired.recv() => changes.extend(ctrl.timer_fired(handle)),
            _ = &mut deadline => break,
        }
    }
    assert_eq!(changes, vec![GestureAction::Change(1); 4]);

    ctrl.release_step();
    let quiet = tokio::time::sleep(Duration::from_millis(1_000));
    tokio::pin!(quiet);
    loop {
        tokio::select! {
            Some(handle) = fired.recv() => assert_eq!(ctrl.timer_fired(handle), None),
            _ = &mut quiet => break,
        }
    }
    assert_eq!(ctrl.live_timers(), 0);
}
