use std::time::Instant;

use tracing::{debug, trace};

use crate::{
    config::GestureConfig,
    timer::{TimerHandle, TimerService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Tap,
    Hold,
    Change(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Armed,
    LongPressFired,
    TurboPending,
    TurboActive,
}

#[derive(Debug)]
struct SurfaceSession {
    phase: GesturePhase,
    pressed_at: Option<Instant>,
    hold_timer: Option<TimerHandle>,
}

#[derive(Debug)]
struct StepSession {
    phase: GesturePhase,
    pressed_at: Option<Instant>,
    delta: i64,
    arm_timer: Option<TimerHandle>,
    repeat_timer: Option<TimerHandle>,
}

pub struct GestureController<T: TimerService> {
    config: GestureConfig,
    timers: T,
    surface: SurfaceSession,
    step: StepSession,
}

impl<T: TimerService> GestureController<T> {
    pub fn new(config: GestureConfig, timers: T) -> Self {
        Self {
            config,
            timers,
            surface: SurfaceSession {
                phase: GesturePhase::Idle,
                pressed_at: None,
                hold_timer: None,
            },
            step: StepSession {
                phase: GesturePhase::Idle,
                pressed_at: None,
                delta: 0,
                arm_timer: None,
                repeat_timer: None,
            },
        }
    }

    pub fn surface_phase(&self) -> GesturePhase {
        self.surface.phase
    }

    pub fn step_phase(&self) -> GesturePhase {
        self.step.phase
    }

    pub fn live_timers(&self) -> usize {
        [
            self.surface.hold_timer,
            self.step.arm_timer,
            self.step.repeat_timer,
        ]
        .iter()
        .flatten()
        .count()
    }

    pub fn press_surface(&mut self) {
        self.cancel_surface();
        let hold_timer = self.timers.schedule_once(self.config.hold_threshold);
        self.surface = SurfaceSession {
            phase: GesturePhase::Armed,
            pressed_at: Some(self.timers.now()),
            hold_timer: Some(hold_timer),
        };
        trace!(timer = hold_timer.0, "gesture: surface armed");
    }

    pub fn release_surface(&mut self) -> Option<GestureAction> {
        let phase = self.surface.phase;
        let held_ms = self.held_ms(self.surface.pressed_at);
        self.cancel_surface();
        match phase {
            GesturePhase::Armed => {
                debug!(held_ms, "gesture: tap");
                Some(GestureAction::Tap)
            }
            _ => None,
        }
    }

    pub fn leave_surface(&mut self) {
        self.cancel_surface();
    }

    /// Pressing again while held restarts the session.
    pub fn press_step(&mut self, delta: i64) -> GestureAction {
        self.release_step();
        let arm_timer = self.timers.schedule_once(self.config.turbo_delay);
        self.step = StepSession {
            phase: GesturePhase::TurboPending,
            pressed_at: Some(self.timers.now()),
            delta,
            arm_timer: Some(arm_timer),
            repeat_timer: None,
        };
        trace!(delta, timer = arm_timer.0, "gesture: turbo pending");
        GestureAction::Change(delta)
    }

    pub fn release_step(&mut self) {
        if self.step.phase != GesturePhase::Idle {
            let held_ms = self.held_ms(self.step.pressed_at);
            debug!(delta = self.step.delta, held_ms, "gesture: turbo released");
        }
        for handle in [self.step.arm_timer.take(), self.step.repeat_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(handle);
        }
        self.step.phase = GesturePhase::Idle;
        self.step.pressed_at = None;
    }

    /// Handles that no longer belong to a live session are ignored, so nothing
    /// is emitted after release or teardown.
    pub fn timer_fired(&mut self, handle: TimerHandle) -> Option<GestureAction> {
        if self.surface.hold_timer == Some(handle) {
            self.surface.hold_timer = None;
            self.timers.cancel(handle);
            self.surface.phase = GesturePhase::LongPressFired;
            debug!("gesture: hold");
            return Some(GestureAction::Hold);
        }

        if self.step.arm_timer == Some(handle) {
            self.step.arm_timer = None;
            self.timers.cancel(handle);
            let repeat_timer = self.timers.schedule_repeating(self.config.turbo_interval);
            self.step.repeat_timer = Some(repeat_timer);
            self.step.phase = GesturePhase::TurboActive;
            debug!(delta = self.step.delta, "gesture: turbo active");
            return None;
        }

        if self.step.repeat_timer == Some(handle) {
            return Some(GestureAction::Change(self.step.delta));
        }

        trace!(timer = handle.0, "gesture: ignoring stale timer");
        None
    }

    pub fn teardown(&mut self) {
        self.cancel_surface();
        self.release_step();
    }

    fn cancel_surface(&mut self) {
        if let Some(handle) = self.surface.hold_timer.take() {
            self.timers.cancel(handle);
        }
        self.surface.phase = GesturePhase::Idle;
        self.surface.pressed_at = None;
    }

    fn held_ms(&self, pressed_at: Option<Instant>) -> u128 {
        pressed_at
            .map(|at| self.timers.now().saturating_duration_since(at).as_millis())
            .unwrap_or_default()
    }
}

impl<T: TimerService> Drop for GestureController<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
