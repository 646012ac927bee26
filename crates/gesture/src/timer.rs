use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// A fired timer is reported back to the owner by handle. Cancelling an
/// unknown or already cancelled handle is a no-op.
pub trait TimerService {
    fn now(&self) -> Instant;
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;
    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct Pending {
    handle: TimerHandle,
    due: Duration,
    period: Option<Duration>,
    seq: u64,
}

#[derive(Debug)]
struct SimState {
    origin: Instant,
    elapsed: Duration,
    next_id: u64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl SimState {
    fn push(&mut self, handle: TimerHandle, due: Duration, period: Option<Duration>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            handle,
            due,
            period,
            seq,
        });
    }

    fn next_due(&self, until: Duration) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedTimers {
    inner: Rc<RefCell<SimState>>,
}

impl Default for SimulatedTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTimers {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SimState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                next_id: 1,
                next_seq: 0,
                pending: Vec::new(),
            })),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.inner.borrow().elapsed
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Moves the clock forward by `by`, firing every timer that falls due in
    /// deadline order. Deadlines equal to the new time fire. Timers scheduled
    /// from inside `on_fire` fire in the same call if they fall due in time.
    pub fn advance(&self, by: Duration, mut on_fire: impl FnMut(TimerHandle)) {
        let target = self.elapsed() + by;
        loop {
            let handle = {
                let mut state = self.inner.borrow_mut();
                let Some(index) = state.next_due(target) else {
                    state.elapsed = target;
                    return;
                };
                let timer = state.pending.remove(index);
                state.elapsed = timer.due;
                if let Some(period) = timer.period {
                    state.push(timer.handle, timer.due + period, Some(period));
                }
                timer.handle
            };
            on_fire(handle);
        }
    }

    fn schedule(&self, delay: Duration, period: Option<Duration>) -> TimerHandle {
        let mut state = self.inner.borrow_mut();
        let handle = TimerHandle(state.next_id);
        state.next_id += 1;
        let due = state.elapsed + delay;
        state.push(handle, due, period);
        handle
    }
}

impl TimerService for SimulatedTimers {
    fn now(&self) -> Instant {
        let state = self.inner.borrow();
        state.origin + state.elapsed
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        self.schedule(delay, None)
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        self.schedule(period, Some(period))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|timer| timer.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = SimulatedTimers::new();
        let late = timers.schedule_once(Duration::from_millis(50));
        let early = timers.schedule_once(Duration::from_millis(20));

        let mut fired = Vec::new();
        timers.advance(Duration::from_millis(100), |handle| fired.push(handle));
        assert_eq!(fired, vec![early, late]);
        assert_eq!(timers.pending(), 0);
        assert_eq!(timers.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn repeating_timer_ticks_until_cancelled() {
        let mut timers = SimulatedTimers::new();
        let tick = timers.schedule_repeating(Duration::from_millis(100));

        let mut count = 0;
        timers.advance(Duration::from_millis(350), |_| count += 1);
        assert_eq!(count, 3);

        timers.cancel(tick);
        timers.advance(Duration::from_secs(1), |_| count += 1);
        assert_eq!(count, 3);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timers = SimulatedTimers::new();
        let handle = timers.schedule_once(Duration::from_millis(10));
        timers.cancel(handle);
        timers.cancel(handle);
        timers.cancel(TimerHandle(999));
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn clock_advances_now() {
        let timers = SimulatedTimers::new();
        let start = timers.now();
        timers.advance(Duration::from_millis(250), |_| {});
        assert_eq!(timers.now() - start, Duration::from_millis(250));
    }
}
