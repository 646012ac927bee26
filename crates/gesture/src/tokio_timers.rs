use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::trace;

use crate::timer::{TimerHandle, TimerService};

/// Timer service backed by tokio tasks. Fired handles arrive on the receiver
/// returned by [`TokioTimers::new`]; the host forwards them to the
/// controller. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioTimers {
    fired: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioTimers {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (fired, rx) = mpsc::unbounded_channel();
        (
            Self {
                fired,
                tasks: HashMap::new(),
                next_id: 1,
            },
            rx,
        )
    }

    fn next_handle(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        handle
    }
}

impl TimerService for TokioTimers {
    fn now(&self) -> Instant {
        time::Instant::now().into_std()
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        let handle = self.next_handle();
        let fired = self.fired.clone();
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = fired.send(handle);
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle {
        let handle = self.next_handle();
        let fired = self.fired.clone();
        let period = period.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if fired.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            trace!(timer = handle.0, "timers: cancelled");
            task.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
