mod config;
mod controller;
mod feedback;
mod timer;
mod tokio_timers;

pub use config::GestureConfig;
pub use controller::{GestureAction, GestureController, GesturePhase};
pub use feedback::{Feedback, HapticPattern, NoFeedback, RecordingFeedback};
pub use timer::{SimulatedTimers, TimerHandle, TimerService};
pub use tokio_timers::TokioTimers;
