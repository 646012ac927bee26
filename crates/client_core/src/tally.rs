use std::{collections::BTreeMap, sync::Arc};

use gesture::{Feedback, GestureAction, HapticPattern};
use shared::{
    domain::{ActionType, CRUMB_CEILING},
    protocol::Interaction,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied { count: i64 },
    ClampedAtFloor,
    RejectedAtCeiling { attempted: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyEvent {
    Changed(ChangeOutcome),
    EditRequested(ActionType),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TallyError {
    #[error("nothing to submit")]
    Empty,
    #[error("tally of {total} crumbs exceeds the {ceiling} crumb ceiling")]
    ExceedsCeiling { total: i64, ceiling: i64 },
}

pub struct Tally {
    counts: BTreeMap<ActionType, i64>,
    feedback: Arc<dyn Feedback>,
}

impl Tally {
    pub fn new(feedback: Arc<dyn Feedback>) -> Self {
        Self {
            counts: BTreeMap::new(),
            feedback,
        }
    }

    pub fn count(&self, action: ActionType) -> i64 {
        self.counts.get(&action).copied().unwrap_or_default()
    }

    /// Adds `delta` to one counter. Passing the ceiling is refused with a
    /// distinct cue; dropping below zero clamps silently.
    pub fn apply(&mut self, action: ActionType, delta: i64) -> ChangeOutcome {
        let next = self.count(action).saturating_add(delta);
        if next > CRUMB_CEILING {
            debug!(?action, attempted = next, "tally: change rejected at ceiling");
            self.feedback.feedback(HapticPattern::Double);
            return ChangeOutcome::RejectedAtCeiling { attempted: next };
        }
        if next < 0 {
            self.counts.insert(action, 0);
            return ChangeOutcome::ClampedAtFloor;
        }
        self.counts.insert(action, next);
        ChangeOutcome::Applied { count: next }
    }

    pub fn handle(&mut self, action: ActionType, gesture: GestureAction) -> TallyEvent {
        match gesture {
            GestureAction::Tap => {
                self.feedback.feedback(HapticPattern::Micro);
                TallyEvent::Changed(self.apply(action, 1))
            }
            GestureAction::Change(delta) => {
                self.feedback.feedback(HapticPattern::Micro);
                TallyEvent::Changed(self.apply(action, delta))
            }
            GestureAction::Hold => {
                self.feedback.feedback(HapticPattern::Medium);
                TallyEvent::EditRequested(action)
            }
        }
    }

    pub fn set_exact(&mut self, action: ActionType, value: i64) -> ChangeOutcome {
        let count = value.clamp(0, CRUMB_CEILING);
        self.counts.insert(action, count);
        ChangeOutcome::Applied { count }
    }

    pub fn total_crumbs(&self) -> i64 {
        self.counts
            .iter()
            .map(|(action, count)| action.crumbs_per_unit() * count)
            .sum()
    }

    pub fn total_actions(&self) -> i64 {
        self.counts.values().sum()
    }

    pub fn clear(&mut self) {
        self.feedback.feedback(HapticPattern::Double);
        self.counts.clear();
    }

    pub fn confirmation_prompt(&self) -> String {
        let total = self.total_crumbs();
        if self.count(ActionType::Penalty) > 0 && total < 0 {
            format!("Subtract {} crumbs?", total.abs())
        } else {
            format!("Log +{total} crumbs?")
        }
    }

    pub fn prepare_batch(&self) -> Result<Vec<Interaction>, TallyError> {
        if self.total_actions() == 0 {
            return Err(TallyError::Empty);
        }
        let total = self.total_crumbs();
        if total > CRUMB_CEILING {
            self.feedback.feedback(HapticPattern::Double);
            return Err(TallyError::ExceedsCeiling {
                total,
                ceiling: CRUMB_CEILING,
            });
        }
        self.feedback.feedback(HapticPattern::Heavy);
        Ok(ActionType::ALL
            .into_iter()
            .flat_map(|action| Interaction::batch_for(action, self.count(action)))
            .collect())
    }
}
