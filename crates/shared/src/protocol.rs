use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{clamp_total, ActionType, InteractionKind, GOAL};

/// One appended interaction record. `crumbs` is computed server-side; the
/// client always sends 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub count_or_duration: i64,
    #[serde(default)]
    pub crumbs: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Interaction {
    pub fn new(kind: InteractionKind, count_or_duration: i64) -> Self {
        Self {
            id: None,
            kind,
            count_or_duration,
            crumbs: 0,
            created_at: None,
        }
    }

    pub fn expected_crumbs(&self) -> i64 {
        self.kind.crumbs_for(self.count_or_duration)
    }

    /// Records produced by `count` units of a logger action. Penalties
    /// collapse into a single removal record.
    pub fn batch_for(action: ActionType, count: i64) -> Vec<Interaction> {
        if count <= 0 {
            return Vec::new();
        }
        match action {
            ActionType::Chat => (0..count)
                .map(|_| Self::new(InteractionKind::Conversation, 5))
                .collect(),
            ActionType::Call => (0..count)
                .map(|_| Self::new(InteractionKind::Call, 1))
                .collect(),
            ActionType::Deep => (0..count)
                .map(|_| Self::new(InteractionKind::Call, 10))
                .collect(),
            ActionType::Penalty => vec![Self::new(InteractionKind::Removal, count)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_crumbs: i64,
    pub goal: i64,
    #[serde(default)]
    pub percent: f64,
}

impl Stats {
    pub fn new(total_crumbs: i64) -> Self {
        let total_crumbs = clamp_total(total_crumbs);
        Self {
            total_crumbs,
            goal: GOAL,
            percent: total_crumbs as f64 / GOAL as f64 * 100.0,
        }
    }
}
