use serde::{Deserialize, Serialize};

pub const CRUMB_CEILING: i64 = 80_000;
pub const GOAL: i64 = CRUMB_CEILING;

const CONVERSATION_MIN_MESSAGES: i64 = 5;
const LONG_CALL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionKind {
    Conversation,
    Call,
    Removal,
}

impl InteractionKind {
    /// Crumbs earned by one interaction record. `count_or_duration` is the
    /// message count, the call length in minutes, or the crumbs to remove.
    pub fn crumbs_for(self, count_or_duration: i64) -> i64 {
        match self {
            Self::Removal => -count_or_duration.abs(),
            Self::Conversation if count_or_duration >= CONVERSATION_MIN_MESSAGES => 1,
            Self::Conversation => 0,
            Self::Call if count_or_duration >= LONG_CALL_MINUTES => 5,
            Self::Call => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Chat,
    Call,
    Deep,
    Penalty,
}

impl ActionType {
    pub const ALL: [ActionType; 4] = [Self::Chat, Self::Call, Self::Deep, Self::Penalty];

    pub fn crumbs_per_unit(self) -> i64 {
        match self {
            Self::Chat | Self::Call => 1,
            Self::Deep => 5,
            Self::Penalty => -1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "chats",
            Self::Call => "calls",
            Self::Deep => "deep talks",
            Self::Penalty => "penalties",
        }
    }
}

pub fn clamp_total(raw: i64) -> i64 {
    raw.clamp(0, CRUMB_CEILING)
}

/// Delta to record so the visible total moves by `intended` and stays in
/// bounds. A raw sum that already overflowed the ceiling is corrected by
/// the returned value.
pub fn effective_delta(current_raw_sum: i64, intended: i64) -> i64 {
    let start = clamp_total(current_raw_sum);
    let target = clamp_total(start.saturating_add(intended));
    target - current_raw_sum
}
