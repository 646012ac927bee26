use std::sync::Arc;

use gesture::{Feedback, HapticPattern};
use shared::domain::CRUMB_CEILING;

pub struct Keypad {
    digits: String,
    feedback: Arc<dyn Feedback>,
}

impl Keypad {
    pub fn new(feedback: Arc<dyn Feedback>) -> Self {
        Self {
            digits: String::new(),
            feedback,
        }
    }

    pub fn push_digit(&mut self, digit: u8) -> bool {
        self.feedback.feedback(HapticPattern::Micro);
        if digit > 9 {
            return false;
        }
        let mut next = if self.digits == "0" {
            String::new()
        } else {
            self.digits.clone()
        };
        next.push(char::from(b'0' + digit));

        match next.parse::<i64>() {
            Ok(value) if value <= CRUMB_CEILING => {
                self.digits = next;
                true
            }
            _ => {
                self.feedback.feedback(HapticPattern::Double);
                false
            }
        }
    }

    pub fn delete(&mut self) {
        self.feedback.feedback(HapticPattern::Micro);
        self.digits.pop();
    }

    pub fn display(&self) -> &str {
        &self.digits
    }

    pub fn value(&self) -> i64 {
        self.digits.parse().unwrap_or_default()
    }

    pub fn confirm(self) -> i64 {
        self.feedback.feedback(HapticPattern::Medium);
        self.value()
    }
}
