//! Game message log.

use rlkit_core::Color;
use serde::{Deserialize, Serialize};

/// A single log entry. Consecutive identical texts stack into one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub fg: Color,
    pub count: i32,
}

impl Message {
    fn new(text: &str, fg: Color) -> Self {
        Self {
            text: text.to_string(),
            fg,
            count: 1,
        }
    }

    /// The display text, including the repeat counter if required.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// The game's append-only message log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    pub messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message, stacking it onto the previous entry when the text
    /// matches.
    pub fn add(&mut self, text: &str, fg: Color) {
        self.add_stacked(text, fg, true);
    }

    /// Add a message with explicit stacking control.
    pub fn add_stacked(&mut self, text: &str, fg: Color, stack: bool) {
        if stack {
            if let Some(last) = self.messages.last_mut() {
                if last.text == text {
                    last.count += 1;
                    return;
                }
            }
        }
        self.messages.push(Message::new(text, fg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::WHITE;

    #[test]
    fn identical_messages_stack() {
        let mut log = MessageLog::new();
        log.add("Hit!", WHITE);
        log.add("Hit!", WHITE);
        log.add("Hit!", WHITE);
        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.messages[0].full_text(), "Hit! (x3)");
    }

    #[test]
    fn interleaved_messages_do_not_stack() {
        let mut log = MessageLog::new();
        log.add("Hit!", WHITE);
        log.add("Miss!", WHITE);
        log.add("Hit!", WHITE);
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.messages[2].full_text(), "Hit!");
    }

    #[test]
    fn stacking_can_be_disabled() {
        let mut log = MessageLog::new();
        log.add_stacked("Hit!", WHITE, false);
        log.add_stacked("Hit!", WHITE, false);
        assert_eq!(log.messages.len(), 2);
    }
}
