//! Conversation management
//!
//! One `Conversation` per interactive session, exclusively owned by that
//! session's control flow. History grows monotonically within a session;
//! `reset` returns it to the single system message.

use crate::agent::types::Message;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A conversation session
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,
    /// Messages in the conversation (excluding the system prompt)
    pub messages: Vec<Message>,
    /// System prompt for this conversation
    pub system_prompt: String,
    /// When the conversation started
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation with a system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Conversation {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            system_prompt: system_prompt.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the conversation
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Add a user message
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::user(content));
    }

    /// Add an assistant message
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::assistant(content));
    }

    /// Get messages formatted for an API request, system prompt first
    pub fn api_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(self.messages.clone());
        messages
    }

    /// Clear history back to the single system message
    pub fn reset(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::Role;

    #[test]
    fn test_api_messages_prepend_system_prompt() {
        let mut conv = Conversation::new("You are a helpful agent.");
        conv.add_user_message("When is Acme's renewal?");

        let messages = conv.api_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_reset_clears_back_to_system_only() {
        let mut conv = Conversation::new("system");
        conv.add_user_message("hello");
        conv.add_assistant_message("hi");
        conv.reset();

        assert!(conv.messages.is_empty());
        assert_eq!(conv.api_messages().len(), 1);
    }
}
