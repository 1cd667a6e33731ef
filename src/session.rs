//! Conversation state for a single session.
//!
//! A session owns one append-only transcript. Messages are never
//! mutated after they are appended; rendering is a pure function of
//! the message list so the transcript can be redrawn any number of
//! times.

use serde::{Deserialize, Serialize};

/// Greeting shown as the first assistant message of every session.
pub const GREETING: &str = "Hi, I'm the math problem solver who can answer all your math questions. How can I help you today?";

/// Example question offered to the user before their first input.
pub const DEFAULT_QUESTION: &str =
    "How many cookies did you sell if you sold 320 chocolate cookies and 270 vanilla cookies?";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only ordered message list, seeded with the greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// New conversation containing only the greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop everything but the greeting.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Render the transcript as display text. Pure: does not touch state.
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| match m.role {
                Role::User => format!("You: {}", m.content),
                Role::Assistant => format!("Regne: {}", m.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_starts_with_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::Assistant);
        assert_eq!(conversation.messages()[0].content, GREETING);
    }

    #[test]
    fn test_successful_exchange_appends_two_in_order() {
        let mut conversation = Conversation::new();
        let before = conversation.len();

        conversation.push_user("2+2");
        conversation.push_assistant("The answer is 4.");

        assert_eq!(conversation.len(), before + 2);
        let tail = &conversation.messages()[before..];
        assert_eq!(tail[0].role, Role::User);
        assert_eq!(tail[1].role, Role::Assistant);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut conversation = Conversation::new();
        conversation.push_user("What is 7 * 6?");
        conversation.push_assistant("42");

        let first = conversation.render();
        let second = conversation.render();
        assert_eq!(first, second);
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn test_render_labels_roles() {
        let mut conversation = Conversation::new();
        conversation.push_user("hello");

        let rendered = conversation.render();
        assert!(rendered.starts_with("Regne: "));
        assert!(rendered.ends_with("You: hello"));
    }

    #[test]
    fn test_reset_keeps_greeting_only() {
        let mut conversation = Conversation::new();
        conversation.push_user("q");
        conversation.push_assistant("a");

        conversation.reset();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].content, GREETING);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let message = Message::user("hi");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
