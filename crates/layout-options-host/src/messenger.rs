//! User-facing message collaborator.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Status,
    Warning,
    Error,
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageType,
    pub text: String,
}

/// Queues messages for display to the site builder.
pub trait Messenger {
    fn add_message(&self, kind: MessageType, text: &str);

    fn add_status(&self, text: &str) {
        self.add_message(MessageType::Status, text);
    }

    fn add_warning(&self, text: &str) {
        self.add_message(MessageType::Warning, text);
    }

    fn add_error(&self, text: &str) {
        self.add_message(MessageType::Error, text);
    }
}

/// Messenger that keeps every message in memory, in arrival order.
///
/// Request-scoped and single-threaded, hence `RefCell`.
#[derive(Debug, Default)]
pub struct MemoryMessenger {
    messages: RefCell<Vec<Message>>,
}

impl MemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    pub fn messages_by_type(&self, kind: MessageType) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Remove and return every queued message.
    pub fn drain(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

impl Messenger for MemoryMessenger {
    fn add_message(&self, kind: MessageType, text: &str) {
        self.messages.borrow_mut().push(Message {
            kind,
            text: text.to_string(),
        });
    }
}
