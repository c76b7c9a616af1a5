//! Host-facing notification log
//!
//! The engine never draws anything; it records user-facing messages
//! here and the host UI drains them after each tick.

/// Category of a notification, for icon and filter selection in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Standard,
    BaseAttack,
    TerrorSite,
}

/// One user-facing notification
#[derive(Debug, Clone)]
pub struct Message {
    pub title: String,
    pub text: String,
    pub kind: MessageKind,
}

/// Accumulated notifications since the host last drained them
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub fn push(&mut self, title: impl Into<String>, text: impl Into<String>, kind: MessageKind) {
        let message = Message {
            title: title.into(),
            text: text.into(),
            kind,
        };
        tracing::debug!(title = %message.title, text = %message.text, "notification");
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.entries)
    }
}
