use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

/// Tag prepended to a notification title when the message is not a plain
/// scheduled reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
    Overdue,
}

impl ChangeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ChangeKind::Added => "CREATED",
            ChangeKind::Updated => "UPDATED",
            ChangeKind::Removed => "REMOVED",
            ChangeKind::Overdue => "OVERDUE",
        }
    }
}

/// A fully rendered, per-recipient message handed to the transport. The
/// shared skeleton is rebuilt for each recipient so timezone-dependent
/// strings are correct and no state is shared between sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub event_id: ID,
    pub recipient_id: ID,
    pub recipient_email: String,
    pub from_name: String,
    pub subject: String,
    pub html_body: String,
    pub plain_body: String,
    /// Custom mail headers, e.g. a stable Message-ID per event.
    pub headers: Vec<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn change_tags() {
        assert_eq!(ChangeKind::Added.tag(), "CREATED");
        assert_eq!(ChangeKind::Overdue.tag(), "OVERDUE");
    }
}
