use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// The kind of calendar entry an event represents. It decides both who
/// receives a reminder and how the message is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Site,
    User,
    Course,
    Due,
    Open,
    Close,
    Group,
    Category,
    GradingDue,
    #[serde(other)]
    Unknown,
}

impl EventCategory {
    /// Categories that point at an activity deadline or opening inside a
    /// course module.
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            EventCategory::Due | EventCategory::Open | EventCategory::Close | EventCategory::GradingDue
        )
    }

    /// Categories eligible for a post-deadline follow-up notice.
    pub fn is_deadline(&self) -> bool {
        matches!(self, EventCategory::Due | EventCategory::Close)
    }

    /// Parses a stored category string; anything unrecognized maps to
    /// `Unknown` rather than failing.
    pub fn parse(s: &str) -> Self {
        match s {
            "site" => EventCategory::Site,
            "user" => EventCategory::User,
            "course" => EventCategory::Course,
            "due" => EventCategory::Due,
            "open" => EventCategory::Open,
            "close" => EventCategory::Close,
            "group" => EventCategory::Group,
            "category" => EventCategory::Category,
            "gradingdue" => EventCategory::GradingDue,
            _ => EventCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Site => "site",
            EventCategory::User => "user",
            EventCategory::Course => "course",
            EventCategory::Due => "due",
            EventCategory::Open => "open",
            EventCategory::Close => "close",
            EventCategory::Group => "group",
            EventCategory::Category => "category",
            EventCategory::GradingDue => "gradingdue",
            EventCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar event as read from the event store. Immutable snapshot for one
/// scan cycle; this engine never writes events back.
///
/// All timestamps are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: ID,
    pub category: EventCategory,
    pub name: String,
    pub description: String,
    pub location: Option<String>,
    pub start_ts: i64,
    /// Duration in seconds, zero for point-in-time events.
    pub duration: i64,
    pub visible: bool,
    /// Module type name ("assign", "quiz", ...) when the event belongs to an
    /// activity instance.
    pub module_name: Option<String>,
    pub instance_id: Option<ID>,
    pub course_id: Option<ID>,
    pub user_id: Option<ID>,
    pub group_id: Option<ID>,
    pub category_id: Option<ID>,
}

impl CalendarEvent {
    pub fn end_ts(&self) -> i64 {
        self.start_ts + self.duration
    }

    pub fn has_module(&self) -> bool {
        self.module_name
            .as_deref()
            .map(|m| !m.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Entity for CalendarEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}
