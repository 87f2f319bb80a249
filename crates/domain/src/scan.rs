use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

pub const DAY_SECS: i64 = 24 * 3600;

/// The three fixed lead offsets, largest first (7, 3 and 1 days).
pub const FIXED_LEAD_OFFSETS: [i64; 3] = [7 * DAY_SECS, 3 * DAY_SECS, DAY_SECS];

pub fn is_fixed_lead_offset(secs: i64) -> bool {
    FIXED_LEAD_OFFSETS.contains(&secs)
}

/// The half-open slice of time one reminder cycle is responsible for.
/// Successive committed windows tile the timeline: every second belongs to
/// exactly one window, so a lead-time match is picked up by exactly one
/// committed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: i64,
    pub end: i64,
}

impl ScanWindow {
    /// Containment test used for every lead-tier check. Both bounds are
    /// inclusive; the no-overlap invariant comes from the next window
    /// starting at `end + 1`.
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// How a committed cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    /// At least one event had a successful send.
    Sent,
    /// The window matched no candidate events.
    NoEvents,
}

impl ScanOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanOutcome::Sent => "sent",
            ScanOutcome::NoEvents => "no_events",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(ScanOutcome::Sent),
            "no_events" => Some(ScanOutcome::NoEvents),
            _ => None,
        }
    }
}

/// Append-only record of a completed cycle. Only the most recent record is
/// ever read; it becomes the start bound of the next window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLogRecord {
    pub time: i64,
    pub outcome: ScanOutcome,
}

/// Existence of a marker means the event already got its one overdue pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueSendMarker {
    pub event_id: ID,
    pub sent_at: i64,
}

/// Per-course toggles that can suppress reminder categories for one course.
/// Written by the course administration surface, read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOverride {
    pub course_id: ID,
    pub enable_course: bool,
    pub enable_activities: bool,
    pub enable_group: bool,
}

impl CourseOverride {
    /// The all-enabled default used when a course has no override row.
    pub fn permissive(course_id: ID) -> Self {
        Self {
            course_id,
            enable_course: true,
            enable_activities: true,
            enable_group: true,
        }
    }
}
