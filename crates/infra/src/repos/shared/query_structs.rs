use coursebell_domain::{CalendarEvent, ScanWindow, ID};

/// Query handed to the event store for one reminder cycle. It covers every
/// configured lead offset at once, so a cycle issues a single query
/// regardless of how many tiers and custom schedules are configured.
#[derive(Debug, Clone)]
pub struct EventTimeQuery {
    pub window: ScanWindow,
    /// Fixed tier offsets plus any custom per-category offsets, in seconds.
    pub lead_offsets: Vec<i64>,
    pub only_visible: bool,
}

impl EventTimeQuery {
    /// The selection predicate: the event must still be in the future
    /// relative to the window end, and at least one lead offset must land
    /// inside the window. Shared by the in-memory backend; the Postgres
    /// backend compiles the same shape to SQL.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if event.start_ts <= self.window.end {
            return false;
        }
        if self.only_visible && !event.visible {
            return false;
        }
        self.lead_offsets
            .iter()
            .any(|lead| self.window.contains(event.start_ts - lead))
    }
}

/// Context a role lookup runs against.
#[derive(Debug, Clone)]
pub enum RoleScope {
    Course(ID),
    Module { course_id: ID, module_id: ID },
}

impl RoleScope {
    pub fn course_id(&self) -> &ID {
        match self {
            RoleScope::Course(course_id) => course_id,
            RoleScope::Module { course_id, .. } => course_id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use coursebell_domain::{EventCategory, DAY_SECS};

    fn event_starting_at(start_ts: i64, visible: bool) -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            category: EventCategory::Course,
            name: "Lecture".into(),
            description: String::new(),
            location: None,
            start_ts,
            duration: 0,
            visible,
            module_name: None,
            instance_id: None,
            course_id: None,
            user_id: None,
            group_id: None,
            category_id: None,
        }
    }

    #[test]
    fn matches_any_configured_lead() {
        let query = EventTimeQuery {
            window: ScanWindow { start: 1000, end: 2000 },
            lead_offsets: vec![7 * DAY_SECS, DAY_SECS],
            only_visible: false,
        };

        // One day ahead lands inside the window.
        assert!(query.matches(&event_starting_at(1500 + DAY_SECS, true)));
        // Seven days ahead lands inside the window.
        assert!(query.matches(&event_starting_at(2000 + 7 * DAY_SECS, true)));
        // No offset lands inside the window.
        assert!(!query.matches(&event_starting_at(5000 + DAY_SECS, true)));
    }

    #[test]
    fn events_at_or_before_window_end_are_excluded() {
        let query = EventTimeQuery {
            window: ScanWindow { start: 1000, end: 2000 },
            lead_offsets: vec![0],
            only_visible: false,
        };
        assert!(!query.matches(&event_starting_at(2000, true)));
        assert!(!query.matches(&event_starting_at(1500, true)));
    }

    #[test]
    fn visibility_filter() {
        let query = EventTimeQuery {
            window: ScanWindow { start: 1000, end: 2000 },
            lead_offsets: vec![DAY_SECS],
            only_visible: true,
        };
        assert!(!query.matches(&event_starting_at(1500 + DAY_SECS, false)));
        assert!(query.matches(&event_starting_at(1500 + DAY_SECS, true)));
    }
}
