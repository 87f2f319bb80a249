use super::IEventStoreRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::query_structs::EventTimeQuery;
use coursebell_domain::{CalendarEvent, ID};

pub struct InMemoryEventStoreRepo {
    events: std::sync::Mutex<Vec<CalendarEvent>>,
}

impl InMemoryEventStoreRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryEventStoreRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEventStoreRepo for InMemoryEventStoreRepo {
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<CalendarEvent> {
        find(event_id, &self.events)
    }

    async fn find_due_for_reminder(
        &self,
        query: &EventTimeQuery,
    ) -> anyhow::Result<Vec<CalendarEvent>> {
        Ok(find_by(&self.events, |event| query.matches(event)))
    }

    async fn find_passed_deadlines(&self, from: i64, to: i64) -> anyhow::Result<Vec<CalendarEvent>> {
        Ok(find_by(&self.events, |event| {
            event.category.is_deadline()
                && event.visible
                && event.start_ts >= from
                && event.start_ts < to
        }))
    }
}
