use super::IEventStoreRepo;
use crate::repos::shared::query_structs::EventTimeQuery;
use coursebell_domain::{CalendarEvent, EventCategory, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresEventStoreRepo {
    pool: PgPool,
}

impl PostgresEventStoreRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    uid: Uuid,
    category: String,
    name: String,
    description: String,
    location: Option<String>,
    start_ts: i64,
    duration: i64,
    visible: bool,
    module_name: Option<String>,
    instance_uid: Option<Uuid>,
    course_uid: Option<Uuid>,
    user_uid: Option<Uuid>,
    group_uid: Option<Uuid>,
    category_uid: Option<Uuid>,
}

impl From<EventRaw> for CalendarEvent {
    fn from(e: EventRaw) -> Self {
        Self {
            id: e.uid.into(),
            category: EventCategory::parse(&e.category),
            name: e.name,
            description: e.description,
            location: e.location,
            start_ts: e.start_ts,
            duration: e.duration,
            visible: e.visible,
            module_name: e.module_name,
            instance_id: e.instance_uid.map(Into::into),
            course_id: e.course_uid.map(Into::into),
            user_id: e.user_uid.map(Into::into),
            group_id: e.group_uid.map(Into::into),
            category_id: e.category_uid.map(Into::into),
        }
    }
}

#[async_trait::async_trait]
impl IEventStoreRepo for PostgresEventStoreRepo {
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calendar_events
            (uid, category, name, description, location, start_ts, duration, visible,
             module_name, instance_uid, course_uid, user_uid, group_uid, category_uid)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(event.category.as_str())
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_ts)
        .bind(event.duration)
        .bind(event.visible)
        .bind(&event.module_name)
        .bind(event.instance_id.as_ref().map(|id| *id.inner_ref()))
        .bind(event.course_id.as_ref().map(|id| *id.inner_ref()))
        .bind(event.user_id.as_ref().map(|id| *id.inner_ref()))
        .bind(event.group_id.as_ref().map(|id| *id.inner_ref()))
        .bind(event.category_id.as_ref().map(|id| *id.inner_ref()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<CalendarEvent> {
        sqlx::query_as::<_, EventRaw>("SELECT * FROM calendar_events WHERE uid = $1")
            .bind(event_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_due_for_reminder(
        &self,
        query: &EventTimeQuery,
    ) -> anyhow::Result<Vec<CalendarEvent>> {
        // One OR-branch per configured lead offset, mirroring the in-memory
        // predicate. $1 = window end, $2 = window start, $3.. = offsets.
        let mut lead_clause = String::new();
        for i in 0..query.lead_offsets.len() {
            if i > 0 {
                lead_clause.push_str(" OR ");
            }
            let p = i + 3;
            lead_clause.push_str(&format!(
                "(e.start_ts - ${p} >= $2 AND e.start_ts - ${p} <= $1)"
            ));
        }
        let mut sql = format!(
            "SELECT e.* FROM calendar_events e WHERE e.start_ts > $1 AND ({lead_clause})"
        );
        if query.only_visible {
            sql.push_str(" AND e.visible = TRUE");
        }

        let mut q = sqlx::query_as::<_, EventRaw>(&sql)
            .bind(query.window.end)
            .bind(query.window.start);
        for lead in &query.lead_offsets {
            q = q.bind(*lead);
        }

        let events = q.fetch_all(&self.pool).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn find_passed_deadlines(&self, from: i64, to: i64) -> anyhow::Result<Vec<CalendarEvent>> {
        let events = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT e.* FROM calendar_events e
            WHERE e.category IN ('due', 'close')
              AND e.visible = TRUE
              AND e.start_ts >= $1 AND e.start_ts < $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(events.into_iter().map(Into::into).collect())
    }
}
