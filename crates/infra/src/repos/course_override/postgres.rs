use super::ICourseOverrideRepo;
use coursebell_domain::{CourseOverride, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresCourseOverrideRepo {
    pool: PgPool,
}

impl PostgresCourseOverrideRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OverrideRaw {
    course_uid: Uuid,
    enable_course: bool,
    enable_activities: bool,
    enable_group: bool,
}

impl From<OverrideRaw> for CourseOverride {
    fn from(o: OverrideRaw) -> Self {
        Self {
            course_id: o.course_uid.into(),
            enable_course: o.enable_course,
            enable_activities: o.enable_activities,
            enable_group: o.enable_group,
        }
    }
}

#[async_trait::async_trait]
impl ICourseOverrideRepo for PostgresCourseOverrideRepo {
    async fn find(&self, course_id: &ID) -> Option<CourseOverride> {
        sqlx::query_as::<_, OverrideRaw>("SELECT * FROM course_overrides WHERE course_uid = $1")
            .bind(course_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn upsert(&self, value: &CourseOverride) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO course_overrides (course_uid, enable_course, enable_activities, enable_group)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (course_uid) DO UPDATE SET
                enable_course = $2, enable_activities = $3, enable_group = $4
            "#,
        )
        .bind(value.course_id.inner_ref())
        .bind(value.enable_course)
        .bind(value.enable_activities)
        .bind(value.enable_group)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
