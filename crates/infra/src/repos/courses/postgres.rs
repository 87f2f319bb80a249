use super::ICourseRepo;
use coursebell_domain::{Course, CourseCategory, CourseGroup, CourseModule, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresCourseRepo {
    pool: PgPool,
}

impl PostgresCourseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CourseRaw {
    uid: Uuid,
    short_name: String,
    full_name: String,
    visible: bool,
    category_uid: Option<Uuid>,
    end_ts: Option<i64>,
}

impl From<CourseRaw> for Course {
    fn from(c: CourseRaw) -> Self {
        Self {
            id: c.uid.into(),
            short_name: c.short_name,
            full_name: c.full_name,
            visible: c.visible,
            category_id: c.category_uid.map(Into::into),
            end_ts: c.end_ts,
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRaw {
    uid: Uuid,
    name: String,
    parent_uid: Option<Uuid>,
}

impl From<CategoryRaw> for CourseCategory {
    fn from(c: CategoryRaw) -> Self {
        Self {
            id: c.uid.into(),
            name: c.name,
            parent_id: c.parent_uid.map(Into::into),
        }
    }
}

#[derive(Debug, FromRow)]
struct GroupRaw {
    uid: Uuid,
    course_uid: Uuid,
    name: String,
}

impl From<GroupRaw> for CourseGroup {
    fn from(g: GroupRaw) -> Self {
        Self {
            id: g.uid.into(),
            course_id: g.course_uid.into(),
            name: g.name,
        }
    }
}

#[derive(Debug, FromRow)]
struct ModuleRaw {
    uid: Uuid,
    course_uid: Uuid,
    module_name: String,
    instance_uid: Uuid,
    name: String,
    intro: String,
    time_open: Option<i64>,
    cutoff_ts: Option<i64>,
    always_show_intro: bool,
}

impl From<ModuleRaw> for CourseModule {
    fn from(m: ModuleRaw) -> Self {
        Self {
            id: m.uid.into(),
            course_id: m.course_uid.into(),
            module_name: m.module_name,
            instance_id: m.instance_uid.into(),
            name: m.name,
            intro: m.intro,
            time_open: m.time_open,
            cutoff_ts: m.cutoff_ts,
            always_show_intro: m.always_show_intro,
        }
    }
}

#[async_trait::async_trait]
impl ICourseRepo for PostgresCourseRepo {
    async fn insert(&self, course: &Course) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (uid, short_name, full_name, visible, category_uid, end_ts)
            VALUES($1, $2, $3, $4, $5, $6)
            ON CONFLICT (uid) DO UPDATE SET
                short_name = $2, full_name = $3, visible = $4, category_uid = $5, end_ts = $6
            "#,
        )
        .bind(course.id.inner_ref())
        .bind(&course.short_name)
        .bind(&course.full_name)
        .bind(course.visible)
        .bind(course.category_id.as_ref().map(|id| *id.inner_ref()))
        .bind(course.end_ts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_category(&self, category: &CourseCategory) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO course_categories (uid, name, parent_uid)
            VALUES($1, $2, $3)
            ON CONFLICT (uid) DO UPDATE SET name = $2, parent_uid = $3
            "#,
        )
        .bind(category.id.inner_ref())
        .bind(&category.name)
        .bind(category.parent_id.as_ref().map(|id| *id.inner_ref()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_group(&self, group: &CourseGroup) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO course_groups (uid, course_uid, name)
            VALUES($1, $2, $3)
            ON CONFLICT (uid) DO UPDATE SET course_uid = $2, name = $3
            "#,
        )
        .bind(group.id.inner_ref())
        .bind(group.course_id.inner_ref())
        .bind(&group.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_module(&self, module: &CourseModule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO course_modules
            (uid, course_uid, module_name, instance_uid, name, intro, time_open, cutoff_ts, always_show_intro)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (uid) DO UPDATE SET
                course_uid = $2, module_name = $3, instance_uid = $4, name = $5,
                intro = $6, time_open = $7, cutoff_ts = $8, always_show_intro = $9
            "#,
        )
        .bind(module.id.inner_ref())
        .bind(module.course_id.inner_ref())
        .bind(&module.module_name)
        .bind(module.instance_id.inner_ref())
        .bind(&module.name)
        .bind(&module.intro)
        .bind(module.time_open)
        .bind(module.cutoff_ts)
        .bind(module.always_show_intro)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, course_id: &ID) -> Option<Course> {
        sqlx::query_as::<_, CourseRaw>("SELECT * FROM courses WHERE uid = $1")
            .bind(course_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_category(&self, category_id: &ID) -> Option<CourseCategory> {
        sqlx::query_as::<_, CategoryRaw>("SELECT * FROM course_categories WHERE uid = $1")
            .bind(category_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_descendant_courses(
        &self,
        category_id: &ID,
        recursive: bool,
    ) -> anyhow::Result<Vec<Course>> {
        let courses = if recursive {
            sqlx::query_as::<_, CourseRaw>(
                r#"
                WITH RECURSIVE cats AS (
                    SELECT uid FROM course_categories WHERE uid = $1
                    UNION ALL
                    SELECT c.uid FROM course_categories c
                    JOIN cats ON c.parent_uid = cats.uid
                )
                SELECT co.* FROM courses co
                WHERE co.category_uid IN (SELECT uid FROM cats)
                "#,
            )
            .bind(category_id.inner_ref())
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CourseRaw>("SELECT * FROM courses WHERE category_uid = $1")
                .bind(category_id.inner_ref())
                .fetch_all(&self.pool)
                .await?
        };
        Ok(courses.into_iter().map(Into::into).collect())
    }

    async fn find_group(&self, group_id: &ID) -> Option<CourseGroup> {
        sqlx::query_as::<_, GroupRaw>("SELECT * FROM course_groups WHERE uid = $1")
            .bind(group_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_module(
        &self,
        module_name: &str,
        instance_id: &ID,
        course_id: Option<&ID>,
    ) -> Option<CourseModule> {
        let mut sql = String::from(
            "SELECT * FROM course_modules WHERE module_name = $1 AND instance_uid = $2",
        );
        if course_id.is_some() {
            sql.push_str(" AND course_uid = $3");
        }
        let mut q = sqlx::query_as::<_, ModuleRaw>(&sql)
            .bind(module_name)
            .bind(instance_id.inner_ref());
        if let Some(course_id) = course_id {
            q = q.bind(course_id.inner_ref());
        }
        q.fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }
}
