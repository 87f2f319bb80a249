use super::IDirectoryRepo;
use crate::repos::shared::query_structs::RoleScope;
use coursebell_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresDirectoryRepo {
    pool: PgPool,
}

impl PostgresDirectoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    uid: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    confirmed: bool,
    deleted: bool,
    suspended: bool,
    guest: bool,
    timezone: Option<String>,
}

impl From<UserRaw> for User {
    fn from(u: UserRaw) -> Self {
        Self {
            id: u.uid.into(),
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            confirmed: u.confirmed,
            deleted: u.deleted,
            suspended: u.suspended,
            guest: u.guest,
            timezone: u.timezone.and_then(|tz| tz.parse().ok()),
        }
    }
}

fn uuids(ids: &[ID]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.inner_ref()).collect()
}

#[async_trait::async_trait]
impl IDirectoryRepo for PostgresDirectoryRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (uid, email, first_name, last_name, confirmed, deleted, suspended, guest, timezone)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (uid) DO UPDATE SET
                email = $2, first_name = $3, last_name = $4, confirmed = $5,
                deleted = $6, suspended = $7, guest = $8, timezone = $9
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.confirmed)
        .bind(user.deleted)
        .bind(user.suspended)
        .bind(user.guest)
        .bind(user.timezone.map(|tz| tz.name().to_string()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>("SELECT * FROM users WHERE uid = $1")
            .bind(user_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_confirmed_users(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE confirmed = TRUE AND deleted = FALSE AND suspended = FALSE AND guest = FALSE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn find_role_users(
        &self,
        role_ids: &[ID],
        scope: &RoleScope,
        active_only: bool,
    ) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT u.* FROM users u
            WHERE u.uid IN (
                SELECT ra.user_uid FROM role_assignments ra
                WHERE ra.role_uid = ANY($1) AND ra.course_uid = $2
            )
            AND EXISTS (
                SELECT 1 FROM enrolments en
                WHERE en.user_uid = u.uid AND en.course_uid = $2
                  AND ($3 = FALSE OR en.active = TRUE)
            )
            "#,
        )
        .bind(uuids(role_ids))
        .bind(scope.course_id().inner_ref())
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn find_group_members(&self, group_id: &ID) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT u.* FROM users u
            WHERE u.uid IN (SELECT gm.user_uid FROM group_members gm WHERE gm.group_uid = $1)
            "#,
        )
        .bind(group_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn filter_by_availability(
        &self,
        users: Vec<User>,
        module_id: &ID,
    ) -> anyhow::Result<Vec<User>> {
        let allowed: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_uid FROM module_restrictions WHERE module_uid = $1")
                .bind(module_id.inner_ref())
                .fetch_all(&self.pool)
                .await?;
        if allowed.is_empty() {
            return Ok(users);
        }
        let allowed: Vec<ID> = allowed.into_iter().map(|(uid,)| uid.into()).collect();
        Ok(users
            .into_iter()
            .filter(|user| allowed.contains(&user.id))
            .collect())
    }

    async fn filter_graders(&self, users: Vec<User>, module_id: &ID) -> anyhow::Result<Vec<User>> {
        let graders: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_uid FROM module_graders WHERE module_uid = $1")
                .bind(module_id.inner_ref())
                .fetch_all(&self.pool)
                .await?;
        let graders: Vec<ID> = graders.into_iter().map(|(uid,)| uid.into()).collect();
        Ok(users
            .into_iter()
            .filter(|user| graders.contains(&user.id))
            .collect())
    }

    async fn find_completed_user_ids(&self, module_id: &ID) -> anyhow::Result<Vec<ID>> {
        let completed: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_uid FROM module_completions WHERE module_uid = $1")
                .bind(module_id.inner_ref())
                .fetch_all(&self.pool)
                .await?;
        Ok(completed.into_iter().map(|(uid,)| uid.into()).collect())
    }

    async fn assign_role(&self, user_id: &ID, role_id: &ID, course_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO role_assignments (user_uid, role_uid, course_uid)
            VALUES($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(role_id.inner_ref())
        .bind(course_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_enrolment(
        &self,
        user_id: &ID,
        course_id: &ID,
        active: bool,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO enrolments (user_uid, course_uid, active)
            VALUES($1, $2, $3)
            ON CONFLICT (user_uid, course_uid) DO UPDATE SET active = $3
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(course_id.inner_ref())
        .bind(active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_group_member(
        &self,
        group_id: &ID,
        user_id: &ID,
        role_id: &ID,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO group_members (group_uid, user_uid, role_uid)
            VALUES($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(group_id.inner_ref())
        .bind(user_id.inner_ref())
        .bind(role_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn restrict_module_access(&self, module_id: &ID, user_ids: &[ID]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM module_restrictions WHERE module_uid = $1")
            .bind(module_id.inner_ref())
            .execute(&mut *tx)
            .await?;
        for user_id in user_ids {
            sqlx::query("INSERT INTO module_restrictions (module_uid, user_uid) VALUES($1, $2)")
                .bind(module_id.inner_ref())
                .bind(user_id.inner_ref())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn mark_completed(&self, module_id: &ID, user_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO module_completions (module_uid, user_uid)
            VALUES($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(module_id.inner_ref())
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn grant_grading(&self, module_id: &ID, user_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO module_graders (module_uid, user_uid)
            VALUES($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(module_id.inner_ref())
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
