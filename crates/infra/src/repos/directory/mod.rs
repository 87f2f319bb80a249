mod inmemory;
mod postgres;

pub use inmemory::InMemoryDirectoryRepo;
pub use postgres::PostgresDirectoryRepo;

use crate::repos::shared::query_structs::RoleScope;
use coursebell_domain::{User, ID};

/// The course/enrollment/role directory. Audience resolution reads accounts,
/// role assignments, enrolment state, group membership, availability
/// restrictions and activity completion through this one interface; the
/// write methods exist for deployments that sync the directory from an
/// upstream system, and double as fixtures in tests.
#[async_trait::async_trait]
pub trait IDirectoryRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    /// All confirmed, non-deleted, non-suspended, non-guest accounts.
    async fn find_confirmed_users(&self) -> anyhow::Result<Vec<User>>;
    /// Accounts holding any of the given roles in the scope's course and
    /// enrolled there. `active_only` additionally requires an active
    /// enrolment status.
    async fn find_role_users(
        &self,
        role_ids: &[ID],
        scope: &RoleScope,
        active_only: bool,
    ) -> anyhow::Result<Vec<User>>;
    /// Members of a group across all of its role buckets, deduplicated.
    async fn find_group_members(&self, group_id: &ID) -> anyhow::Result<Vec<User>>;
    /// Applies the activity's conditional-access restrictions. Modules
    /// without restrictions let everyone through.
    async fn filter_by_availability(
        &self,
        users: Vec<User>,
        module_id: &ID,
    ) -> anyhow::Result<Vec<User>>;
    /// Narrows a user set to accounts holding the grading capability on the
    /// module.
    async fn filter_graders(&self, users: Vec<User>, module_id: &ID) -> anyhow::Result<Vec<User>>;
    /// Ids of users who have already completed the activity.
    async fn find_completed_user_ids(&self, module_id: &ID) -> anyhow::Result<Vec<ID>>;

    // Directory sync surface.
    async fn assign_role(&self, user_id: &ID, role_id: &ID, course_id: &ID) -> anyhow::Result<()>;
    async fn set_enrolment(&self, user_id: &ID, course_id: &ID, active: bool)
        -> anyhow::Result<()>;
    async fn add_group_member(
        &self,
        group_id: &ID,
        user_id: &ID,
        role_id: &ID,
    ) -> anyhow::Result<()>;
    /// Replaces the allow-list of the module's access restriction.
    async fn restrict_module_access(&self, module_id: &ID, user_ids: &[ID]) -> anyhow::Result<()>;
    async fn mark_completed(&self, module_id: &ID, user_id: &ID) -> anyhow::Result<()>;
    async fn grant_grading(&self, module_id: &ID, user_id: &ID) -> anyhow::Result<()>;
}
