mod inmemory;
mod postgres;

pub use inmemory::InMemoryCourseRepo;
pub use postgres::PostgresCourseRepo;

use coursebell_domain::{Course, CourseCategory, CourseGroup, CourseModule, ID};

/// The course/category service: courses, the category tree, groups and
/// activity instances. Read-mostly; inserts feed synced snapshots and tests.
#[async_trait::async_trait]
pub trait ICourseRepo: Send + Sync {
    async fn insert(&self, course: &Course) -> anyhow::Result<()>;
    async fn insert_category(&self, category: &CourseCategory) -> anyhow::Result<()>;
    async fn insert_group(&self, group: &CourseGroup) -> anyhow::Result<()>;
    async fn insert_module(&self, module: &CourseModule) -> anyhow::Result<()>;

    async fn find(&self, course_id: &ID) -> Option<Course>;
    async fn find_category(&self, category_id: &ID) -> Option<CourseCategory>;
    /// Courses directly in the category, or in its whole subtree when
    /// `recursive` is set.
    async fn find_descendant_courses(
        &self,
        category_id: &ID,
        recursive: bool,
    ) -> anyhow::Result<Vec<Course>>;
    async fn find_group(&self, group_id: &ID) -> Option<CourseGroup>;
    /// Looks up an activity instance by module type and instance id, with an
    /// optional course check.
    async fn find_module(
        &self,
        module_name: &str,
        instance_id: &ID,
        course_id: Option<&ID>,
    ) -> Option<CourseModule>;
}
