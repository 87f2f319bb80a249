mod inmemory;
mod postgres;

pub use inmemory::InMemoryCourseOverrideRepo;
pub use postgres::PostgresCourseOverrideRepo;

use coursebell_domain::{CourseOverride, ID};

/// Per-course reminder toggles. The reminder engine only reads them; the
/// upsert is for the course administration surface.
#[async_trait::async_trait]
pub trait ICourseOverrideRepo: Send + Sync {
    async fn find(&self, course_id: &ID) -> Option<CourseOverride>;
    async fn upsert(&self, value: &CourseOverride) -> anyhow::Result<()>;
}
