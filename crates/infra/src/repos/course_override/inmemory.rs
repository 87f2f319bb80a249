use super::ICourseOverrideRepo;
use coursebell_domain::{CourseOverride, ID};
use std::sync::Mutex;

pub struct InMemoryCourseOverrideRepo {
    overrides: Mutex<Vec<CourseOverride>>,
}

impl InMemoryCourseOverrideRepo {
    pub fn new() -> Self {
        Self {
            overrides: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryCourseOverrideRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ICourseOverrideRepo for InMemoryCourseOverrideRepo {
    async fn find(&self, course_id: &ID) -> Option<CourseOverride> {
        let overrides = self.overrides.lock().unwrap();
        overrides.iter().find(|o| o.course_id == *course_id).cloned()
    }

    async fn upsert(&self, value: &CourseOverride) -> anyhow::Result<()> {
        let mut overrides = self.overrides.lock().unwrap();
        for existing in overrides.iter_mut() {
            if existing.course_id == value.course_id {
                *existing = value.clone();
                return Ok(());
            }
        }
        overrides.push(value.clone());
        Ok(())
    }
}
