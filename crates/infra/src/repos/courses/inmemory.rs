use super::ICourseRepo;
use crate::repos::shared::inmemory_repo::*;
use coursebell_domain::{Course, CourseCategory, CourseGroup, CourseModule, ID};
use std::sync::Mutex;

pub struct InMemoryCourseRepo {
    courses: Mutex<Vec<Course>>,
    categories: Mutex<Vec<CourseCategory>>,
    groups: Mutex<Vec<CourseGroup>>,
    modules: Mutex<Vec<CourseModule>>,
}

impl InMemoryCourseRepo {
    pub fn new() -> Self {
        Self {
            courses: Mutex::new(Vec::new()),
            categories: Mutex::new(Vec::new()),
            groups: Mutex::new(Vec::new()),
            modules: Mutex::new(Vec::new()),
        }
    }

    fn child_categories(&self, parent_id: &ID) -> Vec<ID> {
        find_by(&self.categories, |cat: &CourseCategory| {
            cat.parent_id.as_ref() == Some(parent_id)
        })
        .into_iter()
        .map(|cat| cat.id)
        .collect()
    }
}

impl Default for InMemoryCourseRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ICourseRepo for InMemoryCourseRepo {
    async fn insert(&self, course: &Course) -> anyhow::Result<()> {
        upsert(course, &self.courses);
        Ok(())
    }

    async fn insert_category(&self, category: &CourseCategory) -> anyhow::Result<()> {
        upsert(category, &self.categories);
        Ok(())
    }

    async fn insert_group(&self, group: &CourseGroup) -> anyhow::Result<()> {
        upsert(group, &self.groups);
        Ok(())
    }

    async fn insert_module(&self, module: &CourseModule) -> anyhow::Result<()> {
        upsert(module, &self.modules);
        Ok(())
    }

    async fn find(&self, course_id: &ID) -> Option<Course> {
        find(course_id, &self.courses)
    }

    async fn find_category(&self, category_id: &ID) -> Option<CourseCategory> {
        find(category_id, &self.categories)
    }

    async fn find_descendant_courses(
        &self,
        category_id: &ID,
        recursive: bool,
    ) -> anyhow::Result<Vec<Course>> {
        let mut category_ids = vec![category_id.clone()];
        if recursive {
            // Walk the whole category subtree.
            let mut frontier = vec![category_id.clone()];
            while let Some(current) = frontier.pop() {
                for child in self.child_categories(&current) {
                    if !category_ids.contains(&child) {
                        category_ids.push(child.clone());
                        frontier.push(child);
                    }
                }
            }
        }
        Ok(find_by(&self.courses, |course: &Course| {
            course
                .category_id
                .as_ref()
                .map(|id| category_ids.contains(id))
                .unwrap_or(false)
        }))
    }

    async fn find_group(&self, group_id: &ID) -> Option<CourseGroup> {
        find(group_id, &self.groups)
    }

    async fn find_module(
        &self,
        module_name: &str,
        instance_id: &ID,
        course_id: Option<&ID>,
    ) -> Option<CourseModule> {
        find_by(&self.modules, |module: &CourseModule| {
            module.module_name == module_name
                && module.instance_id == *instance_id
                && course_id.map(|c| module.course_id == *c).unwrap_or(true)
        })
        .into_iter()
        .next()
    }
}
