#![allow(dead_code)]

use coursebell_domain::{
    CalendarEvent, Course, CourseCategory, CourseGroup, CourseModule, EventCategory,
    ReminderConfig, User, ID,
};
use coursebell_infra::{ISys, InMemoryTransport, ReminderContext};
use std::sync::Arc;

pub struct StaticTimeSys(pub i64);

impl ISys for StaticTimeSys {
    fn now(&self) -> i64 {
        self.0
    }
}

/// An in-memory engine instance with direct handles to the pieces the tests
/// assert on.
pub struct TestApp {
    pub ctx: ReminderContext,
    pub transport: Arc<InMemoryTransport>,
}

pub fn spawn_app(now: i64) -> TestApp {
    let transport = Arc::new(InMemoryTransport::new());
    let mut ctx = ReminderContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys(now));
    ctx.transport = transport.clone();
    TestApp { ctx, transport }
}

impl TestApp {
    pub fn set_now(&mut self, now: i64) {
        self.ctx.sys = Arc::new(StaticTimeSys(now));
    }

    pub async fn save_config(&self, config: &ReminderConfig) {
        self.ctx.repos.settings.save(config).await.unwrap();
    }

    /// Inserts a confirmed user enrolled in the course with the given role.
    pub async fn enrol_user(&self, email: &str, role_id: &ID, course_id: &ID, active: bool) -> User {
        let user = User::new(email);
        self.ctx.repos.directory.insert(&user).await.unwrap();
        self.ctx
            .repos
            .directory
            .assign_role(&user.id, role_id, course_id)
            .await
            .unwrap();
        self.ctx
            .repos
            .directory
            .set_enrolment(&user.id, course_id, active)
            .await
            .unwrap();
        user
    }
}

pub fn course(short_name: &str) -> Course {
    Course {
        id: ID::new(),
        short_name: short_name.to_string(),
        full_name: format!("{} (full)", short_name),
        visible: true,
        category_id: None,
        end_ts: None,
    }
}

pub fn category(name: &str) -> CourseCategory {
    CourseCategory {
        id: ID::new(),
        name: name.to_string(),
        parent_id: None,
    }
}

pub fn group(course_id: &ID, name: &str) -> CourseGroup {
    CourseGroup {
        id: ID::new(),
        course_id: course_id.clone(),
        name: name.to_string(),
    }
}

pub fn assign_module(course_id: &ID, name: &str) -> CourseModule {
    CourseModule {
        id: ID::new(),
        course_id: course_id.clone(),
        module_name: "assign".to_string(),
        instance_id: ID::new(),
        name: name.to_string(),
        intro: String::new(),
        time_open: None,
        cutoff_ts: None,
        always_show_intro: true,
    }
}

pub fn event(category: EventCategory, name: &str, start_ts: i64) -> CalendarEvent {
    CalendarEvent {
        id: ID::new(),
        category,
        name: name.to_string(),
        description: String::new(),
        location: None,
        start_ts,
        duration: 0,
        visible: true,
        module_name: None,
        instance_id: None,
        course_id: None,
        user_id: None,
        group_id: None,
        category_id: None,
    }
}

pub fn course_event(course_id: &ID, name: &str, start_ts: i64) -> CalendarEvent {
    CalendarEvent {
        course_id: Some(course_id.clone()),
        ..event(EventCategory::Course, name, start_ts)
    }
}

pub fn activity_event(module: &CourseModule, name: &str, start_ts: i64) -> CalendarEvent {
    CalendarEvent {
        module_name: Some(module.module_name.clone()),
        instance_id: Some(module.instance_id.clone()),
        course_id: Some(module.course_id.clone()),
        ..event(EventCategory::Due, name, start_ts)
    }
}
