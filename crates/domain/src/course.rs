use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: ID,
    pub short_name: String,
    pub full_name: String,
    pub visible: bool,
    pub category_id: Option<ID>,
    /// Unix seconds at which the course ends, if an end date is set.
    pub end_ts: Option<i64>,
}

impl Course {
    /// Whether the course had already ended at the given instant. Courses
    /// without an end date never end.
    pub fn has_ended(&self, now: i64) -> bool {
        self.end_ts.map(|end| end < now).unwrap_or(false)
    }
}

impl Entity for Course {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// A node in the course category tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCategory {
    pub id: ID,
    pub name: String,
    pub parent_id: Option<ID>,
}

impl Entity for CourseCategory {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseGroup {
    pub id: ID,
    pub course_id: ID,
    pub name: String,
}

impl Entity for CourseGroup {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// An activity instance inside a course ("assign", "quiz", ...), flattened
/// together with the module-type fields the content handlers care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: ID,
    pub course_id: ID,
    /// Module type name, matching `CalendarEvent::module_name`.
    pub module_name: String,
    /// Id of the instance row inside the module-specific store.
    pub instance_id: ID,
    pub name: String,
    /// Introductory text shown to participants once the activity opens.
    pub intro: String,
    pub time_open: Option<i64>,
    pub cutoff_ts: Option<i64>,
    pub always_show_intro: bool,
}

impl CourseModule {
    /// The activity is open at `now` when no opening time is set or the
    /// opening time has passed.
    pub fn is_open(&self, now: i64) -> bool {
        self.time_open.map(|open| now > open).unwrap_or(true)
    }
}

impl Entity for CourseModule {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn course_end_date() {
        let mut course = Course {
            id: Default::default(),
            short_name: "HIST101".into(),
            full_name: "History 101".into(),
            visible: true,
            category_id: None,
            end_ts: None,
        };
        assert!(!course.has_ended(1000));

        course.end_ts = Some(500);
        assert!(course.has_ended(1000));
        assert!(!course.has_ended(400));
    }

    #[test]
    fn module_open_state() {
        let mut module = CourseModule {
            id: Default::default(),
            course_id: Default::default(),
            module_name: "quiz".into(),
            instance_id: Default::default(),
            name: "Week 3 quiz".into(),
            intro: String::new(),
            time_open: None,
            cutoff_ts: None,
            always_show_intro: false,
        };
        assert!(module.is_open(100));

        module.time_open = Some(200);
        assert!(!module.is_open(100));
        assert!(module.is_open(201));
    }
}
