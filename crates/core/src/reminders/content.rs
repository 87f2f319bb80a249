use coursebell_domain::{CalendarEvent, CourseModule};
use std::collections::HashMap;

/// Extra message content contributed by one module type. Handlers decide
/// which activity fields are safe to show at a given instant, e.g. an intro
/// text that stays hidden until the activity opens.
pub trait ActivityContentHandler: Send + Sync {
    /// Additional labeled timestamps to render as rows, in the recipient's
    /// timezone.
    fn extra_time_rows(&self, module: &CourseModule) -> Vec<(&'static str, i64)> {
        let _ = module;
        Vec::new()
    }

    /// The description line for the message, or `None` when nothing should
    /// be shown at `now`.
    fn description(&self, module: &CourseModule, event: &CalendarEvent, now: i64) -> Option<String>;
}

struct AssignContentHandler;

impl ActivityContentHandler for AssignContentHandler {
    fn extra_time_rows(&self, module: &CourseModule) -> Vec<(&'static str, i64)> {
        match module.cutoff_ts {
            Some(cutoff) if cutoff > 0 => vec![("Cut-off date", cutoff)],
            _ => Vec::new(),
        }
    }

    fn description(&self, module: &CourseModule, event: &CalendarEvent, now: i64) -> Option<String> {
        if module.always_show_intro || module.is_open(now) {
            Some(event.description.clone())
        } else {
            None
        }
    }
}

struct QuizContentHandler;

impl ActivityContentHandler for QuizContentHandler {
    fn description(&self, module: &CourseModule, _event: &CalendarEvent, now: i64) -> Option<String> {
        // The quiz intro stays hidden until the quiz has opened.
        match module.time_open {
            Some(open) if now > open => Some(module.intro.clone()),
            _ => None,
        }
    }
}

/// Registry mapping module type names to their content handler. Unknown
/// module types are a normal case and simply contribute no extra content.
pub struct ContentHandlers {
    handlers: HashMap<String, Box<dyn ActivityContentHandler>>,
}

impl ContentHandlers {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The built-in handler set.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("assign", Box::new(AssignContentHandler));
        registry.register("quiz", Box::new(QuizContentHandler));
        registry
    }

    pub fn register(&mut self, module_name: &str, handler: Box<dyn ActivityContentHandler>) {
        self.handlers.insert(module_name.to_string(), handler);
    }

    pub fn lookup(&self, module_name: &str) -> Option<&dyn ActivityContentHandler> {
        self.handlers.get(module_name).map(|h| h.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use coursebell_domain::EventCategory;

    fn module(module_name: &str) -> CourseModule {
        CourseModule {
            id: Default::default(),
            course_id: Default::default(),
            module_name: module_name.into(),
            instance_id: Default::default(),
            name: "Week 3".into(),
            intro: "The quiz covers chapters 1-3.".into(),
            time_open: None,
            cutoff_ts: None,
            always_show_intro: false,
        }
    }

    fn event() -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            category: EventCategory::Due,
            name: "Week 3".into(),
            description: "Submit before midnight.".into(),
            location: None,
            start_ts: 5000,
            duration: 0,
            visible: true,
            module_name: Some("assign".into()),
            instance_id: None,
            course_id: None,
            user_id: None,
            group_id: None,
            category_id: None,
        }
    }

    #[test]
    fn quiz_intro_hidden_until_open() {
        let registry = ContentHandlers::standard();
        let handler = registry.lookup("quiz").unwrap();

        let mut quiz = module("quiz");
        quiz.time_open = Some(1000);
        assert_eq!(handler.description(&quiz, &event(), 500), None);
        assert_eq!(
            handler.description(&quiz, &event(), 1500),
            Some("The quiz covers chapters 1-3.".into())
        );

        // A quiz without an opening time never reveals its intro here.
        quiz.time_open = None;
        assert_eq!(handler.description(&quiz, &event(), 1500), None);
    }

    #[test]
    fn assign_cutoff_row_and_intro_gating() {
        let registry = ContentHandlers::standard();
        let handler = registry.lookup("assign").unwrap();

        let mut assign = module("assign");
        assert!(handler.extra_time_rows(&assign).is_empty());

        assign.cutoff_ts = Some(9000);
        assert_eq!(handler.extra_time_rows(&assign), vec![("Cut-off date", 9000)]);

        assign.time_open = Some(2000);
        assert_eq!(handler.description(&assign, &event(), 1000), None);
        assert_eq!(
            handler.description(&assign, &event(), 3000),
            Some("Submit before midnight.".into())
        );

        assign.always_show_intro = true;
        assert!(handler.description(&assign, &event(), 1000).is_some());
    }

    #[test]
    fn unknown_module_types_have_no_handler() {
        let registry = ContentHandlers::standard();
        assert!(registry.lookup("workshop").is_none());
    }
}
