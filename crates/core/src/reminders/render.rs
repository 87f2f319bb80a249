use super::content::ContentHandlers;
use super::lead_time::LeadTier;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use coursebell_domain::{
    CalendarEvent, ChangeKind, Course, CourseCategory, CourseGroup, CourseModule, ReminderConfig,
    RenderedMessage, SenderIdentity, User,
};

const TABLE_STYLE: &str =
    "width:100%;font-family:Tahoma,Arial,Sans-serif;border-width:1px 2px 2px 1px;border:1px Solid #ccc";
const TITLE_STYLE: &str =
    "padding:0 0 6px 0;margin:0;font-family:Arial,Sans-serif;font-size:16px;font-weight:bold;color:#222";
const FOOTER_STYLE: &str =
    "background-color:#f6f6f6;color:#888;border-top:1px Solid #ccc;font-family:Arial,Sans-serif;font-size:11px";
const LABEL_STYLE: &str = "width:25%;font-weight:bold;color:#555";

/// What the reminder is about, with the context records the message rows
/// need. Resolved once per event by the recipient resolver.
#[derive(Debug, Clone)]
pub enum ReminderScope {
    Site,
    User(User),
    Course(Course),
    Activity {
        course: Course,
        module: CourseModule,
    },
    Group {
        group: CourseGroup,
        course: Option<Course>,
        module: Option<CourseModule>,
    },
    Category(CourseCategory),
}

/// The immutable recipient-agnostic message skeleton. A fresh
/// `RenderedMessage` is produced per recipient, so timezone-dependent
/// strings never leak between users and per-recipient dispatch could run
/// concurrently without sharing mutable state.
#[derive(Debug, Clone)]
pub struct ReminderTemplate {
    pub event: CalendarEvent,
    pub scope: ReminderScope,
    pub tier: LeadTier,
    pub change: Option<ChangeKind>,
}

/// Rendering inputs shared by every template of one cycle.
pub struct RenderContext<'a> {
    pub now: i64,
    pub calendar_url: &'a str,
    pub site_timezone: Tz,
    pub subject_prefix: &'a str,
    pub from_name: String,
    pub handlers: &'a ContentHandlers,
}

/// Display name of the configured sending identity.
pub fn sender_name(config: &ReminderConfig) -> String {
    match &config.send_as_name {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => match config.sender {
            SenderIdentity::NoReply => "No reply".to_string(),
            SenderIdentity::Admin => "Administrator".to_string(),
        },
    }
}

impl ReminderTemplate {
    pub fn title(&self) -> String {
        match &self.scope {
            ReminderScope::Site | ReminderScope::User(_) => self.event.name.clone(),
            ReminderScope::Course(course) => {
                format!("({}) {}", course.short_name, self.event.name)
            }
            ReminderScope::Activity { course, module } => format!(
                "({}-{}) {}",
                course.short_name, module.module_name, self.event.name
            ),
            ReminderScope::Group { group, .. } => format!("({}) {}", group.name, self.event.name),
            ReminderScope::Category(category) => {
                format!("({}) {}", category.name, self.event.name)
            }
        }
    }

    /// Title with the change tag prefixed, e.g. `[OVERDUE]: (C1-assign) ...`.
    fn tagged_title(&self) -> String {
        match self.change {
            Some(change) => format!("[{}]: {}", change.tag(), self.title()),
            None => self.title(),
        }
    }

    fn subject(&self, prefix: &str) -> String {
        format!("[{}] {}", prefix, self.tagged_title())
    }

    fn event_link(&self, calendar_url: &str) -> String {
        format!(
            "{}/day?ts={}#event-{}",
            calendar_url, self.event.start_ts, self.event.id
        )
    }

    fn custom_headers(&self, host: &str) -> Vec<String> {
        let mut headers = vec![format!("Message-ID: <reminder{}@{}>", self.event.id, host)];
        if let ReminderScope::Activity { module, .. } = &self.scope {
            headers.push(format!("X-Activity-Id: {}", module.id));
            headers.push(format!("X-Activity-Name: {}", module.name));
        }
        headers
    }

    fn description(&self, rcx: &RenderContext<'_>) -> Option<String> {
        match &self.scope {
            // Activity content handlers decide whether the description may
            // be shown yet; unknown module types show nothing extra.
            ReminderScope::Activity { module, .. } => rcx
                .handlers
                .lookup(&module.module_name)
                .and_then(|handler| handler.description(module, &self.event, rcx.now)),
            _ => {
                let description = self.event.description.trim();
                (!description.is_empty()).then(|| description.to_string())
            }
        }
    }

    /// Builds the message rows in the given timezone. Shared between the
    /// HTML and plain-text renderings of one recipient.
    fn rows(&self, tz: Tz, rcx: &RenderContext<'_>) -> Vec<(String, String)> {
        let mut rows = vec![(
            "When".to_string(),
            format_event_time_duration(&self.event, tz),
        )];
        if let Some(location) = self.event.location.as_deref() {
            if !location.trim().is_empty() {
                rows.push(("Location".to_string(), location.trim().to_string()));
            }
        }
        match &self.scope {
            ReminderScope::Site => {}
            ReminderScope::User(user) => rows.push(("User".to_string(), user.full_name())),
            ReminderScope::Course(course) => {
                rows.push(("Course".to_string(), course.full_name.clone()))
            }
            ReminderScope::Activity { course, module } => {
                rows.push(("Course".to_string(), course.full_name.clone()));
                rows.push(("Activity".to_string(), module.name.clone()));
                if let Some(handler) = rcx.handlers.lookup(&module.module_name) {
                    for (label, ts) in handler.extra_time_rows(module) {
                        rows.push((label.to_string(), format_datetime(ts, tz)));
                    }
                }
            }
            ReminderScope::Group {
                group,
                course,
                module,
            } => {
                if let Some(course) = course {
                    rows.push(("Course".to_string(), course.full_name.clone()));
                }
                rows.push(("Group".to_string(), group.name.clone()));
                if let Some(module) = module {
                    rows.push(("Activity".to_string(), module.name.clone()));
                }
            }
            ReminderScope::Category(category) => {
                rows.push(("Course category".to_string(), category.name.clone()))
            }
        }
        rows
    }

    /// Produces the per-recipient message: the recipient's timezone is
    /// applied to every time string and the body is rebuilt from scratch.
    pub fn render_for(&self, recipient: &User, rcx: &RenderContext<'_>) -> RenderedMessage {
        let tz = recipient.timezone.unwrap_or(rcx.site_timezone);
        let rows = self.rows(tz, rcx);
        let description = self.description(rcx);
        let overdue = self.change == Some(ChangeKind::Overdue);

        RenderedMessage {
            event_id: self.event.id.clone(),
            recipient_id: recipient.id.clone(),
            recipient_email: recipient.email.clone(),
            from_name: rcx.from_name.clone(),
            subject: self.subject(rcx.subject_prefix),
            html_body: self.html_body(rcx, &rows, description.as_deref(), overdue),
            plain_body: self.plain_body(&rows, description.as_deref(), overdue),
            headers: self.custom_headers(&host_of(rcx.calendar_url)),
        }
    }

    fn html_body(
        &self,
        rcx: &RenderContext<'_>,
        rows: &[(String, String)],
        description: Option<&str>,
        overdue: bool,
    ) -> String {
        let mut html = String::from("<html><head></head><body id=\"email\"><div>");
        html.push_str(&format!(
            "<table cellspacing=\"0\" cellpadding=\"8\" style=\"{}\">",
            TABLE_STYLE
        ));
        html.push_str(&format!(
            "<tr><td colspan=\"2\"><a href=\"{}\" style=\"text-decoration:none\"><h3 style=\"{}\">{}</h3></a></td></tr>",
            self.event_link(rcx.calendar_url),
            TITLE_STYLE,
            escape(&self.tagged_title())
        ));
        if overdue {
            html.push_str("<tr><td colspan=\"2\">This activity is overdue!</td></tr>");
        }
        for (label, value) in rows {
            html.push_str(&format!(
                "<tr><td style=\"{}\">{}</td><td>{}</td></tr>",
                LABEL_STYLE,
                escape(label),
                escape(value)
            ));
        }
        if let Some(description) = description {
            html.push_str(&format!(
                "<tr><td style=\"{}\">Description</td><td>{}</td></tr>",
                LABEL_STYLE,
                escape(description)
            ));
        }
        html.push_str(&format!(
            "<tr><td colspan=\"2\" style=\"{}\">Reminder from the <a target=\"_blank\" href=\"{}\">course calendar</a></td></tr>",
            FOOTER_STYLE, rcx.calendar_url
        ));
        html.push_str("</table></div></body></html>");
        html
    }

    fn plain_body(
        &self,
        rows: &[(String, String)],
        description: Option<&str>,
        overdue: bool,
    ) -> String {
        let mut text = if overdue {
            format!("{}\nThis activity is overdue!\n", self.tagged_title())
        } else {
            format!(
                "{} [{} day(s) to go]\n",
                self.tagged_title(),
                self.tier.days_label()
            )
        };
        for (label, value) in rows {
            text.push_str(&format!("{}: {}\n", label, value));
        }
        if let Some(description) = description {
            text.push_str(&format!("Description: {}\n", description));
        }
        text
    }
}

fn local_time(ts: i64, tz: Tz) -> DateTime<Tz> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or_default()
        .with_timezone(&tz)
}

fn format_datetime(ts: i64, tz: Tz) -> String {
    let dt = local_time(ts, tz);
    format!(
        "{} {} {}",
        dt.format("%A, %B %e, %Y"),
        dt.format("%l:%M %p").to_string().trim(),
        tz.name()
    )
}

/// Formats the event time in the given timezone. Events with a duration get
/// a `start - end` range; a compact form is used when both ends fall on the
/// same local day.
fn format_event_time_duration(event: &CalendarEvent, tz: Tz) -> String {
    let day_fmt = "%A, %B %e, %Y";
    let time_fmt = "%l:%M %p";

    let start = local_time(event.start_ts, tz);
    let day_prefix = start.format(day_fmt).to_string();
    let start_time = start.format(time_fmt).to_string().trim().to_string();

    let times = if event.duration > 0 {
        let end = local_time(event.end_ts(), tz);
        let end_time = end.format(time_fmt).to_string().trim().to_string();
        if start.date_naive() == end.date_naive() {
            format!("[{} - {}]", start_time, end_time)
        } else {
            format!("{} - {} {}", start_time, end.format(day_fmt), end_time)
        }
    } else {
        start_time
    };

    format!("{} {} {}", day_prefix, times, tz.name())
}

fn host_of(calendar_url: &str) -> String {
    url::Url::parse(calendar_url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| "localhost".to_string())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod test {
    use super::*;
    use coursebell_domain::{EventCategory, DAY_SECS};

    fn course() -> Course {
        Course {
            id: Default::default(),
            short_name: "HIST101".into(),
            full_name: "History 101".into(),
            visible: true,
            category_id: None,
            end_ts: None,
        }
    }

    fn module() -> CourseModule {
        CourseModule {
            id: Default::default(),
            course_id: Default::default(),
            module_name: "assign".into(),
            instance_id: Default::default(),
            name: "Essay 1".into(),
            intro: String::new(),
            time_open: None,
            cutoff_ts: None,
            always_show_intro: false,
        }
    }

    fn event() -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            category: EventCategory::Due,
            name: "Essay submission".into(),
            description: "Submit as PDF.".into(),
            location: None,
            start_ts: 1_700_000_000,
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

    fn recipient(tz: Option<Tz>) -> User {
        let mut user = User::new("student@example.org");
        user.first_name = "Ada".into();
        user.last_name = "Lovelace".into();
        user.timezone = tz;
        user
    }

    fn render_ctx<'a>(handlers: &'a ContentHandlers) -> RenderContext<'a> {
        RenderContext {
            now: 1_699_000_000,
            calendar_url: "http://campus.example.org/calendar",
            site_timezone: Tz::UTC,
            subject_prefix: "Reminder",
            from_name: "No reply".into(),
            handlers,
        }
    }

    fn activity_template() -> ReminderTemplate {
        ReminderTemplate {
            event: event(),
            scope: ReminderScope::Activity {
                course: course(),
                module: module(),
            },
            tier: LeadTier::Days(3),
            change: None,
        }
    }

    #[test]
    fn activity_title_and_subject() {
        let handlers = ContentHandlers::standard();
        let template = activity_template();
        assert_eq!(template.title(), "(HIST101-assign) Essay submission");

        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert_eq!(message.subject, "[Reminder] (HIST101-assign) Essay submission");
        assert!(message.plain_body.starts_with("(HIST101-assign) Essay submission [3 day(s) to go]"));
        assert!(message.html_body.contains("History 101"));
        assert!(message.html_body.contains("Essay 1"));
    }

    #[test]
    fn overdue_message_is_tagged() {
        let handlers = ContentHandlers::standard();
        let mut template = activity_template();
        template.change = Some(ChangeKind::Overdue);

        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert!(message.subject.contains("[OVERDUE]:"));
        assert!(message.plain_body.contains("This activity is overdue!"));
        assert!(!message.plain_body.contains("day(s) to go"));
    }

    #[test]
    fn when_row_follows_recipient_timezone() {
        let handlers = ContentHandlers::standard();
        let template = activity_template();
        let rcx = render_ctx(&handlers);

        let utc = template.render_for(&recipient(None), &rcx);
        let oslo = template.render_for(&recipient(Some(chrono_tz::Europe::Oslo)), &rcx);
        assert_ne!(utc.plain_body, oslo.plain_body);
        assert!(oslo.plain_body.contains("Europe/Oslo"));
        assert!(utc.plain_body.contains("UTC"));
    }

    #[test]
    fn same_day_duration_uses_compact_range() {
        let handlers = ContentHandlers::standard();
        let mut template = activity_template();
        // Starts 10:00 UTC, runs 2 hours, so both ends share the local day.
        template.event.start_ts = 1_699_956_000;
        template.event.duration = 2 * 3600;

        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert!(message.plain_body.contains("] UTC"));
        assert!(message.plain_body.contains(" - "));

        // Spanning midnight drops the compact form.
        template.event.duration = 2 * DAY_SECS;
        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert!(!message.plain_body.contains("] UTC"));
        assert!(message.plain_body.contains(" - "));
    }

    #[test]
    fn message_id_header_uses_calendar_host() {
        let handlers = ContentHandlers::standard();
        let template = activity_template();
        let message = template.render_for(&recipient(None), &render_ctx(&handlers));

        assert!(message.headers[0].starts_with("Message-ID: <reminder"));
        assert!(message.headers[0].ends_with("@campus.example.org>"));
        assert!(message
            .headers
            .iter()
            .any(|h| h.starts_with("X-Activity-Name: Essay 1")));
    }

    #[test]
    fn cutoff_row_rendered_for_assignments() {
        let handlers = ContentHandlers::standard();
        let mut template = activity_template();
        if let ReminderScope::Activity { module, .. } = &mut template.scope {
            module.cutoff_ts = Some(1_700_500_000);
        }

        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert!(message.plain_body.contains("Cut-off date: "));
    }

    #[test]
    fn group_scope_rows() {
        let handlers = ContentHandlers::standard();
        let group = CourseGroup {
            id: Default::default(),
            course_id: Default::default(),
            name: "Lab group B".into(),
        };
        let template = ReminderTemplate {
            event: event(),
            scope: ReminderScope::Group {
                group,
                course: Some(course()),
                module: None,
            },
            tier: LeadTier::Days(1),
            change: None,
        };

        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert!(message.plain_body.contains("Group: Lab group B"));
        assert!(message.plain_body.contains("Course: History 101"));
        assert_eq!(template.title(), "(Lab group B) Essay submission");
    }

    #[test]
    fn assign_description_gated_by_opening_time() {
        let handlers = ContentHandlers::standard();
        let mut template = activity_template();
        if let ReminderScope::Activity { module, .. } = &mut template.scope {
            // Opens only after the rendering instant.
            module.time_open = Some(1_699_500_000);
        }

        let message = template.render_for(&recipient(None), &render_ctx(&handlers));
        assert!(!message.plain_body.contains("Submit as PDF."));
    }
}
