use super::recipients::ReminderRef;
use super::render::RenderContext;
use coursebell_infra::ReminderContext;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchOutcome {
    pub sent: usize,
    pub failed: usize,
}

impl DispatchOutcome {
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

/// Sends one event's reminder to every resolved recipient. Each recipient is
/// an island: a transport failure is counted and the loop moves on, so one
/// broken mailbox never blocks the rest of the audience. Consumes the
/// `ReminderRef`, releasing the template and audience when done.
pub async fn dispatch_reminder(
    reminder: ReminderRef,
    rcx: &RenderContext<'_>,
    ctx: &ReminderContext,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();
    let event_id = reminder.template.event.id.clone();

    for recipient in &reminder.recipients {
        let message = reminder.template.render_for(recipient, rcx);
        match ctx.transport.send(&message).await {
            Ok(true) => outcome.sent += 1,
            Ok(false) => {
                outcome.failed += 1;
                warn!(
                    "Transport rejected reminder for event {} to user {}",
                    event_id, recipient.id
                );
            }
            Err(e) => {
                outcome.failed += 1;
                warn!(
                    "Could not send reminder for event {} to user {}: {:?}",
                    event_id, recipient.id, e
                );
            }
        }
    }

    if outcome.failed > 0 {
        warn!(
            "Failed to send {} of {} reminders for event {}",
            outcome.failed,
            outcome.attempted(),
            event_id
        );
    } else {
        debug!(
            "All {} reminders sent successfully for event {}",
            outcome.sent, event_id
        );
    }
    outcome
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminders::content::ContentHandlers;
    use crate::reminders::lead_time::LeadTier;
    use crate::reminders::render::{ReminderScope, ReminderTemplate};
    use chrono_tz::Tz;
    use coursebell_domain::{CalendarEvent, EventCategory, User};
    use coursebell_infra::InMemoryTransport;
    use std::sync::Arc;

    fn event() -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            category: EventCategory::Site,
            name: "Maintenance window".into(),
            description: String::new(),
            location: None,
            start_ts: 1_700_000_000,
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

    #[tokio::test]
    async fn one_failing_recipient_does_not_block_the_rest() {
        let transport = Arc::new(InMemoryTransport::new());
        let mut ctx = coursebell_infra::ReminderContext::create_inmemory();
        ctx.transport = transport.clone();

        transport.fail_for("b@example.org");

        let reminder = ReminderRef {
            template: ReminderTemplate {
                event: event(),
                scope: ReminderScope::Site,
                tier: LeadTier::Days(1),
                change: None,
            },
            recipients: vec![
                User::new("a@example.org"),
                User::new("b@example.org"),
                User::new("c@example.org"),
            ],
        };

        let handlers = ContentHandlers::standard();
        let rcx = RenderContext {
            now: 1_699_000_000,
            calendar_url: "http://localhost/calendar",
            site_timezone: Tz::UTC,
            subject_prefix: "Reminder",
            from_name: "No reply".into(),
            handlers: &handlers,
        };

        let outcome = dispatch_reminder(reminder, &rcx, &ctx).await;
        assert_eq!(outcome.sent, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(transport.sent_count(), 2);
    }
}
