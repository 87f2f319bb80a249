use super::content::ContentHandlers;
use super::dispatch::{dispatch_reminder, DispatchOutcome};
use super::lead_time::LeadTier;
use super::recipients::{resolve_event_reminder, CallMode};
use super::render::{sender_name, RenderContext};
use crate::shared::usecase::UseCase;
use coursebell_domain::{CalendarEvent, ChangeKind, DAY_SECS, ID};
use coursebell_infra::ReminderContext;
use tracing::{debug, info};

/// Immediate notice for a created/updated/removed calendar event, gated per
/// change type and per event category. Reuses the cycle's resolver and
/// renderer, with the ahead-days derived from the distance to the event.
#[derive(Debug)]
pub struct NotifyEventChangeUseCase {
    pub event_id: ID,
    pub change: ChangeKind,
    /// Snapshot of the event for removals, which are gone from the store by
    /// the time the notice runs.
    pub snapshot: Option<CalendarEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseErrors {
    #[error("event {0} was not found")]
    EventNotFound(ID),
    #[error("storage unavailable: {0}")]
    Storage(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for NotifyEventChangeUseCase {
    type Response = DispatchOutcome;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "NotifyCalendarEventChange";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors> {
        let config = ctx.repos.settings.get().await;
        if !config.enabled || !config.change_events.allows(self.change) {
            debug!("Change notices for {:?} are not enabled", self.change);
            return Ok(DispatchOutcome::default());
        }

        let event = match self.change {
            ChangeKind::Removed => self.snapshot.clone(),
            _ => ctx.repos.events.find(&self.event_id).await,
        }
        .ok_or_else(|| UseCaseErrors::EventNotFound(self.event_id.clone()))?;

        if !config.change_events.category_enabled(event.category) {
            debug!(
                "Change notices are not enabled for {} events",
                event.category
            );
            return Ok(DispatchOutcome::default());
        }

        let now = ctx.sys.now();
        let until_start = event.start_ts - now;
        if until_start < 0 {
            debug!("Event {} has already started, no change notice", event.id);
            return Ok(DispatchOutcome::default());
        }
        let tier = LeadTier::Days((until_start / DAY_SECS) as u32);

        let reminder = resolve_event_reminder(
            &event,
            tier,
            Some(self.change),
            &config,
            ctx,
            CallMode::Scheduled,
            now,
        )
        .await?;
        let Some(reminder) = reminder else {
            return Ok(DispatchOutcome::default());
        };
        if reminder.recipients.is_empty() {
            return Ok(DispatchOutcome::default());
        }

        let handlers = ContentHandlers::standard();
        let rcx = RenderContext {
            now,
            calendar_url: &ctx.config.calendar_url,
            site_timezone: ctx.config.site_timezone,
            subject_prefix: &config.subject_prefix,
            from_name: sender_name(&config),
            handlers: &handlers,
        };

        let outcome = dispatch_reminder(reminder, &rcx, ctx).await;
        info!(
            "Change notice for event {}: {} sent, {} failed",
            event.id, outcome.sent, outcome.failed
        );
        Ok(outcome)
    }
}
