use super::content::ContentHandlers;
use super::dispatch::dispatch_reminder;
use super::lead_time::LeadTier;
use super::recipients::{resolve_event_reminder, CallMode};
use super::render::{sender_name, RenderContext};
use crate::shared::usecase::UseCase;
use coursebell_domain::{ChangeKind, OverdueSendMarker, DAY_SECS};
use coursebell_infra::ReminderContext;
use tracing::{debug, info, warn};

/// The secondary overdue pipeline: finds deadline events that passed within
/// the last day, sends a one-time overdue notice to the activity audience,
/// and records a marker so the event is never revisited. Independent of the
/// scheduled cycle's scan window.
#[derive(Debug)]
pub struct ScanOverdueUseCase;

#[derive(Debug, thiserror::Error)]
pub enum UseCaseErrors {
    #[error("storage unavailable: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Default)]
pub struct OverdueSummary {
    pub candidates: usize,
    /// Events that got an overdue notice this run.
    pub notified_events: usize,
    pub sent: usize,
    pub failed: usize,
}

#[async_trait::async_trait]
impl UseCase for ScanOverdueUseCase {
    type Response = OverdueSummary;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendOverdueReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors> {
        let config = ctx.repos.settings.get().await;
        if !config.enabled || !config.overdue.enabled {
            info!("Overdue cycle skipped, overdue reminders are not enabled");
            return Ok(OverdueSummary::default());
        }

        let now = ctx.sys.now();
        let events = ctx
            .repos
            .events
            .find_passed_deadlines(now - DAY_SECS, now)
            .await?;

        let handlers = ContentHandlers::standard();
        let rcx = RenderContext {
            now,
            calendar_url: &ctx.config.calendar_url,
            site_timezone: ctx.config.site_timezone,
            subject_prefix: &config.subject_prefix,
            from_name: sender_name(&config),
            handlers: &handlers,
        };

        let mut summary = OverdueSummary {
            candidates: events.len(),
            ..Default::default()
        };

        for event in &events {
            if ctx.repos.overdue_markers.find(&event.id).await.is_some() {
                debug!("Event {} already got its overdue notice", event.id);
                continue;
            }

            let reminder = match resolve_event_reminder(
                event,
                LeadTier::Days(0),
                Some(ChangeKind::Overdue),
                &config,
                ctx,
                CallMode::Overdue,
                now,
            )
            .await
            {
                Ok(reminder) => reminder,
                Err(e) => {
                    // Resolution errors leave the event unmarked so the next
                    // run inside the one-day horizon can retry it.
                    warn!(
                        "Error while resolving overdue recipients for event {}: {:?}",
                        event.id, e
                    );
                    continue;
                }
            };

            if let Some(reminder) = reminder {
                if !reminder.recipients.is_empty() {
                    let outcome = dispatch_reminder(reminder, &rcx, ctx).await;
                    summary.sent += outcome.sent;
                    summary.failed += outcome.failed;
                    summary.notified_events += 1;
                }
            }

            // One overdue pass per event, no matter how the sends went.
            ctx.repos
                .overdue_markers
                .insert(&OverdueSendMarker {
                    event_id: event.id.clone(),
                    sent_at: now,
                })
                .await?;
        }

        info!(
            "Overdue scan done: {} candidates, {} events notified, {} sent, {} failed",
            summary.candidates, summary.notified_events, summary.sent, summary.failed
        );
        Ok(summary)
    }
}
