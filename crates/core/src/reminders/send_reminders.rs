use super::content::ContentHandlers;
use super::dispatch::dispatch_reminder;
use super::lead_time::resolve_tier;
use super::recipients::{resolve_event_reminder, CallMode};
use super::render::{sender_name, RenderContext};
use super::{select_events, window};
use crate::shared::usecase::UseCase;
use coursebell_domain::{ScanOutcome, ScanWindow};
use coursebell_infra::ReminderContext;
use tracing::{debug, info, warn};

/// The scheduled reminder cycle: compute the window, select candidate
/// events, resolve a lead tier and audience per event, render and dispatch,
/// then commit the window end as the next cycle's cutoff.
#[derive(Debug)]
pub struct SendRemindersUseCase;

#[derive(Debug, thiserror::Error)]
pub enum UseCaseErrors {
    #[error("storage unavailable: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Default)]
pub struct CycleSummary {
    /// The processed window; unset when the engine is disabled.
    pub window: Option<ScanWindow>,
    pub candidates: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub committed: bool,
}

#[async_trait::async_trait]
impl UseCase for SendRemindersUseCase {
    type Response = CycleSummary;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendScheduledReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors> {
        let config = ctx.repos.settings.get().await;
        if !config.enabled {
            info!("This reminder cycle will be skipped, the engine is not enabled");
            return Ok(CycleSummary::default());
        }

        let now = ctx.sys.now();
        let window = window::next_window(now, &config, ctx).await;
        info!("Scan window: {} to {}", window.start, window.end);

        let events = select_events::select_candidate_events(&window, &config, ctx).await?;
        if events.is_empty() {
            info!("No upcoming events in the window");
            window::commit(&window, ScanOutcome::NoEvents, ctx).await?;
            return Ok(CycleSummary {
                window: Some(window),
                committed: true,
                ..Default::default()
            });
        }
        info!("Found {} upcoming events, continuing", events.len());

        let handlers = ContentHandlers::standard();
        let rcx = RenderContext {
            now,
            calendar_url: &ctx.config.calendar_url,
            site_timezone: ctx.config.site_timezone,
            subject_prefix: &config.subject_prefix,
            from_name: sender_name(&config),
            handlers: &handlers,
        };

        let mut summary = CycleSummary {
            window: Some(window),
            candidates: events.len(),
            ..Default::default()
        };
        // An event with at least one accepted send marks the whole cycle as
        // committable.
        let mut any_event_succeeded = false;

        for event in &events {
            let Some(tier) = resolve_tier(event, &window, &config) else {
                debug!("No lead tier fires for event {} this cycle", event.id);
                summary.skipped += 1;
                continue;
            };
            debug!(
                "Processing event {} [type: {}, ahead: {} day(s)]",
                event.id,
                event.category,
                tier.days_label()
            );

            let reminder = match resolve_event_reminder(
                event,
                tier,
                None,
                &config,
                ctx,
                CallMode::Scheduled,
                now,
            )
            .await
            {
                Ok(Some(reminder)) => reminder,
                Ok(None) => {
                    debug!(
                        "Reminder is not available for event {} [type: {}]",
                        event.id, event.category
                    );
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    // One bad event never takes the cycle down.
                    warn!(
                        "Error while resolving recipients for event {} [type: {}]: {:?}",
                        event.id, event.category, e
                    );
                    summary.skipped += 1;
                    continue;
                }
            };
            if reminder.recipients.is_empty() {
                debug!("No users found to send reminder for event {}", event.id);
                summary.skipped += 1;
                continue;
            }

            let outcome = dispatch_reminder(reminder, &rcx, ctx).await;
            if outcome.sent > 0 {
                any_event_succeeded = true;
            }
            summary.sent += outcome.sent;
            summary.failed += outcome.failed;
        }

        if any_event_succeeded {
            window::commit(&window, ScanOutcome::Sent, ctx).await?;
            summary.committed = true;
            info!(
                "Cycle committed: {} sent, {} failed, {} skipped",
                summary.sent, summary.failed, summary.skipped
            );
        } else {
            warn!("No reminder could be delivered this cycle, the window will be retried");
        }
        Ok(summary)
    }
}
