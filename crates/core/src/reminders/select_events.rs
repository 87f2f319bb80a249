use coursebell_domain::{CalendarEvent, EventFilterMode, ReminderConfig, ScanWindow, FIXED_LEAD_OFFSETS};
use coursebell_infra::{EventTimeQuery, ReminderContext};

/// Fetches every event with some lead offset landing inside the window, in
/// one query across all fixed tiers and custom schedules. Which tier
/// actually fires for an individual event is decided afterwards by the
/// lead-time resolver.
pub async fn select_candidate_events(
    window: &ScanWindow,
    config: &ReminderConfig,
    ctx: &ReminderContext,
) -> anyhow::Result<Vec<CalendarEvent>> {
    let mut lead_offsets = FIXED_LEAD_OFFSETS.to_vec();
    lead_offsets.extend(config.custom_lead_offsets());

    let query = EventTimeQuery {
        window: *window,
        lead_offsets,
        only_visible: config.filter_mode == EventFilterMode::OnlyVisible,
    };
    ctx.repos.events.find_due_for_reminder(&query).await
}
