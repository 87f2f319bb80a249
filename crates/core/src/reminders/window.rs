use coursebell_domain::{ReminderConfig, ScanLogRecord, ScanOutcome, ScanWindow, DAY_SECS};
use coursebell_infra::ReminderContext;
use tracing::info;

/// Computes the window the next cycle is responsible for. Starts right after
/// the last committed cycle; the very first cycle reaches back by the
/// bootstrap grace period instead, so events scheduled before installation
/// are not missed.
pub async fn next_window(now: i64, config: &ReminderConfig, ctx: &ReminderContext) -> ScanWindow {
    match ctx.repos.scan_log.find_latest().await {
        Some(record) => ScanWindow {
            start: record.time + 1,
            end: now,
        },
        None => {
            info!("This is the first reminder cycle");
            ScanWindow {
                start: now - config.first_cycle_cutoff_days * DAY_SECS,
                end: now,
            }
        }
    }
}

/// Marks the window as done. Only called after the cycle either delivered at
/// least one event's reminders or confirmed the absence of matching events;
/// an uncommitted window is reprocessed in full by the next cycle.
pub async fn commit(window: &ScanWindow, outcome: ScanOutcome, ctx: &ReminderContext) -> anyhow::Result<()> {
    ctx.repos
        .scan_log
        .insert(&ScanLogRecord {
            time: window.end,
            outcome,
        })
        .await
}
