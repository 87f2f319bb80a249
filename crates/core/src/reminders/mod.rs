pub mod content;
mod dispatch;
mod event_changed;
mod lead_time;
mod overdue;
mod recipients;
mod render;
mod select_events;
mod send_reminders;
mod window;

pub use dispatch::DispatchOutcome;
pub use event_changed::NotifyEventChangeUseCase;
pub use lead_time::{resolve_tier, LeadTier};
pub use overdue::{OverdueSummary, ScanOverdueUseCase};
pub use recipients::{resolve_event_reminder, CallMode, ReminderRef};
pub use render::{sender_name, ReminderScope, ReminderTemplate, RenderContext};
pub use select_events::select_candidate_events;
pub use send_reminders::{CycleSummary, SendRemindersUseCase};

use crate::shared::usecase::execute;
use coursebell_infra::ReminderContext;

/// Entry point for the periodic scheduled-reminder trigger. Fire and
/// forget: outcomes surface through logging and the scan log only.
pub async fn run_reminder_cycle(ctx: &ReminderContext) {
    let _ = execute(SendRemindersUseCase, ctx).await;
}

/// Entry point for the periodic overdue follow-up trigger.
pub async fn run_overdue_cycle(ctx: &ReminderContext) {
    let _ = execute(ScanOverdueUseCase, ctx).await;
}
