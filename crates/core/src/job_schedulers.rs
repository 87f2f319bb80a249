use crate::reminders::{run_overdue_cycle, run_reminder_cycle};
use coursebell_infra::ReminderContext;
use std::time::Duration;
use tokio::time::{interval, sleep};

/// Seconds until the next minute boundary, shifted `secs_before_min`
/// seconds earlier so a cycle can line up slightly ahead of the minute.
pub fn get_start_delay(now_ts: u64, secs_before_min: u64) -> u64 {
    let secs_to_next_minute = 60 - now_ts % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Spawns the periodic scheduled-reminder job. The first run is aligned to
/// a minute boundary, further runs follow the configured interval.
pub fn start_reminder_cycle_job(ctx: ReminderContext) {
    tokio::spawn(async move {
        let delay = get_start_delay(ctx.sys.now() as u64, 0);
        sleep(Duration::from_secs(delay)).await;

        let mut cycle_interval = interval(Duration::from_secs(ctx.config.cycle_interval_secs));
        loop {
            cycle_interval.tick().await;
            run_reminder_cycle(&ctx).await;
        }
    });
}

/// Spawns the independent overdue follow-up job.
pub fn start_overdue_cycle_job(ctx: ReminderContext) {
    tokio::spawn(async move {
        let delay = get_start_delay(ctx.sys.now() as u64, 0);
        sleep(Duration::from_secs(delay)).await;

        let mut cycle_interval = interval(Duration::from_secs(ctx.config.overdue_interval_secs));
        loop {
            cycle_interval.tick().await;
            run_overdue_cycle(&ctx).await;
        }
    });
}
