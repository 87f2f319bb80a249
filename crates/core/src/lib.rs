mod job_schedulers;
pub mod reminders;
mod shared;

pub use job_schedulers::{get_start_delay, start_overdue_cycle_job, start_reminder_cycle_job};
pub use reminders::{run_overdue_cycle, run_reminder_cycle};
pub use shared::usecase::{execute, UseCase};
