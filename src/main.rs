mod telemetry;

use coursebell_core::{start_overdue_cycle_job, start_reminder_cycle_job};
use coursebell_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() {
    let subscriber = get_subscriber("coursebell".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .expect("database migrations should apply");

    let context = setup_context().await;

    start_reminder_cycle_job(context.clone());
    start_overdue_cycle_job(context);

    info!("Reminder jobs started");
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    info!("Shutting down");
}
