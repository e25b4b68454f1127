//! Billing daemon: fires the monthly fee run at 00:00 on the first of every
//! month and logs a dashboard snapshot after each run. `--run-now` triggers a
//! single run immediately instead, for manual billing.

use chrono::NaiveDate;
use hostel_ledger_config::{get_config, ConfigError};
use hostel_ledger_core::{
    next_cycle_start, BillingScheduler, Clock, FeeSchedule, LedgerError, ReportingAggregator,
    SystemClock,
};
use hostel_ledger_database::error::DatabaseError;
use hostel_ledger_database::{get_database_connection, PgStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum BillingdError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

async fn run_billing(
    scheduler: &BillingScheduler<PgStore, SystemClock>,
    reporting: &ReportingAggregator<PgStore, SystemClock>,
    schedule: &FeeSchedule,
    reporting_date: Option<NaiveDate>,
) -> Result<(), LedgerError> {
    let run = scheduler.run_once(schedule).await?;
    info!(
        cycle = %run.cycle,
        created = run.created,
        skipped = run.skipped,
        failed = run.failed,
        "monthly billing complete"
    );
    let date = reporting_date.unwrap_or_else(|| SystemClock.today());
    let stats = reporting.dashboard(date).await?;
    info!(
        total_students = stats.total_students,
        available_rooms = stats.available_rooms,
        collection_percent = stats.collection_percent,
        pending_amount = stats.pending_amount,
        "dashboard snapshot"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BillingdError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = get_config()?;
    let pool = get_database_connection(&config.database_url)?;
    let store = PgStore::new(pool);
    let scheduler = BillingScheduler::new(store.clone(), SystemClock);
    let reporting = ReportingAggregator::new(store, SystemClock);
    let schedule = FeeSchedule {
        monthly_amount: config.billing.monthly_amount,
    };

    if std::env::args().any(|arg| arg == "--run-now") {
        run_billing(&scheduler, &reporting, &schedule, config.reporting_date).await?;
        return Ok(());
    }

    loop {
        let now = SystemClock.now();
        let next = next_cycle_start(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(%next, "sleeping until the next billing cycle");
        tokio::time::sleep(wait).await;
        if let Err(err) =
            run_billing(&scheduler, &reporting, &schedule, config.reporting_date).await
        {
            error!(%err, "billing run failed, will retry next cycle");
        }
    }
}
