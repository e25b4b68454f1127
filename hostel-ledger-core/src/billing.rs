//! Billing Scheduler: creates one fee record per resident per calendar month.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::domain::{BillingCycle, StudentId};
use crate::error::LedgerError;
use crate::fees::FeeLedger;
use crate::store::{FeeStore, StudentDirectory};

/// Fee amounts handed to the scheduler at trigger time, so the amount can
/// change per cycle without touching code.
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    pub monthly_amount: f64,
}

/// Outcome of one scheduler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingRun {
    pub cycle: BillingCycle,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Midnight on the first day of the month after `after` — the next point the
/// monthly trigger fires.
#[must_use]
pub fn next_cycle_start(after: NaiveDateTime) -> NaiveDateTime {
    let date = after.date();
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first day of a month is a valid date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
}

#[derive(Debug, Clone)]
pub struct BillingScheduler<S, C> {
    fees: FeeLedger<S, C>,
    directory: S,
    clock: C,
}

impl<S, C> BillingScheduler<S, C>
where
    S: FeeStore + StudentDirectory + Clone,
    C: Clock + Clone,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            fees: FeeLedger::new(store.clone(), clock.clone()),
            directory: store,
            clock,
        }
    }

    /// One billing pass over the active student set for the current cycle.
    ///
    /// Creation is conditional on "no record for (student, cycle) yet", so a
    /// restarted or doubly-triggered scheduler creates nothing twice. One
    /// student's failure is logged and counted but never aborts the batch;
    /// their fee for this cycle stays missing until a later run.
    pub async fn run_once(&self, schedule: &FeeSchedule) -> Result<BillingRun, LedgerError> {
        let cycle = BillingCycle::from_date(self.clock.today());
        let students = self.directory.active_students().await?;
        let mut run = BillingRun {
            cycle,
            created: 0,
            skipped: 0,
            failed: 0,
        };
        for student in students {
            match self.bill_student(student.student_id, schedule, cycle).await {
                Ok(true) => run.created += 1,
                Ok(false) => run.skipped += 1,
                Err(err) => {
                    run.failed += 1;
                    warn!(
                        student_id = student.student_id,
                        %cycle,
                        %err,
                        "monthly fee creation failed, continuing batch"
                    );
                }
            }
        }
        info!(
            %cycle,
            created = run.created,
            skipped = run.skipped,
            failed = run.failed,
            "billing run finished"
        );
        Ok(run)
    }

    async fn bill_student(
        &self,
        student_id: StudentId,
        schedule: &FeeSchedule,
        cycle: BillingCycle,
    ) -> Result<bool, LedgerError> {
        if self.fees.has_fee_for_cycle(student_id, cycle).await? {
            return Ok(false);
        }
        self.fees
            .create_fee(student_id, schedule.monthly_amount, cycle)
            .await?;
        Ok(true)
    }
}
