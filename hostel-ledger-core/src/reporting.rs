//! Reporting Aggregator: read-only derived statistics for dashboards.
//!
//! Every value here follows the null-safe policy of the Fee Ledger: an empty
//! ledger yields zeroes, never an error. Real storage failures still
//! propagate.

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::Clock;
use crate::domain::MealType;
use crate::error::LedgerError;
use crate::fees::FeeLedger;
use crate::mess::MealSkipLedger;
use crate::rooms::RoomLedger;
use crate::store::{FeeStore, MealSkipStore, RoomStore, StudentDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealSkipCounts {
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
}

/// Snapshot consumed by the external presentation layer as a structured
/// record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub available_rooms: usize,
    pub collection_percent: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub paid_count_percent: f64,
    pub pending_count_percent: f64,
    pub meal_skips: MealSkipCounts,
}

pub struct ReportingAggregator<S, C> {
    fees: FeeLedger<S, C>,
    rooms: RoomLedger<S>,
    meals: MealSkipLedger<S>,
    directory: S,
}

impl<S, C> ReportingAggregator<S, C>
where
    S: FeeStore + RoomStore + MealSkipStore + StudentDirectory + Clone,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            fees: FeeLedger::new(store.clone(), clock),
            rooms: RoomLedger::new(store.clone()),
            meals: MealSkipLedger::new(store.clone()),
            directory: store,
        }
    }

    /// Full dashboard snapshot; `skip_date` selects the day the meal-skip
    /// counts report on.
    pub async fn dashboard(&self, skip_date: NaiveDate) -> Result<DashboardStats, LedgerError> {
        Ok(DashboardStats {
            total_students: self.directory.student_count().await?,
            available_rooms: self.rooms.list_available().await?.len(),
            collection_percent: self.fees.collection_percent().await?,
            paid_amount: self.fees.paid_amount().await?,
            pending_amount: self.fees.pending_amount().await?,
            paid_count_percent: self.fees.paid_count_percent().await?,
            pending_count_percent: self.fees.pending_count_percent().await?,
            meal_skips: MealSkipCounts {
                breakfast: self.meals.skip_count(skip_date, MealType::Breakfast).await?,
                lunch: self.meals.skip_count(skip_date, MealType::Lunch).await?,
                dinner: self.meals.skip_count(skip_date, MealType::Dinner).await?,
            },
        })
    }
}
