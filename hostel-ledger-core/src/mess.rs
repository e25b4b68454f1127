//! Meal-skip ledger: who is skipping which meal on which day.

use chrono::NaiveDate;

use crate::domain::{MealType, SkipResponse, StudentId};
use crate::error::LedgerError;
use crate::store::MealSkipStore;

#[derive(Debug, Clone)]
pub struct MealSkipLedger<S> {
    store: S,
}

impl<S: MealSkipStore> MealSkipLedger<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a student's response for one (date, meal) slot. Upsert
    /// semantics keep at most one record per (student, date, meal).
    pub async fn record_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
        response: SkipResponse,
    ) -> Result<(), LedgerError> {
        self.store
            .upsert_response(student_id, date, meal, response)
            .await?;
        Ok(())
    }

    /// `Unset` when the student has not answered for that slot.
    pub async fn response_for(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<SkipResponse, LedgerError> {
        Ok(self.store.find_response(student_id, date, meal).await?)
    }

    pub async fn skip_count(&self, date: NaiveDate, meal: MealType) -> Result<i64, LedgerError> {
        Ok(self.store.skipped_count(date, meal).await?)
    }
}
