//! Fee Ledger: creation and payment-status reporting of fee records.

use crate::clock::Clock;
use crate::domain::{
    BillingCycle, FeeRecord, FeeStatus, FeeTableRow, NewFee, PaymentMode, StudentId,
};
use crate::error::LedgerError;
use crate::store::FeeStore;

/// Rounds to two decimal places, half up. `33.3333 -> 33.33`.
#[must_use]
pub fn round_half_up2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct FeeLedger<S, C> {
    store: S,
    clock: C,
}

impl<S: FeeStore, C: Clock> FeeLedger<S, C> {
    pub const fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Creates one PENDING fee record due today. Deliberately performs no
    /// duplicate check; once-per-cycle semantics belong to the scheduler.
    pub async fn create_fee(
        &self,
        student_id: StudentId,
        amount: f64,
        cycle: BillingCycle,
    ) -> Result<(), LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "fee amount must be a non-negative number, got {amount}"
            )));
        }
        let fee = NewFee {
            student_id,
            amount,
            due_date: self.clock.today(),
            cycle,
        };
        self.store.insert_fee(&fee).await?;
        Ok(())
    }

    pub async fn has_fee_for_cycle(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
    ) -> Result<bool, LedgerError> {
        Ok(self.store.fee_exists_for_cycle(student_id, cycle).await?)
    }

    /// PENDING -> PAID for the student's fee of the given cycle. The
    /// transition never reverses. Fails when no pending record matches.
    pub async fn mark_paid(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
        mode: PaymentMode,
    ) -> Result<(), LedgerError> {
        let affected = self
            .store
            .mark_paid(student_id, cycle, mode, self.clock.today())
            .await?;
        if affected == 0 {
            return Err(LedgerError::AssignmentFailed(format!(
                "no pending fee for student {student_id} in cycle {cycle}"
            )));
        }
        Ok(())
    }

    /// Paid amount over total billed amount as a percentage, rounded half up
    /// to two decimals. Returns 0.0 when nothing has been billed yet;
    /// reporting must never hard-fail the caller over an empty ledger.
    pub async fn collection_percent(&self) -> Result<f64, LedgerError> {
        let paid = self
            .store
            .amount_sum(Some(FeeStatus::Paid))
            .await?
            .unwrap_or(0.0);
        let total = self.store.amount_sum(None).await?;
        Ok(match total {
            Some(total) if total > 0.0 => round_half_up2(paid / total * 100.0),
            _ => 0.0,
        })
    }

    pub async fn pending_amount(&self) -> Result<f64, LedgerError> {
        Ok(self
            .store
            .amount_sum(Some(FeeStatus::Pending))
            .await?
            .unwrap_or(0.0))
    }

    pub async fn paid_amount(&self) -> Result<f64, LedgerError> {
        Ok(self
            .store
            .amount_sum(Some(FeeStatus::Paid))
            .await?
            .unwrap_or(0.0))
    }

    pub async fn paid_count_percent(&self) -> Result<f64, LedgerError> {
        self.count_percent(FeeStatus::Paid).await
    }

    pub async fn pending_count_percent(&self) -> Result<f64, LedgerError> {
        self.count_percent(FeeStatus::Pending).await
    }

    pub async fn fees_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<FeeRecord>, LedgerError> {
        Ok(self.store.fees_for_student(student_id).await?)
    }

    /// Denormalized display listing; left-join semantics so students without a
    /// room or a fee record still show up.
    pub async fn fee_table(&self) -> Result<Vec<FeeTableRow>, LedgerError> {
        Ok(self.store.fee_table_rows().await?)
    }

    async fn count_percent(&self, status: FeeStatus) -> Result<f64, LedgerError> {
        let total = self.store.fee_count(None).await?;
        if total <= 0 {
            return Ok(0.0);
        }
        let matching = self.store.fee_count(Some(status)).await?;
        #[allow(clippy::cast_precision_loss)]
        let percent = round_half_up2(matching as f64 / total as f64 * 100.0);
        Ok(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::round_half_up2;

    #[test]
    fn rounds_half_up_to_two_decimals() {
        assert!((round_half_up2(33.0 / 99.0 * 100.0) - 33.33).abs() < 1e-9);
        assert!((round_half_up2(66.666_666) - 66.67).abs() < 1e-9);
        assert!((round_half_up2(100.0) - 100.0).abs() < 1e-9);
        assert!(round_half_up2(0.0).abs() < 1e-9);
    }
}
