//! Persistence seam. The ledgers consume a relational store through these
//! simple read/write operations; `hostel-ledger-database` implements them on
//! PostgreSQL and [`crate::memory::MemoryStore`] in process memory.
//!
//! Write operations report the number of affected rows so callers can treat
//! "0 rows" as a failure signal instead of silently succeeding.

#![allow(async_fn_in_trait)]

use chrono::NaiveDate;

use crate::domain::{
    BillingCycle, FeeRecord, FeeStatus, FeeTableRow, MealType, NewFee, PaymentMode, Room, RoomId,
    RoomStatus, SkipResponse, StudentId, StudentRecord,
};
use crate::error::StoreError;

pub trait RoomStore {
    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>, StoreError>;

    /// Atomic conditional increment: adds one occupant only while
    /// `current_occupants < capacity`. Returns affected rows, so 0 means the
    /// room is either full or missing.
    async fn occupy_if_below_capacity(&self, room_id: RoomId) -> Result<u64, StoreError>;

    /// Atomic conditional decrement, the inverse of occupation. 0 affected
    /// rows means the room had no recorded occupants (or is missing).
    async fn release_if_occupied(&self, room_id: RoomId) -> Result<u64, StoreError>;

    async fn set_room_status(&self, room_id: RoomId, status: RoomStatus)
        -> Result<u64, StoreError>;

    async fn available_rooms(&self) -> Result<Vec<Room>, StoreError>;
}

/// Read/write slice of the student directory consumed by this core. The
/// directory itself (registration, profiles) is owned elsewhere.
pub trait StudentDirectory {
    async fn find_student(&self, student_id: StudentId)
        -> Result<Option<StudentRecord>, StoreError>;

    /// Every resident currently on the books; the billing fan-out iterates
    /// this set.
    async fn active_students(&self) -> Result<Vec<StudentRecord>, StoreError>;

    /// Students cleared for allocation: admission fee paid and no room yet.
    async fn allocatable_students(&self) -> Result<Vec<StudentRecord>, StoreError>;

    async fn set_room_reference(
        &self,
        student_id: StudentId,
        room_id: Option<RoomId>,
    ) -> Result<u64, StoreError>;

    async fn student_count(&self) -> Result<i64, StoreError>;
}

pub trait FeeStore {
    async fn insert_fee(&self, fee: &NewFee) -> Result<u64, StoreError>;

    async fn fee_exists_for_cycle(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
    ) -> Result<bool, StoreError>;

    async fn mark_paid(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
        mode: PaymentMode,
        paid_on: NaiveDate,
    ) -> Result<u64, StoreError>;

    /// Sum of fee amounts, optionally filtered by status. `None` when no rows
    /// match; callers treat that as zero.
    async fn amount_sum(&self, status: Option<FeeStatus>) -> Result<Option<f64>, StoreError>;

    async fn fee_count(&self, status: Option<FeeStatus>) -> Result<i64, StoreError>;

    async fn fees_for_student(&self, student_id: StudentId)
        -> Result<Vec<FeeRecord>, StoreError>;

    /// Denormalized student/room/fee listing with left-join semantics.
    async fn fee_table_rows(&self) -> Result<Vec<FeeTableRow>, StoreError>;
}

pub trait MealSkipStore {
    /// Upsert keyed on (student, date, meal); at most one record per key.
    async fn upsert_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
        response: SkipResponse,
    ) -> Result<u64, StoreError>;

    async fn find_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<SkipResponse, StoreError>;

    async fn skipped_count(&self, date: NaiveDate, meal: MealType) -> Result<i64, StoreError>;
}
