//! [`PgStore`]: the store traits implemented on PostgreSQL.
//!
//! Occupancy changes are single conditional UPDATE statements, so the
//! capacity check and the increment cannot race each other.

use chrono::NaiveDate;
use diesel::dsl::{exists, sum};
use diesel::prelude::*;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use hostel_ledger_core::domain::{
    BillingCycle, FeeRecord, FeeStatus, FeeTableRow, MealType, NewFee, PaymentMode, Room, RoomId,
    RoomStatus, SkipResponse, StudentId, StudentRecord,
};
use hostel_ledger_core::store::{FeeStore, MealSkipStore, RoomStore, StudentDirectory};
use hostel_ledger_core::StoreError;

use crate::models::{FeeRow, NewFeeRow, RoomRow, StudentRow};
use crate::schema::{fees, mess_skipping, rooms, students};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

impl RoomStore for PgStore {
    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let row = rooms::table
            .filter(rooms::room_id.eq(room_id))
            .select(RoomRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(StoreError::new)?;
        row.map(Room::try_from).transpose()
    }

    async fn occupy_if_below_capacity(&self, room_id: RoomId) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let affected = diesel::update(
            rooms::table
                .filter(rooms::room_id.eq(room_id))
                .filter(rooms::current_occupants.lt(rooms::capacity)),
        )
        .set(rooms::current_occupants.eq(rooms::current_occupants + 1))
        .execute(&mut conn)
        .await
        .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn release_if_occupied(&self, room_id: RoomId) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let affected = diesel::update(
            rooms::table
                .filter(rooms::room_id.eq(room_id))
                .filter(rooms::current_occupants.gt(0)),
        )
        .set(rooms::current_occupants.eq(rooms::current_occupants - 1))
        .execute(&mut conn)
        .await
        .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn set_room_status(
        &self,
        room_id: RoomId,
        status: RoomStatus,
    ) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let affected = diesel::update(rooms::table.filter(rooms::room_id.eq(room_id)))
            .set(rooms::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn available_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let rows = rooms::table
            .filter(rooms::status.eq(RoomStatus::Available.as_str()))
            .select(RoomRow::as_select())
            .load::<RoomRow>(&mut conn)
            .await
            .map_err(StoreError::new)?;
        rows.into_iter().map(Room::try_from).collect()
    }
}

impl StudentDirectory for PgStore {
    async fn find_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<StudentRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let row = students::table
            .filter(students::student_id.eq(student_id))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(StoreError::new)?;
        Ok(row.map(StudentRecord::from))
    }

    async fn active_students(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let rows = students::table
            .select(StudentRow::as_select())
            .load::<StudentRow>(&mut conn)
            .await
            .map_err(StoreError::new)?;
        Ok(rows.into_iter().map(StudentRecord::from).collect())
    }

    async fn allocatable_students(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let rows = students::table
            .filter(students::admission_fee.eq(true))
            .filter(students::room_id.is_null())
            .select(StudentRow::as_select())
            .load::<StudentRow>(&mut conn)
            .await
            .map_err(StoreError::new)?;
        Ok(rows.into_iter().map(StudentRecord::from).collect())
    }

    async fn set_room_reference(
        &self,
        student_id: StudentId,
        room_id: Option<RoomId>,
    ) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let affected = diesel::update(students::table.filter(students::student_id.eq(student_id)))
            .set(students::room_id.eq(room_id))
            .execute(&mut conn)
            .await
            .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn student_count(&self) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        students::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(StoreError::new)
    }
}

impl FeeStore for PgStore {
    async fn insert_fee(&self, fee: &NewFee) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let row = NewFeeRow {
            student_id: fee.student_id,
            amount: fee.amount,
            due_date: fee.due_date,
            status: FeeStatus::Pending.as_str(),
            billing_cycle: fee.cycle.to_string(),
        };
        let affected = diesel::insert_into(fees::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn fee_exists_for_cycle(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        diesel::select(exists(
            fees::table
                .filter(fees::student_id.eq(student_id))
                .filter(fees::billing_cycle.eq(cycle.to_string())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(StoreError::new)
    }

    async fn mark_paid(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
        mode: PaymentMode,
        paid_on: NaiveDate,
    ) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let affected = diesel::update(
            fees::table
                .filter(fees::student_id.eq(student_id))
                .filter(fees::billing_cycle.eq(cycle.to_string()))
                .filter(fees::status.eq(FeeStatus::Pending.as_str())),
        )
        .set((
            fees::status.eq(FeeStatus::Paid.as_str()),
            fees::paid_date.eq(paid_on),
            fees::payment_mode.eq(mode.as_str()),
        ))
        .execute(&mut conn)
        .await
        .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn amount_sum(&self, status: Option<FeeStatus>) -> Result<Option<f64>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let total = match status {
            Some(status) => {
                fees::table
                    .filter(fees::status.eq(status.as_str()))
                    .select(sum(fees::amount))
                    .get_result::<Option<f64>>(&mut conn)
                    .await
            }
            None => {
                fees::table
                    .select(sum(fees::amount))
                    .get_result::<Option<f64>>(&mut conn)
                    .await
            }
        };
        total.map_err(StoreError::new)
    }

    async fn fee_count(&self, status: Option<FeeStatus>) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let count = match status {
            Some(status) => {
                fees::table
                    .filter(fees::status.eq(status.as_str()))
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
            }
            None => fees::table.count().get_result::<i64>(&mut conn).await,
        };
        count.map_err(StoreError::new)
    }

    async fn fees_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<FeeRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let rows = fees::table
            .filter(fees::student_id.eq(student_id))
            .select(FeeRow::as_select())
            .load::<FeeRow>(&mut conn)
            .await
            .map_err(StoreError::new)?;
        rows.into_iter().map(FeeRecord::try_from).collect()
    }

    async fn fee_table_rows(&self) -> Result<Vec<FeeTableRow>, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let rows = students::table
            .left_join(rooms::table)
            .left_join(fees::table)
            .select((
                students::student_id,
                students::name,
                students::admission_date,
                rooms::room_no.nullable(),
                fees::amount.nullable(),
                fees::status.nullable(),
            ))
            .load::<(i32, String, NaiveDate, Option<String>, Option<f64>, Option<String>)>(
                &mut conn,
            )
            .await
            .map_err(StoreError::new)?;
        rows.into_iter()
            .map(
                |(student_id, student_name, admission_date, room_no, fee_amount, fee_status)| {
                    Ok(FeeTableRow {
                        student_id,
                        student_name,
                        admission_date,
                        room_no,
                        fee_amount,
                        fee_status: fee_status
                            .as_deref()
                            .map(str::parse)
                            .transpose()
                            .map_err(StoreError::new)?,
                    })
                },
            )
            .collect()
    }
}

impl MealSkipStore for PgStore {
    async fn upsert_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
        response: SkipResponse,
    ) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let affected = diesel::insert_into(mess_skipping::table)
            .values((
                mess_skipping::student_id.eq(student_id),
                mess_skipping::date.eq(date),
                mess_skipping::meal_type.eq(meal.as_str()),
                mess_skipping::skipped.eq(response.as_flag()),
            ))
            .on_conflict((
                mess_skipping::student_id,
                mess_skipping::date,
                mess_skipping::meal_type,
            ))
            .do_update()
            .set(mess_skipping::skipped.eq(response.as_flag()))
            .execute(&mut conn)
            .await
            .map_err(StoreError::new)?;
        Ok(affected as u64)
    }

    async fn find_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<SkipResponse, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        let flag = mess_skipping::table
            .filter(mess_skipping::student_id.eq(student_id))
            .filter(mess_skipping::date.eq(date))
            .filter(mess_skipping::meal_type.eq(meal.as_str()))
            .select(mess_skipping::skipped)
            .first::<Option<bool>>(&mut conn)
            .await
            .optional()
            .map_err(StoreError::new)?;
        Ok(SkipResponse::from_flag(flag.flatten()))
    }

    async fn skipped_count(&self, date: NaiveDate, meal: MealType) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(StoreError::new)?;
        mess_skipping::table
            .filter(mess_skipping::date.eq(date))
            .filter(mess_skipping::meal_type.eq(meal.as_str()))
            .filter(mess_skipping::skipped.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(StoreError::new)
    }
}
