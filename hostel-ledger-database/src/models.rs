//! Row types for the ledger tables, plus conversions into the domain
//! entities. Status and enum columns are stored as text; parsing failures
//! surface as storage errors rather than panics.

use chrono::NaiveDate;
use diesel::prelude::*;
use hostel_ledger_core::domain::{FeeRecord, Room, StudentRecord};
use hostel_ledger_core::StoreError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::schema::rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoomRow {
    pub room_id: i32,
    pub room_no: String,
    pub room_type: String,
    pub floor: i32,
    pub capacity: i32,
    pub current_occupants: i32,
    pub monthly_rent: f64,
    pub status: String,
}

impl TryFrom<RoomRow> for Room {
    type Error = StoreError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: row.room_id,
            room_no: row.room_no,
            room_type: row.room_type,
            floor: row.floor,
            capacity: row.capacity,
            current_occupants: row.current_occupants,
            monthly_rent: row.monthly_rent,
            status: row.status.parse().map_err(StoreError::new)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::schema::students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub student_id: i32,
    pub name: String,
    pub admission_date: NaiveDate,
    pub admission_fee: bool,
    pub room_id: Option<i32>,
}

impl From<StudentRow> for StudentRecord {
    fn from(row: StudentRow) -> Self {
        Self {
            student_id: row.student_id,
            name: row.name,
            admission_date: row.admission_date,
            admission_fee_paid: row.admission_fee,
            room_id: row.room_id,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::schema::fees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeeRow {
    pub fee_id: i32,
    pub student_id: i32,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: String,
    pub payment_mode: Option<String>,
    pub billing_cycle: String,
}

impl TryFrom<FeeRow> for FeeRecord {
    type Error = StoreError;

    fn try_from(row: FeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            fee_id: row.fee_id,
            student_id: row.student_id,
            amount: row.amount,
            due_date: row.due_date,
            paid_date: row.paid_date,
            status: row.status.parse().map_err(StoreError::new)?,
            payment_mode: row
                .payment_mode
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(StoreError::new)?,
            cycle: row.billing_cycle.parse().map_err(StoreError::new)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::fees)]
pub struct NewFeeRow<'a> {
    pub student_id: i32,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: &'a str,
    pub billing_cycle: String,
}
