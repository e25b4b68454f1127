#![allow(dead_code)]

use chrono::NaiveDate;
use hostel_ledger_core::domain::{Room, RoomStatus, StudentRecord};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn room(room_id: i32, room_no: &str, capacity: i32) -> Room {
    Room {
        room_id,
        room_no: room_no.to_owned(),
        room_type: "double".to_owned(),
        floor: 1,
        capacity,
        current_occupants: 0,
        monthly_rent: 4500.0,
        status: RoomStatus::Available,
    }
}

pub fn student(student_id: i32, name: &str) -> StudentRecord {
    StudentRecord {
        student_id,
        name: name.to_owned(),
        admission_date: date(2025, 7, 1),
        admission_fee_paid: true,
        room_id: None,
    }
}
