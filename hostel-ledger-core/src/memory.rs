//! In-memory store. Backs the test suite (including the failure-injection
//! scenarios) and is good enough for demos without a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::domain::{
    BillingCycle, FeeId, FeeRecord, FeeStatus, FeeTableRow, MealType, NewFee, PaymentMode, Room,
    RoomId, RoomStatus, SkipResponse, StudentId, StudentRecord,
};
use crate::error::StoreError;
use crate::store::{FeeStore, MealSkipStore, RoomStore, StudentDirectory};

#[derive(Debug, Default)]
struct State {
    rooms: HashMap<RoomId, Room>,
    students: HashMap<StudentId, StudentRecord>,
    fees: Vec<FeeRecord>,
    meal_skips: HashMap<(StudentId, NaiveDate, MealType), SkipResponse>,
    fail_fee_inserts_for: HashSet<StudentId>,
    next_fee_id: FeeId,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_room(&self, room: Room) {
        self.lock().rooms.insert(room.room_id, room);
    }

    pub fn insert_student(&self, student: StudentRecord) {
        self.lock().students.insert(student.student_id, student);
    }

    /// Makes every subsequent fee insert for this student fail, for testing
    /// the scheduler's per-student failure isolation.
    pub fn inject_fee_insert_failure(&self, student_id: StudentId) {
        self.lock().fail_fee_inserts_for.insert(student_id);
    }

    #[must_use]
    pub fn fee_records(&self) -> Vec<FeeRecord> {
        self.lock().fees.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // a poisoned lock means a test already panicked; propagate the state
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl RoomStore for MemoryStore {
    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self.lock().rooms.get(&room_id).cloned())
    }

    async fn occupy_if_below_capacity(&self, room_id: RoomId) -> Result<u64, StoreError> {
        let mut state = self.lock();
        match state.rooms.get_mut(&room_id) {
            Some(room) if room.current_occupants < room.capacity => {
                room.current_occupants += 1;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn release_if_occupied(&self, room_id: RoomId) -> Result<u64, StoreError> {
        let mut state = self.lock();
        match state.rooms.get_mut(&room_id) {
            Some(room) if room.current_occupants > 0 => {
                room.current_occupants -= 1;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn set_room_status(
        &self,
        room_id: RoomId,
        status: RoomStatus,
    ) -> Result<u64, StoreError> {
        let mut state = self.lock();
        match state.rooms.get_mut(&room_id) {
            Some(room) => {
                room.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn available_rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self
            .lock()
            .rooms
            .values()
            .filter(|room| room.status == RoomStatus::Available)
            .cloned()
            .collect())
    }
}

impl StudentDirectory for MemoryStore {
    async fn find_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<StudentRecord>, StoreError> {
        Ok(self.lock().students.get(&student_id).cloned())
    }

    async fn active_students(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let mut students: Vec<_> = self.lock().students.values().cloned().collect();
        students.sort_by_key(|student| student.student_id);
        Ok(students)
    }

    async fn allocatable_students(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let mut students: Vec<_> = self
            .lock()
            .students
            .values()
            .filter(|student| student.admission_fee_paid && student.room_id.is_none())
            .cloned()
            .collect();
        students.sort_by_key(|student| student.student_id);
        Ok(students)
    }

    async fn set_room_reference(
        &self,
        student_id: StudentId,
        room_id: Option<RoomId>,
    ) -> Result<u64, StoreError> {
        let mut state = self.lock();
        match state.students.get_mut(&student_id) {
            Some(student) => {
                student.room_id = room_id;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn student_count(&self) -> Result<i64, StoreError> {
        Ok(self.lock().students.len() as i64)
    }
}

impl FeeStore for MemoryStore {
    async fn insert_fee(&self, fee: &NewFee) -> Result<u64, StoreError> {
        let mut state = self.lock();
        if state.fail_fee_inserts_for.contains(&fee.student_id) {
            return Err(StoreError::new(format!(
                "injected insert failure for student {}",
                fee.student_id
            )));
        }
        state.next_fee_id += 1;
        let fee_id = state.next_fee_id;
        state.fees.push(FeeRecord {
            fee_id,
            student_id: fee.student_id,
            amount: fee.amount,
            due_date: fee.due_date,
            paid_date: None,
            status: FeeStatus::Pending,
            payment_mode: None,
            cycle: fee.cycle,
        });
        Ok(1)
    }

    async fn fee_exists_for_cycle(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
    ) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .fees
            .iter()
            .any(|fee| fee.student_id == student_id && fee.cycle == cycle))
    }

    async fn mark_paid(
        &self,
        student_id: StudentId,
        cycle: BillingCycle,
        mode: PaymentMode,
        paid_on: NaiveDate,
    ) -> Result<u64, StoreError> {
        let mut affected = 0;
        for fee in &mut self.lock().fees {
            if fee.student_id == student_id
                && fee.cycle == cycle
                && fee.status == FeeStatus::Pending
            {
                fee.status = FeeStatus::Paid;
                fee.paid_date = Some(paid_on);
                fee.payment_mode = Some(mode);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn amount_sum(&self, status: Option<FeeStatus>) -> Result<Option<f64>, StoreError> {
        let state = self.lock();
        let mut matched = false;
        let mut sum = 0.0;
        for fee in &state.fees {
            if status.map_or(true, |wanted| wanted == fee.status) {
                matched = true;
                sum += fee.amount;
            }
        }
        Ok(matched.then_some(sum))
    }

    async fn fee_count(&self, status: Option<FeeStatus>) -> Result<i64, StoreError> {
        Ok(self
            .lock()
            .fees
            .iter()
            .filter(|fee| status.map_or(true, |wanted| wanted == fee.status))
            .count() as i64)
    }

    async fn fees_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<FeeRecord>, StoreError> {
        Ok(self
            .lock()
            .fees
            .iter()
            .filter(|fee| fee.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn fee_table_rows(&self) -> Result<Vec<FeeTableRow>, StoreError> {
        let state = self.lock();
        let mut students: Vec<_> = state.students.values().collect();
        students.sort_by_key(|student| student.student_id);
        let mut rows = Vec::new();
        for student in students {
            let room_no = student
                .room_id
                .and_then(|room_id| state.rooms.get(&room_id))
                .map(|room| room.room_no.clone());
            let fees: Vec<_> = state
                .fees
                .iter()
                .filter(|fee| fee.student_id == student.student_id)
                .collect();
            if fees.is_empty() {
                rows.push(FeeTableRow {
                    student_id: student.student_id,
                    student_name: student.name.clone(),
                    admission_date: student.admission_date,
                    room_no,
                    fee_amount: None,
                    fee_status: None,
                });
            } else {
                for fee in fees {
                    rows.push(FeeTableRow {
                        student_id: student.student_id,
                        student_name: student.name.clone(),
                        admission_date: student.admission_date,
                        room_no: room_no.clone(),
                        fee_amount: Some(fee.amount),
                        fee_status: Some(fee.status),
                    });
                }
            }
        }
        Ok(rows)
    }
}

impl MealSkipStore for MemoryStore {
    async fn upsert_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
        response: SkipResponse,
    ) -> Result<u64, StoreError> {
        self.lock()
            .meal_skips
            .insert((student_id, date, meal), response);
        Ok(1)
    }

    async fn find_response(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<SkipResponse, StoreError> {
        Ok(self
            .lock()
            .meal_skips
            .get(&(student_id, date, meal))
            .copied()
            .unwrap_or_default())
    }

    async fn skipped_count(&self, date: NaiveDate, meal: MealType) -> Result<i64, StoreError> {
        Ok(self
            .lock()
            .meal_skips
            .iter()
            .filter(|((_, skip_date, skip_meal), response)| {
                *skip_date == date && *skip_meal == meal && **response == SkipResponse::Skipped
            })
            .count() as i64)
    }
}
