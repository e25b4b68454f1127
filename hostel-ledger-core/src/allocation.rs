//! Allocation Service: puts a student into a room and keeps the Room Ledger
//! consistent with the directory's room references.

use tracing::warn;

use crate::domain::{RoomId, StudentId, StudentRecord};
use crate::error::LedgerError;
use crate::rooms::RoomLedger;
use crate::store::{RoomStore, StudentDirectory};

#[derive(Debug, Clone)]
pub struct AllocationService<S> {
    rooms: RoomLedger<S>,
    directory: S,
}

impl<S> AllocationService<S>
where
    S: RoomStore + StudentDirectory + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            rooms: RoomLedger::new(store.clone()),
            directory: store,
        }
    }

    /// Assigns a student to a room as one logical operation: release the
    /// prior room if any, occupy the target, then write the room reference.
    ///
    /// Both ids are verified before the first write, so a stale id fails with
    /// `RoomNotFound`/`StudentNotFound` and leaves no partial state. Later
    /// failures are compensated: the occupancy changes are rolled back before
    /// the error surfaces.
    pub async fn assign_room(
        &self,
        student_id: StudentId,
        room_id: RoomId,
    ) -> Result<(), LedgerError> {
        let student = self.student(student_id).await?;
        self.rooms.room(room_id).await?;

        if !student.admission_fee_paid {
            return Err(LedgerError::InvalidInput(format!(
                "student {student_id} has not paid the admission fee"
            )));
        }
        if student.room_id == Some(room_id) {
            return Ok(());
        }

        let previous = student.room_id;
        if let Some(old_room) = previous {
            if self.rooms.release_occupancy(old_room).await? == 0 {
                warn!(
                    room_id = old_room,
                    student_id, "previous room had no recorded occupants"
                );
            }
        }

        if let Err(err) = self.rooms.increment_occupancy(room_id).await {
            if let Some(old_room) = previous {
                let _ = self.rooms.increment_occupancy(old_room).await;
            }
            return Err(err);
        }

        let affected = self
            .directory
            .set_room_reference(student_id, Some(room_id))
            .await?;
        if affected == 0 {
            let _ = self.rooms.release_occupancy(room_id).await;
            if let Some(old_room) = previous {
                let _ = self.rooms.increment_occupancy(old_room).await;
            }
            return Err(LedgerError::AssignmentFailed(format!(
                "room reference update for student {student_id} affected no rows"
            )));
        }
        Ok(())
    }

    /// Clears a student's room reference and releases the occupancy slot.
    /// A no-op for students without a room.
    pub async fn vacate_room(&self, student_id: StudentId) -> Result<(), LedgerError> {
        let student = self.student(student_id).await?;
        let Some(room_id) = student.room_id else {
            return Ok(());
        };
        let affected = self.directory.set_room_reference(student_id, None).await?;
        if affected == 0 {
            return Err(LedgerError::AssignmentFailed(format!(
                "room reference clear for student {student_id} affected no rows"
            )));
        }
        if self.rooms.release_occupancy(room_id).await? == 0 {
            warn!(room_id, student_id, "vacated room had no recorded occupants");
        }
        Ok(())
    }

    /// Students cleared for allocation: admission fee paid, no room yet.
    pub async fn allocatable_students(&self) -> Result<Vec<StudentRecord>, LedgerError> {
        Ok(self.directory.allocatable_students().await?)
    }

    async fn student(&self, student_id: StudentId) -> Result<StudentRecord, LedgerError> {
        self.directory
            .find_student(student_id)
            .await?
            .ok_or(LedgerError::StudentNotFound(student_id))
    }
}
