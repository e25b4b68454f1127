//! Room Ledger: authoritative occupancy counter and status derivation.

use tracing::debug;

use crate::domain::{Room, RoomId, RoomStatus};
use crate::error::LedgerError;
use crate::store::RoomStore;

/// Owns the occupant count of every room. No other component writes to it;
/// the Allocation Service goes through this ledger.
#[derive(Debug, Clone)]
pub struct RoomLedger<S> {
    store: S,
}

impl<S: RoomStore> RoomLedger<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn room(&self, room_id: RoomId) -> Result<Room, LedgerError> {
        self.store
            .find_room(room_id)
            .await?
            .ok_or(LedgerError::RoomNotFound(room_id))
    }

    /// Adds one occupant to the room. The capacity check and the increment are
    /// a single conditional update in the store, so two concurrent calls
    /// cannot drive the count past capacity; the loser sees 0 affected rows
    /// and gets `AssignmentFailed`. Returns the affected row count.
    pub async fn increment_occupancy(&self, room_id: RoomId) -> Result<u64, LedgerError> {
        let room = self.room(room_id).await?;
        let affected = self.store.occupy_if_below_capacity(room_id).await?;
        if affected == 0 {
            return Err(LedgerError::AssignmentFailed(format!(
                "room {room_id} is already at capacity ({})",
                room.capacity
            )));
        }
        self.refresh_status(room_id).await?;
        Ok(affected)
    }

    /// Removes one occupant, used when a student vacates or is reassigned.
    /// Returns 0 when the room had no recorded occupants; that is a stale
    /// counter the caller may want to log, not a hard failure.
    pub async fn release_occupancy(&self, room_id: RoomId) -> Result<u64, LedgerError> {
        let affected = self.store.release_if_occupied(room_id).await?;
        if affected > 0 {
            self.refresh_status(room_id).await?;
        }
        Ok(affected)
    }

    /// Direct status override. Callers outside the derivation rule must
    /// re-check the occupancy invariant themselves.
    pub async fn set_status(&self, room_id: RoomId, status: RoomStatus) -> Result<u64, LedgerError> {
        Ok(self.store.set_room_status(room_id, status).await?)
    }

    /// Rooms currently in available status. No ordering is guaranteed.
    pub async fn list_available(&self) -> Result<Vec<Room>, LedgerError> {
        Ok(self.store.available_rooms().await?)
    }

    /// Re-derives the status from the persisted count: occupied iff the room
    /// has a non-zero capacity and the count has reached it.
    async fn refresh_status(&self, room_id: RoomId) -> Result<(), LedgerError> {
        if let Some(room) = self.store.find_room(room_id).await? {
            let derived = RoomStatus::derive(room.capacity, room.current_occupants);
            if derived != room.status {
                debug!(room_id, status = %derived, "room status transition");
                self.store.set_room_status(room_id, derived).await?;
            }
        }
        Ok(())
    }
}
