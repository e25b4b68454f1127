//! Room assignment scenarios over the in-memory store.

mod common;

use common::{room, student};
use hostel_ledger_core::domain::{RoomStatus, StudentRecord};
use hostel_ledger_core::store::{RoomStore, StudentDirectory};
use hostel_ledger_core::{AllocationService, LedgerError, MemoryStore, RoomLedger};

async fn room_state(store: &MemoryStore, room_id: i32) -> (i32, RoomStatus) {
    let room = store.find_room(room_id).await.unwrap().unwrap();
    (room.current_occupants, room.status)
}

#[tokio::test]
async fn filling_a_room_flips_it_to_occupied_on_the_last_bed() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "A-101", 2));
    store.insert_student(student(1, "Asha"));
    store.insert_student(student(2, "Bilal"));
    let allocation = AllocationService::new(store.clone());

    allocation.assign_room(1, 1).await.unwrap();
    assert_eq!(room_state(&store, 1).await, (1, RoomStatus::Available));

    allocation.assign_room(2, 1).await.unwrap();
    assert_eq!(room_state(&store, 1).await, (2, RoomStatus::Occupied));

    let resident = store.find_student(1).await.unwrap().unwrap();
    assert_eq!(resident.room_id, Some(1));
}

#[tokio::test]
async fn assignment_to_unknown_room_leaves_no_partial_state() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "A-101", 2));
    store.insert_student(student(1, "Asha"));
    let allocation = AllocationService::new(store.clone());

    let err = allocation.assign_room(1, 99).await.unwrap_err();
    assert!(matches!(err, LedgerError::RoomNotFound(99)));

    assert_eq!(room_state(&store, 1).await, (0, RoomStatus::Available));
    let resident = store.find_student(1).await.unwrap().unwrap();
    assert_eq!(resident.room_id, None);
}

#[tokio::test]
async fn unknown_student_is_rejected_before_any_write() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "A-101", 2));
    let allocation = AllocationService::new(store.clone());

    let err = allocation.assign_room(42, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::StudentNotFound(42)));
    assert_eq!(room_state(&store, 1).await, (0, RoomStatus::Available));
}

#[tokio::test]
async fn full_room_rejects_further_assignments() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "B-201", 1));
    store.insert_student(student(1, "Asha"));
    store.insert_student(student(2, "Bilal"));
    let allocation = AllocationService::new(store.clone());

    allocation.assign_room(1, 1).await.unwrap();
    let err = allocation.assign_room(2, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::AssignmentFailed(_)));

    // the loser's directory entry is untouched and the count never exceeded
    // capacity
    assert_eq!(room_state(&store, 1).await, (1, RoomStatus::Occupied));
    let loser = store.find_student(2).await.unwrap().unwrap();
    assert_eq!(loser.room_id, None);
}

#[tokio::test]
async fn reassignment_releases_the_previous_room() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "B-201", 1));
    store.insert_room(room(2, "B-202", 1));
    store.insert_student(student(1, "Asha"));
    let allocation = AllocationService::new(store.clone());

    allocation.assign_room(1, 1).await.unwrap();
    assert_eq!(room_state(&store, 1).await, (1, RoomStatus::Occupied));

    allocation.assign_room(1, 2).await.unwrap();
    assert_eq!(room_state(&store, 1).await, (0, RoomStatus::Available));
    assert_eq!(room_state(&store, 2).await, (1, RoomStatus::Occupied));

    let resident = store.find_student(1).await.unwrap().unwrap();
    assert_eq!(resident.room_id, Some(2));
}

#[tokio::test]
async fn unpaid_admission_fee_blocks_allocation() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "A-101", 2));
    store.insert_student(StudentRecord {
        admission_fee_paid: false,
        ..student(1, "Asha")
    });
    let allocation = AllocationService::new(store.clone());

    let err = allocation.assign_room(1, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    assert_eq!(room_state(&store, 1).await, (0, RoomStatus::Available));
}

#[tokio::test]
async fn vacating_clears_the_reference_and_frees_the_bed() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "B-201", 1));
    store.insert_student(student(1, "Asha"));
    let allocation = AllocationService::new(store.clone());

    allocation.assign_room(1, 1).await.unwrap();
    allocation.vacate_room(1).await.unwrap();

    assert_eq!(room_state(&store, 1).await, (0, RoomStatus::Available));
    let resident = store.find_student(1).await.unwrap().unwrap();
    assert_eq!(resident.room_id, None);

    // vacating again is a no-op
    allocation.vacate_room(1).await.unwrap();
}

#[tokio::test]
async fn status_always_matches_the_derivation_rule() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "C-301", 3));
    let ledger = RoomLedger::new(store.clone());

    for expected in 1..=3 {
        ledger.increment_occupancy(1).await.unwrap();
        let room = store.find_room(1).await.unwrap().unwrap();
        assert_eq!(room.current_occupants, expected);
        assert_eq!(
            room.status,
            RoomStatus::derive(room.capacity, room.current_occupants)
        );
    }
    for expected in (0..=2).rev() {
        ledger.release_occupancy(1).await.unwrap();
        let room = store.find_room(1).await.unwrap().unwrap();
        assert_eq!(room.current_occupants, expected);
        assert_eq!(
            room.status,
            RoomStatus::derive(room.capacity, room.current_occupants)
        );
    }
}

#[tokio::test]
async fn zero_capacity_room_never_accepts_occupants() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "STORE", 0));
    let ledger = RoomLedger::new(store.clone());

    let err = ledger.increment_occupancy(1).await.unwrap_err();
    assert!(matches!(err, LedgerError::AssignmentFailed(_)));
    assert_eq!(room_state(&store, 1).await, (0, RoomStatus::Available));
}

#[tokio::test]
async fn listing_available_rooms_excludes_full_ones() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "B-201", 1));
    store.insert_room(room(2, "B-202", 2));
    store.insert_student(student(1, "Asha"));
    let allocation = AllocationService::new(store.clone());
    let ledger = RoomLedger::new(store.clone());

    allocation.assign_room(1, 1).await.unwrap();

    let available = ledger.list_available().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].room_no, "B-202");

    let allocatable = allocation.allocatable_students().await.unwrap();
    assert!(allocatable.is_empty());
}
