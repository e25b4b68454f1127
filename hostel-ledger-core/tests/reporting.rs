//! Fee aggregation, the denormalized fee table, and the dashboard snapshot.

mod common;

use common::{date, room, student};
use hostel_ledger_core::domain::{BillingCycle, FeeStatus, MealType, SkipResponse};
use hostel_ledger_core::{
    AllocationService, FeeLedger, FixedClock, MealSkipLedger, MemoryStore, ReportingAggregator,
};

fn fee_ledger(store: &MemoryStore) -> FeeLedger<MemoryStore, FixedClock> {
    FeeLedger::new(store.clone(), FixedClock(date(2026, 9, 1)))
}

fn cycle() -> BillingCycle {
    BillingCycle::from_date(date(2026, 9, 1))
}

#[tokio::test]
async fn empty_ledger_reports_zero_not_an_error() {
    let store = MemoryStore::new();
    let fees = fee_ledger(&store);

    assert!(fees.collection_percent().await.unwrap().abs() < 1e-9);
    assert!(fees.paid_amount().await.unwrap().abs() < 1e-9);
    assert!(fees.pending_amount().await.unwrap().abs() < 1e-9);
    assert!(fees.paid_count_percent().await.unwrap().abs() < 1e-9);
    assert!(fees.pending_count_percent().await.unwrap().abs() < 1e-9);
}

#[tokio::test]
async fn collection_percent_rounds_half_up_to_two_decimals() {
    let store = MemoryStore::new();
    for (id, name) in [(1, "Asha"), (2, "Bilal"), (3, "Chitra")] {
        store.insert_student(student(id, name));
    }
    let fees = fee_ledger(&store);
    for id in 1..=3 {
        fees.create_fee(id, 33.0, cycle()).await.unwrap();
    }
    fees.mark_paid(1, cycle(), hostel_ledger_core::domain::PaymentMode::Cash)
        .await
        .unwrap();

    // paid 33 of 99 billed
    assert!((fees.collection_percent().await.unwrap() - 33.33).abs() < 1e-9);
    assert!((fees.paid_count_percent().await.unwrap() - 33.33).abs() < 1e-9);
    assert!((fees.pending_count_percent().await.unwrap() - 66.67).abs() < 1e-9);
    assert!((fees.pending_amount().await.unwrap() - 66.0).abs() < 1e-9);
    assert!((fees.paid_amount().await.unwrap() - 33.0).abs() < 1e-9);
}

#[tokio::test]
async fn fully_paid_ledger_reports_one_hundred_percent() {
    let store = MemoryStore::new();
    store.insert_student(student(1, "Asha"));
    let fees = fee_ledger(&store);
    fees.create_fee(1, 2000.0, cycle()).await.unwrap();
    fees.mark_paid(1, cycle(), hostel_ledger_core::domain::PaymentMode::Online)
        .await
        .unwrap();

    assert!((fees.collection_percent().await.unwrap() - 100.0).abs() < 1e-9);
    assert!((fees.paid_count_percent().await.unwrap() - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn fee_table_keeps_students_without_room_or_fee() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "A-101", 2));
    store.insert_student(student(1, "Asha"));
    store.insert_student(student(2, "Bilal"));
    store.insert_student(student(3, "Chitra"));

    let allocation = AllocationService::new(store.clone());
    allocation.assign_room(1, 1).await.unwrap();

    let fees = fee_ledger(&store);
    fees.create_fee(1, 2000.0, cycle()).await.unwrap();
    fees.create_fee(2, 2000.0, cycle()).await.unwrap();

    let table = fees.fee_table().await.unwrap();
    assert_eq!(table.len(), 3);

    let asha = &table[0];
    assert_eq!(asha.room_no.as_deref(), Some("A-101"));
    assert_eq!(asha.fee_amount, Some(2000.0));
    assert_eq!(asha.fee_status, Some(FeeStatus::Pending));

    // no room assigned, fee present
    let bilal = &table[1];
    assert_eq!(bilal.room_no, None);
    assert_eq!(bilal.fee_status, Some(FeeStatus::Pending));

    // never billed, still listed
    let chitra = &table[2];
    assert_eq!(chitra.student_name, "Chitra");
    assert_eq!(chitra.fee_amount, None);
    assert_eq!(chitra.fee_status, None);
}

#[tokio::test]
async fn meal_skip_responses_upsert_per_student_day_and_meal() {
    let store = MemoryStore::new();
    let meals = MealSkipLedger::new(store.clone());
    let day = date(2026, 9, 2);

    meals
        .record_response(1, day, MealType::Breakfast, SkipResponse::Skipped)
        .await
        .unwrap();
    meals
        .record_response(2, day, MealType::Breakfast, SkipResponse::Skipped)
        .await
        .unwrap();
    meals
        .record_response(1, day, MealType::Dinner, SkipResponse::Attending)
        .await
        .unwrap();

    assert_eq!(meals.skip_count(day, MealType::Breakfast).await.unwrap(), 2);
    assert_eq!(meals.skip_count(day, MealType::Dinner).await.unwrap(), 0);
    assert_eq!(
        meals.response_for(3, day, MealType::Lunch).await.unwrap(),
        SkipResponse::Unset
    );

    // changing an answer replaces it instead of adding a second record
    meals
        .record_response(1, day, MealType::Breakfast, SkipResponse::Attending)
        .await
        .unwrap();
    assert_eq!(meals.skip_count(day, MealType::Breakfast).await.unwrap(), 1);
    assert_eq!(
        meals
            .response_for(1, day, MealType::Breakfast)
            .await
            .unwrap(),
        SkipResponse::Attending
    );
}

#[tokio::test]
async fn dashboard_snapshot_aggregates_all_ledgers() {
    let store = MemoryStore::new();
    store.insert_room(room(1, "B-201", 1));
    store.insert_room(room(2, "B-202", 2));
    store.insert_student(student(1, "Asha"));
    store.insert_student(student(2, "Bilal"));

    let allocation = AllocationService::new(store.clone());
    allocation.assign_room(1, 1).await.unwrap();

    let fees = fee_ledger(&store);
    fees.create_fee(1, 1000.0, cycle()).await.unwrap();
    fees.create_fee(2, 1000.0, cycle()).await.unwrap();
    fees.mark_paid(2, cycle(), hostel_ledger_core::domain::PaymentMode::Cash)
        .await
        .unwrap();

    let day = date(2026, 9, 2);
    let meals = MealSkipLedger::new(store.clone());
    meals
        .record_response(1, day, MealType::Lunch, SkipResponse::Skipped)
        .await
        .unwrap();

    let reporting = ReportingAggregator::new(store, FixedClock(date(2026, 9, 2)));
    let stats = reporting.dashboard(day).await.unwrap();

    assert_eq!(stats.total_students, 2);
    assert_eq!(stats.available_rooms, 1);
    assert!((stats.collection_percent - 50.0).abs() < 1e-9);
    assert!((stats.paid_amount - 1000.0).abs() < 1e-9);
    assert!((stats.pending_amount - 1000.0).abs() < 1e-9);
    assert_eq!(stats.meal_skips.lunch, 1);
    assert_eq!(stats.meal_skips.breakfast, 0);

    // the presentation layer consumes the snapshot as named fields
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_students"], 2);
    assert_eq!(json["meal_skips"]["lunch"], 1);
}
