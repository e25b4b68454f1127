//! Room allocation and fee billing lifecycle for a hostel.
//!
//! The ledgers in this crate own the only mutable shared state of the system:
//! per-room occupancy counters and per-student fee records. Everything talks to
//! the relational store through the traits in [`store`], so the same logic runs
//! against PostgreSQL in production and against [`memory::MemoryStore`] in the
//! test suite.

pub mod allocation;
pub mod billing;
pub mod clock;
pub mod domain;
pub mod error;
pub mod fees;
pub mod memory;
pub mod mess;
pub mod reporting;
pub mod rooms;
pub mod store;

pub use allocation::AllocationService;
pub use billing::{next_cycle_start, BillingRun, BillingScheduler, FeeSchedule};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LedgerError, StoreError};
pub use fees::FeeLedger;
pub use memory::MemoryStore;
pub use mess::MealSkipLedger;
pub use reporting::{DashboardStats, MealSkipCounts, ReportingAggregator};
pub use rooms::RoomLedger;
