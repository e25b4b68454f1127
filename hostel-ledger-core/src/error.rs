use thiserror::Error;

use crate::domain::{RoomId, StudentId};

/// Failure reported by a store implementation. Connectivity problems,
/// constraint violations and pool exhaustion all end up here; the ledgers do
/// not retry.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("room {0} does not exist")]
    RoomNotFound(RoomId),
    #[error("student {0} does not exist")]
    StudentNotFound(StudentId),
    #[error("assignment failed: {0}")]
    AssignmentFailed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}
