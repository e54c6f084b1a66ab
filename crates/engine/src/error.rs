//! The module contains the errors the engine can throw.
//!
//! The variants map one-to-one onto caller-visible failure classes:
//!
//! - [`Validation`] for malformed input (negative budget, end before start,
//!   non-positive amount, expense date outside the trip range).
//! - [`KeyNotFound`] when a referenced trip/expense/report does not exist.
//! - [`Forbidden`] when the entity exists but belongs to another user.
//! - [`Conflict`] when a trip would overlap another trip of the same owner.
//! - [`Reconciliation`] when the budget adjustment paired with an expense
//!   write could not be applied; the surrounding transaction rolls back.
//!
//! [`Validation`]: EngineError::Validation
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`Forbidden`]: EngineError::Forbidden
//! [`Conflict`]: EngineError::Conflict
//! [`Reconciliation`]: EngineError::Reconciliation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Budget reconciliation failed: {0}")]
    Reconciliation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Reconciliation(a), Self::Reconciliation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
