//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidArgument`] returned when a caller breaks an API contract, e.g.
//!   an unknown grouping selector.
//! - [`InvalidAmount`] returned when user input is not a valid amount.
//! - [`InvalidDate`] returned when user input is not a `YYYY-MM-DD` date.
//! - [`Validation`] returned when a form draft is incomplete or inconsistent.
//!
//! Malformed records coming from the API never produce an error: the filter
//! and aggregation engines treat their fields as absent.
//!
//!  [`InvalidArgument`]: EngineError::InvalidArgument
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`Validation`]: EngineError::Validation
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("{0}")]
    Validation(String),
}
