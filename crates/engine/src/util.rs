//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize the
//! parsing rules so criteria and drafts reject bad input the same way.

use chrono::NaiveDate;

use crate::{EngineError, Money, ResultEngine};

/// Date format accepted from form inputs.
pub(crate) const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the trimmed input, or `None` if it is blank.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a `YYYY-MM-DD` form input and return a labeled error on failure.
pub(crate) fn parse_input_date(value: &str, label: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("{label}: expected YYYY-MM-DD, got '{value}'")))
}

/// Parse a decimal form input and return a labeled error on failure.
pub(crate) fn parse_input_amount(value: &str, label: &str) -> ResultEngine<Money> {
    value.parse::<Money>().map_err(|err| match err {
        EngineError::InvalidAmount(reason) => EngineError::InvalidAmount(format!("{label}: {reason}")),
        other => other,
    })
}
