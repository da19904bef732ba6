//! Expense and budget records as the engines see them.
//!
//! Records are snapshots of what the API returned. Every field is optional
//! because the API is free to omit or garble any of them; the engines treat
//! a missing value as "does not match" (filters) or as the sentinel key
//! (aggregation) instead of failing.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// Read access shared by every record kind the engines work on.
pub trait FinancialRecord {
    /// Category label, if present.
    fn category(&self) -> Option<&str>;
    /// Amount, if present and parseable.
    fn amount(&self) -> Option<Money>;
    /// Calendar date used for date predicates and date grouping.
    fn date(&self) -> Option<NaiveDate>;
}

/// A single expense.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expense {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl FinancialRecord for Expense {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn amount(&self) -> Option<Money> {
        self.amount
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// A spending limit for a category over a date range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Budget {
    pub id: Option<i64>,
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Budgets are dated by the start of their range.
impl FinancialRecord for Budget {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn amount(&self) -> Option<Money> {
        self.amount
    }

    fn date(&self) -> Option<NaiveDate> {
        self.start_date
    }
}

impl<T: FinancialRecord + ?Sized> FinancialRecord for &T {
    fn category(&self) -> Option<&str> {
        (**self).category()
    }

    fn amount(&self) -> Option<Money> {
        (**self).amount()
    }

    fn date(&self) -> Option<NaiveDate> {
        (**self).date()
    }
}

/// Categories a budget can be set for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetCategory {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    Other,
}

impl BudgetCategory {
    pub const ALL: [BudgetCategory; 6] = [
        Self::Food,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::Bills,
        Self::Other,
    ];

    /// Label used on the wire and in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed)
            .ok_or_else(|| EngineError::Validation(format!("unknown budget category: {trimmed}")))
    }
}

/// Reduces a date value received from the API to its calendar day.
///
/// Accepts `YYYY-MM-DD`, naive date-times (`2024-01-01T18:30:00`,
/// optionally with fractional seconds or a space separator) and RFC 3339
/// timestamps. Timestamps with an offset keep the day as written, so two
/// values on the same local day map to the same date. Anything else yields
/// `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}
