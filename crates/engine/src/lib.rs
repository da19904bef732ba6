//! Client-side core of the expense tracker.
//!
//! The crate turns a snapshot of expense or budget records fetched from the
//! API into what the views display:
//!
//! - [`filter`] narrows a snapshot with [`FilterCriteria`] built from the
//!   filter form;
//! - [`aggregate`] groups records into [`Bucket`]s by category or by day
//!   for the charts;
//! - [`ExpenseDraft`] and [`BudgetDraft`] validate form input before it is
//!   submitted.
//!
//! Every function is pure: it reads its arguments and returns a freshly
//! allocated result, so it can be called again on every input change.
//! Amounts are fixed-point [`Money`] values.

pub use aggregate::{Bucket, DATE_KEY_FORMAT, GroupBy, UNDEFINED_KEY, aggregate, share, total};
pub use criteria::{FilterCriteria, FilterInput};
pub use currency::Currency;
pub use error::EngineError;
pub use filter::{distinct_categories, filter};
pub use money::Money;
pub use record::{Budget, BudgetCategory, Expense, FinancialRecord, parse_calendar_date};
pub use validation::{BudgetDraft, ExpenseDraft, ValidBudget, ValidExpense};

mod aggregate;
mod criteria;
mod currency;
mod error;
mod filter;
mod money;
mod record;
mod util;
mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
