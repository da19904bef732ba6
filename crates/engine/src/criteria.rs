//! Filter criteria and their construction from form inputs.

use chrono::NaiveDate;

use crate::{
    FinancialRecord, Money, ResultEngine,
    util::{non_blank, parse_input_amount, parse_input_date},
};

/// Raw text of the filter form, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub category: String,
    pub date_from: String,
    pub date_to: String,
    pub min_amount: String,
    pub max_amount: String,
}

/// Optional predicates over a record. `None` means "no constraint".
///
/// Bounds are inclusive. All active predicates must hold for a record to
/// match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
}

impl FilterCriteria {
    /// Builds criteria from the filter form.
    ///
    /// Blank inputs leave the predicate unset. `"0"` is a bound, not a
    /// blank. Dates must be `YYYY-MM-DD`; amounts follow `Money` parsing.
    pub fn parse(input: &FilterInput) -> ResultEngine<Self> {
        Ok(Self {
            category: non_blank(&input.category).map(str::to_string),
            date_from: non_blank(&input.date_from)
                .map(|raw| parse_input_date(raw, "from date"))
                .transpose()?,
            date_to: non_blank(&input.date_to)
                .map(|raw| parse_input_date(raw, "to date"))
                .transpose()?,
            min_amount: non_blank(&input.min_amount)
                .map(|raw| parse_input_amount(raw, "min amount"))
                .transpose()?,
            max_amount: non_blank(&input.max_amount)
                .map(|raw| parse_input_amount(raw, "max amount"))
                .transpose()?,
        })
    }

    /// Returns `true` when no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }

    /// Checks every active predicate against one record.
    ///
    /// A record missing the field an active predicate looks at does not
    /// match.
    pub fn matches<R: FinancialRecord + ?Sized>(&self, record: &R) -> bool {
        if let Some(category) = self.category.as_deref()
            && record.category() != Some(category)
        {
            return false;
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = record.date() else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from)
                || self.date_to.is_some_and(|to| date > to)
            {
                return false;
            }
        }

        if self.min_amount.is_some() || self.max_amount.is_some() {
            let Some(amount) = record.amount() else {
                return false;
            };
            if self.min_amount.is_some_and(|min| amount < min)
                || self.max_amount.is_some_and(|max| amount > max)
            {
                return false;
            }
        }

        true
    }
}
