//! Client-side validation of the expense and budget forms.
//!
//! Drafts hold the raw form text. `validate` checks them in the order the
//! user sees the fields and returns the first problem as
//! [`EngineError::Validation`], or the typed values ready to submit.

use chrono::NaiveDate;

use crate::{
    BudgetCategory, EngineError, Money, ResultEngine,
    util::{INPUT_DATE_FORMAT, non_blank, parse_input_date},
};

fn required<'a>(value: &'a str, message: &str) -> ResultEngine<&'a str> {
    non_blank(value).ok_or_else(|| EngineError::Validation(message.to_string()))
}

fn positive_amount(value: &str) -> ResultEngine<Money> {
    let not_positive = || EngineError::Validation("Amount must be greater than 0".to_string());
    let raw = non_blank(value).ok_or_else(not_positive)?;
    let amount = raw.parse::<Money>().map_err(|_| not_positive())?;
    if !amount.is_positive() {
        return Err(not_positive());
    }
    Ok(amount)
}

fn optional_text(value: &str) -> Option<String> {
    non_blank(value).map(str::to_string)
}

/// Raw expense form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub description: String,
}

/// A validated expense, ready to be sent to the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidExpense {
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
}

impl ExpenseDraft {
    pub fn validate(&self) -> ResultEngine<ValidExpense> {
        let title = required(&self.title, "Title is required")?;
        let amount = positive_amount(&self.amount)?;
        let date = required(&self.date, "Date is required")?;
        let date = parse_input_date(date, "date")
            .map_err(|err| EngineError::Validation(err.to_string()))?;
        let category = required(&self.category, "Category is required")?;

        Ok(ValidExpense {
            title: title.to_string(),
            amount,
            date,
            category: category.to_string(),
            description: optional_text(&self.description),
        })
    }
}

impl From<&crate::Expense> for ExpenseDraft {
    /// Prefills the form for editing.
    fn from(expense: &crate::Expense) -> Self {
        Self {
            title: expense.title.clone().unwrap_or_default(),
            amount: expense.amount.map(|a| a.to_string()).unwrap_or_default(),
            date: expense
                .date
                .map(|d| d.format(INPUT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            category: expense.category.clone().unwrap_or_default(),
            description: expense.description.clone().unwrap_or_default(),
        }
    }
}

/// Raw budget form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

/// A validated budget, ready to be sent to the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidBudget {
    pub category: BudgetCategory,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

impl BudgetDraft {
    pub fn validate(&self) -> ResultEngine<ValidBudget> {
        let category = required(&self.category, "Category is required")?.parse::<BudgetCategory>()?;
        let amount = positive_amount(&self.amount)?;
        let start_date = required(&self.start_date, "Start date is required")?;
        let end_date = required(&self.end_date, "End date is required")?;
        let start_date = parse_input_date(start_date, "start date")
            .map_err(|err| EngineError::Validation(err.to_string()))?;
        let end_date = parse_input_date(end_date, "end date")
            .map_err(|err| EngineError::Validation(err.to_string()))?;
        if start_date > end_date {
            return Err(EngineError::Validation(
                "Start date must be before end date".to_string(),
            ));
        }

        Ok(ValidBudget {
            category,
            amount,
            start_date,
            end_date,
            description: optional_text(&self.description),
        })
    }
}

impl From<&crate::Budget> for BudgetDraft {
    /// Prefills the form for editing.
    fn from(budget: &crate::Budget) -> Self {
        let date = |d: Option<NaiveDate>| {
            d.map(|d| d.format(INPUT_DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        Self {
            category: budget.category.clone().unwrap_or_default(),
            amount: budget.amount.map(|a| a.to_string()).unwrap_or_default(),
            start_date: date(budget.start_date),
            end_date: date(budget.end_date),
            description: budget.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget_draft() -> BudgetDraft {
        BudgetDraft {
            category: "Food".to_string(),
            amount: "300".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-31".to_string(),
            description: String::new(),
        }
    }

    fn message(err: EngineError) -> String {
        match err {
            EngineError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_budget_passes() {
        let budget = budget_draft().validate().unwrap();
        assert_eq!(budget.category, BudgetCategory::Food);
        assert_eq!(budget.amount, Money::new(30_000));
        assert_eq!(budget.description, None);
    }

    #[test]
    fn budget_checks_run_in_form_order() {
        let mut draft = BudgetDraft::default();
        assert_eq!(message(draft.validate().unwrap_err()), "Category is required");

        draft.category = "Food".to_string();
        assert_eq!(
            message(draft.validate().unwrap_err()),
            "Amount must be greater than 0"
        );

        draft.amount = "0".to_string();
        assert_eq!(
            message(draft.validate().unwrap_err()),
            "Amount must be greater than 0"
        );

        draft.amount = "12".to_string();
        assert_eq!(message(draft.validate().unwrap_err()), "Start date is required");

        draft.start_date = "2024-02-01".to_string();
        assert_eq!(message(draft.validate().unwrap_err()), "End date is required");

        draft.end_date = "2024-01-01".to_string();
        assert_eq!(
            message(draft.validate().unwrap_err()),
            "Start date must be before end date"
        );
    }

    #[test]
    fn budget_allows_single_day_range() {
        let mut draft = budget_draft();
        draft.end_date = draft.start_date.clone();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn budget_rejects_unknown_category() {
        let mut draft = budget_draft();
        draft.category = "Travel".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn expense_requires_fields_and_positive_amount() {
        let mut draft = ExpenseDraft {
            title: "Lunch".to_string(),
            amount: "-3".to_string(),
            date: "2024-01-01".to_string(),
            category: "Food".to_string(),
            description: " ".to_string(),
        };
        assert_eq!(
            message(draft.validate().unwrap_err()),
            "Amount must be greater than 0"
        );

        draft.amount = "12,50".to_string();
        let expense = draft.validate().unwrap();
        assert_eq!(expense.amount, Money::new(1250));
        assert_eq!(expense.description, None);

        draft.title.clear();
        assert_eq!(message(draft.validate().unwrap_err()), "Title is required");
    }

    #[test]
    fn edit_prefill_round_trips() {
        let expense = crate::Expense {
            id: Some(7),
            title: Some("Bus".to_string()),
            amount: Some(Money::new(275)),
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            category: Some("Transportation".to_string()),
            description: None,
        };
        let draft = ExpenseDraft::from(&expense);
        assert_eq!(draft.amount, "2.75");
        assert_eq!(draft.date, "2024-05-02");
        let valid = draft.validate().unwrap();
        assert_eq!(valid.amount, Money::new(275));
    }
}
