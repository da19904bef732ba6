//! Conversions between wire bodies and engine records.

use api_types::{
    Amount,
    budget::{BudgetBody, BudgetView},
    expense::{ExpenseBody, ExpenseView},
};
use engine::{Budget, Expense, Money, ValidBudget, ValidExpense, parse_calendar_date};

fn money(amount: Option<&Amount>) -> Option<Money> {
    amount.and_then(|amount| Money::from_wire(amount.as_str()).ok())
}

fn date(raw: Option<&str>) -> Option<chrono::NaiveDate> {
    raw.and_then(parse_calendar_date)
}

pub fn expense_from_view(view: ExpenseView) -> Expense {
    Expense {
        id: view.id,
        amount: money(view.amount.as_ref()),
        date: date(view.date.as_deref()),
        title: view.title,
        category: view.category,
        description: view.description,
    }
}

pub fn budget_from_view(view: BudgetView) -> Budget {
    Budget {
        id: view.id,
        amount: money(view.amount.as_ref()),
        start_date: date(view.start_date.as_deref()),
        end_date: date(view.end_date.as_deref()),
        category: view.category,
        description: view.description,
    }
}

pub fn expense_body(expense: ValidExpense) -> ExpenseBody {
    ExpenseBody {
        title: expense.title,
        amount: Amount::new(expense.amount.to_string()),
        date: expense.date,
        category: expense.category,
        description: expense.description,
    }
}

pub fn budget_body(budget: ValidBudget) -> BudgetBody {
    BudgetBody {
        category: budget.category.as_str().to_string(),
        amount: Amount::new(budget.amount.to_string()),
        start_date: budget.start_date,
        end_date: budget.end_date,
        description: budget.description,
    }
}

/// Parses a server-side amount (budget status) into money, if it is one.
pub fn status_money(amount: Option<&Amount>) -> Option<Money> {
    money(amount)
}
