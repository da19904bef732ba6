pub mod budgets;
pub mod expenses;
pub mod form;
pub mod login;
