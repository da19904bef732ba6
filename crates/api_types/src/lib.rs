//! Request and response bodies of the expense tracker REST API.
//!
//! Responses are decoded leniently: a field with an unexpected JSON type
//! decodes as `None` instead of failing the whole payload, so one bad row
//! never hides the rest of a list.

use serde::{Deserialize, Serialize};

pub mod lenient;

pub use lenient::Amount;

pub mod auth {
    use super::*;

    /// Body of `POST /api/auth/login` and `POST /api/auth/register`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
    }
}

pub mod user {
    use super::*;

    /// `GET /api/user/me`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserProfile {
        #[serde(default, deserialize_with = "lenient::id")]
        pub id: Option<i64>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub username: Option<String>,
    }
}

pub mod expense {
    use chrono::NaiveDate;

    use super::*;

    /// An expense as listed by `GET /api/expenses`.
    ///
    /// `date` is kept as sent; it may carry a time component.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        #[serde(default, deserialize_with = "lenient::id")]
        pub id: Option<i64>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub title: Option<String>,
        #[serde(default, deserialize_with = "lenient::amount")]
        pub amount: Option<Amount>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub date: Option<String>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub category: Option<String>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub description: Option<String>,
    }

    /// Body of `POST /api/expenses` and `PUT /api/expenses/{id}`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseBody {
        pub title: String,
        pub amount: Amount,
        pub date: NaiveDate,
        pub category: String,
        pub description: Option<String>,
    }
}

pub mod budget {
    use chrono::NaiveDate;

    use super::*;

    /// A budget as listed by `GET /api/budgets`.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        #[serde(default, deserialize_with = "lenient::id")]
        pub id: Option<i64>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub category: Option<String>,
        #[serde(default, deserialize_with = "lenient::amount")]
        pub amount: Option<Amount>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub start_date: Option<String>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub end_date: Option<String>,
        #[serde(default, deserialize_with = "lenient::text")]
        pub description: Option<String>,
    }

    /// Body of `POST /api/budgets` and `PUT /api/budgets/{id}`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetBody {
        pub category: String,
        pub amount: Amount,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub description: Option<String>,
    }

    /// `GET /api/budgets/{category}/status`, computed by the server.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetStatus {
        #[serde(default, deserialize_with = "lenient::amount")]
        pub total_spent: Option<Amount>,
        #[serde(default, deserialize_with = "lenient::amount")]
        pub remaining: Option<Amount>,
        #[serde(default, deserialize_with = "lenient::number")]
        pub percentage_used: Option<f64>,
    }
}

#[cfg(test)]
mod tests {
    use super::{budget::*, expense::*};
    use chrono::NaiveDate;

    #[test]
    fn expense_list_tolerates_bad_fields() {
        let json = r#"[
            {"id": 1, "title": "Lunch", "amount": 12.5, "date": "2024-01-01", "category": "Food"},
            {"id": "2", "amount": "7.25", "date": "2024-01-02T10:00:00", "category": null},
            {"id": 3, "amount": true, "date": 20240103, "description": {"x": 1}}
        ]"#;
        let rows: Vec<ExpenseView> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].amount.as_ref().map(|a| a.as_str()), Some("12.5"));
        assert_eq!(rows[0].description, None);
        assert_eq!(rows[1].id, Some(2));
        assert_eq!(rows[1].amount.as_ref().map(|a| a.as_str()), Some("7.25"));
        assert_eq!(rows[1].category, None);
        assert_eq!(rows[2].amount, None);
        assert_eq!(rows[2].date, None);
        assert_eq!(rows[2].description, None);
    }

    #[test]
    fn budget_uses_camel_case() {
        let json = r#"{"id": 4, "category": "Bills", "amount": 250, "startDate": "2024-01-01", "endDate": "2024-01-31"}"#;
        let budget: BudgetView = serde_json::from_str(json).unwrap();
        assert_eq!(budget.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(budget.end_date.as_deref(), Some("2024-01-31"));
        assert_eq!(budget.amount.as_ref().map(|a| a.as_str()), Some("250"));
    }

    #[test]
    fn budget_body_serializes_amount_as_number() {
        let body = BudgetBody {
            category: "Food".to_string(),
            amount: super::Amount::new("300.50"),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            description: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["amount"], serde_json::json!(300.5));
        assert_eq!(value["startDate"], "2024-01-01");
        assert_eq!(value["endDate"], "2024-01-31");
    }

    #[test]
    fn status_reads_server_numbers() {
        let json = r#"{"totalSpent": 120.00, "remaining": 80, "percentageUsed": 60.0, "budget": {}}"#;
        let status: BudgetStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.total_spent.as_ref().map(|a| a.as_str()), Some("120.0"));
        assert_eq!(status.percentage_used, Some(60.0));
    }
}
