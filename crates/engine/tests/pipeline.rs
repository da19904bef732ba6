use chrono::NaiveDate;

use engine::{
    Budget, Bucket, EngineError, Expense, FilterCriteria, FilterInput, GroupBy, Money, aggregate,
    filter, parse_calendar_date, total,
};

fn expense(id: i64, category: &str, amount: &str, date: &str) -> Expense {
    Expense {
        id: Some(id),
        title: Some(format!("expense {id}")),
        amount: Money::from_wire(amount).ok(),
        date: parse_calendar_date(date),
        category: Some(category.to_string()),
        description: None,
    }
}

fn scenario() -> Vec<Expense> {
    vec![
        expense(1, "Food", "10", "2024-01-01"),
        expense(2, "Food", "5", "2024-01-02"),
        expense(3, "Transportation", "20", "2024-01-01"),
    ]
}

/// A snapshot with awkward rows: missing fields, garbage amounts, repeated
/// keys and timestamps.
fn messy() -> Vec<Expense> {
    vec![
        expense(1, "Food", "12.30", "2024-01-01T09:00:00"),
        expense(2, "Bills", "99.99", "2024-01-03"),
        Expense {
            id: Some(3),
            amount: Some(Money::new(450)),
            ..Expense::default()
        },
        expense(4, "Food", "not a number", "2024-01-01T21:45:00"),
        expense(5, "Shopping", "0.01", "garbage"),
        expense(6, "Bills", "40", "2024-01-02"),
        expense(7, "Food", "7.70", "2024-01-02"),
    ]
}

fn criteria_samples() -> Vec<FilterCriteria> {
    let inputs = [
        FilterInput::default(),
        FilterInput {
            category: "Food".to_string(),
            ..FilterInput::default()
        },
        FilterInput {
            date_from: "2024-01-02".to_string(),
            ..FilterInput::default()
        },
        FilterInput {
            date_to: "2024-01-01".to_string(),
            min_amount: "1".to_string(),
            ..FilterInput::default()
        },
        FilterInput {
            category: "Bills".to_string(),
            date_from: "2024-01-01".to_string(),
            date_to: "2024-01-31".to_string(),
            min_amount: "10".to_string(),
            max_amount: "50".to_string(),
        },
    ];
    inputs
        .iter()
        .map(|input| FilterCriteria::parse(input).unwrap())
        .collect()
}

fn is_subsequence(sub: &[Expense], full: &[Expense]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|item| rest.any(|candidate| candidate == item))
}

#[test]
fn category_totals_scenario() {
    assert_eq!(
        aggregate(&scenario(), GroupBy::Category),
        vec![
            Bucket {
                key: "Food".to_string(),
                total: Money::new(1500),
            },
            Bucket {
                key: "Transportation".to_string(),
                total: Money::new(2000),
            },
        ]
    );
}

#[test]
fn category_filter_scenario() {
    let criteria = FilterCriteria {
        category: Some("Food".to_string()),
        ..FilterCriteria::default()
    };
    let records = scenario();
    assert_eq!(filter(&records, &criteria), records[..2].to_vec());
}

#[test]
fn amount_range_scenario() {
    let records = vec![
        expense(1, "Other", "10", "2024-01-01"),
        expense(2, "Other", "20", "2024-01-01"),
        expense(3, "Other", "30", "2024-01-01"),
    ];
    let criteria = FilterCriteria::parse(&FilterInput {
        min_amount: "15".to_string(),
        max_amount: "25".to_string(),
        ..FilterInput::default()
    })
    .unwrap();
    let kept = filter(&records, &criteria);
    assert_eq!(kept, vec![records[1].clone()]);
}

#[test]
fn same_day_different_times_share_a_bucket() {
    let records = vec![
        expense(1, "Food", "3.50", "2024-01-01T08:00:00"),
        expense(2, "Food", "6.25", "2024-01-01T19:30:00"),
    ];
    assert_eq!(
        aggregate(&records, GroupBy::Date),
        vec![Bucket {
            key: "2024-01-01".to_string(),
            total: Money::new(975),
        }]
    );
}

#[test]
fn filter_returns_a_subsequence() {
    let records = messy();
    for criteria in criteria_samples() {
        let kept = filter(&records, &criteria);
        assert!(is_subsequence(&kept, &records), "{criteria:?}");
    }
}

#[test]
fn empty_criteria_is_identity() {
    let records = messy();
    assert_eq!(filter(&records, &FilterCriteria::default()), records);
}

#[test]
fn filter_is_idempotent() {
    let records = messy();
    for criteria in criteria_samples() {
        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once, twice, "{criteria:?}");
    }
}

#[test]
fn malformed_rows_never_match_active_predicates() {
    let records = messy();
    let criteria = FilterCriteria::parse(&FilterInput {
        min_amount: "0".to_string(),
        ..FilterInput::default()
    })
    .unwrap();
    let ids: Vec<_> = filter(&records, &criteria).iter().map(|e| e.id).collect();
    assert!(!ids.contains(&Some(4)));

    let criteria = FilterCriteria::parse(&FilterInput {
        date_to: "2030-12-31".to_string(),
        ..FilterInput::default()
    })
    .unwrap();
    let ids: Vec<_> = filter(&records, &criteria).iter().map(|e| e.id).collect();
    assert!(!ids.contains(&Some(3)));
    assert!(!ids.contains(&Some(5)));
}

#[test]
fn aggregation_conserves_the_total() {
    let records = messy();
    for group_by in [GroupBy::Category, GroupBy::Date] {
        let buckets = aggregate(&records, group_by);
        let bucket_sum: Money = buckets.iter().map(|b| b.total).sum();
        assert_eq!(bucket_sum, total(&records), "{group_by}");
    }
}

#[test]
fn conservation_holds_for_server_precision_amounts() {
    let records = vec![
        expense(1, "Food", "10.005", "2024-01-01"),
        expense(2, "Food", "5", "2024-01-01"),
        expense(3, "Bills", "1E+2", "2024-01-02"),
        expense(4, "Bills", "2.675", "2024-01-02"),
        expense(5, "Other", "3.3e-1", "2024-01-03"),
    ];
    assert!(records.iter().all(|e| e.amount.is_some()));
    assert_eq!(total(&records), Money::new(1000 + 500 + 10_000 + 268 + 33));
    for group_by in [GroupBy::Category, GroupBy::Date] {
        let buckets = aggregate(&records, group_by);
        let bucket_sum: Money = buckets.iter().map(|b| b.total).sum();
        assert_eq!(bucket_sum, total(&records), "{group_by}");
    }

    let criteria = FilterCriteria::parse(&FilterInput {
        min_amount: "10".to_string(),
        ..FilterInput::default()
    })
    .unwrap();
    let ids: Vec<_> = filter(&records, &criteria).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
}

#[test]
fn huge_amounts_saturate_through_the_pipeline() {
    let records = vec![
        expense(1, "Food", "90000000000000000", "2024-01-01"),
        expense(2, "Food", "90000000000000000", "2024-01-01"),
    ];
    let buckets = aggregate(&records, GroupBy::Category);
    assert_eq!(buckets[0].total, Money::new(i64::MAX));
    assert_eq!(total(&records), Money::new(i64::MAX));
}

#[test]
fn bucket_count_is_bounded_by_distinct_keys() {
    let records = messy();
    let by_category = aggregate(&records, GroupBy::Category);
    let by_date = aggregate(&records, GroupBy::Date);
    // Food, Bills, undefined, Shopping
    assert_eq!(by_category.len(), 4);
    // 2024-01-01, 2024-01-03, undefined, 2024-01-02
    assert_eq!(by_date.len(), 4);
    assert!(by_category.len() <= records.len());
}

#[test]
fn filtered_then_aggregated_pipeline() {
    let records = messy();
    let criteria = FilterCriteria::parse(&FilterInput {
        date_from: "2024-01-01".to_string(),
        date_to: "2024-01-02".to_string(),
        ..FilterInput::default()
    })
    .unwrap();
    let kept = filter(&records, &criteria);
    assert_eq!(
        aggregate(&kept, GroupBy::Date),
        vec![
            Bucket {
                key: "2024-01-01".to_string(),
                total: Money::new(1230),
            },
            Bucket {
                key: "2024-01-02".to_string(),
                total: Money::new(4770),
            },
        ]
    );
}

#[test]
fn budgets_aggregate_by_category() {
    let budget = |category: &str, cents: i64| Budget {
        category: Some(category.to_string()),
        amount: Some(Money::new(cents)),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        ..Budget::default()
    };
    let budgets = vec![budget("Food", 30_000), budget("Bills", 50_000), budget("Food", 5_000)];
    let buckets = aggregate(&budgets, GroupBy::Category);
    assert_eq!(buckets[0].total, Money::new(35_000));
    assert_eq!(buckets[1].total, Money::new(50_000));
}

#[test]
fn unknown_grouping_selector_fails_fast() {
    assert!(matches!(
        "month".parse::<GroupBy>(),
        Err(EngineError::InvalidArgument(_))
    ));
}
