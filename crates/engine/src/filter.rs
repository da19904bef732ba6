//! Filter engine: narrows a record snapshot with [`FilterCriteria`].

use std::collections::HashSet;

use crate::{FilterCriteria, FinancialRecord};

/// Returns the records matching every active predicate of `criteria`.
///
/// The result is a fresh vector in the input order; `records` is left
/// untouched. Empty criteria return a copy of the whole snapshot.
pub fn filter<R>(records: &[R], criteria: &FilterCriteria) -> Vec<R>
where
    R: FinancialRecord + Clone,
{
    if criteria.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| criteria.matches(*record))
        .cloned()
        .collect()
}

/// Distinct category labels in order of first appearance.
///
/// Records without a category are skipped.
pub fn distinct_categories<R: FinancialRecord>(records: &[R]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(FinancialRecord::category)
        .filter(|category| seen.insert(*category))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{Expense, Money};

    fn expense(id: i64, category: &str, cents: i64, date: &str) -> Expense {
        Expense {
            id: Some(id),
            category: Some(category.to_string()),
            amount: Some(Money::new(cents)),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            ..Expense::default()
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, "Food", 1000, "2024-01-01"),
            expense(2, "Food", 500, "2024-01-02"),
            expense(3, "Transportation", 2000, "2024-01-01"),
        ]
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let records: Vec<Expense> = Vec::new();
        let criteria = FilterCriteria {
            category: Some("Food".to_string()),
            ..FilterCriteria::default()
        };
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn category_filter_keeps_order() {
        let criteria = FilterCriteria {
            category: Some("Food".to_string()),
            ..FilterCriteria::default()
        };
        let ids: Vec<_> = filter(&sample(), &criteria)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn date_range_filter() {
        let criteria = FilterCriteria {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 2),
            ..FilterCriteria::default()
        };
        let ids: Vec<_> = filter(&sample(), &criteria)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![Some(2)]);
    }

    #[test]
    fn works_over_borrowed_records() {
        let records = sample();
        let refs: Vec<&Expense> = records.iter().collect();
        let criteria = FilterCriteria {
            min_amount: Some(Money::new(1000)),
            ..FilterCriteria::default()
        };
        assert_eq!(filter(&refs, &criteria).len(), 2);
    }

    #[test]
    fn distinct_categories_in_first_seen_order() {
        let mut records = sample();
        records.insert(0, expense(0, "Bills", 100, "2024-01-03"));
        records.push(Expense::default());
        assert_eq!(
            distinct_categories(&records),
            vec!["Bills", "Food", "Transportation"]
        );
    }
}
