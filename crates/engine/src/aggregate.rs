//! Aggregation engine: groups records into per-key totals for charts.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, FinancialRecord, Money};

/// Key used for records whose grouping field is missing or unparseable.
pub const UNDEFINED_KEY: &str = "undefined";

/// Format of date bucket keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Field used to group records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Category,
    Date,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Date => "date",
        }
    }

    fn key<R: FinancialRecord>(self, record: &R) -> String {
        match self {
            Self::Category => record
                .category()
                .map_or_else(|| UNDEFINED_KEY.to_string(), str::to_string),
            Self::Date => record.date().map_or_else(
                || UNDEFINED_KEY.to_string(),
                |date| date.format(DATE_KEY_FORMAT).to_string(),
            ),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "date" => Ok(Self::Date),
            other => Err(EngineError::InvalidArgument(format!(
                "unknown grouping key: {other}"
            ))),
        }
    }
}

/// Total amount of the records sharing one key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    pub total: Money,
}

/// Groups `records` by `group_by` in a single pass.
///
/// Buckets come out in the order their key first appears. Records with a
/// missing key land in [`UNDEFINED_KEY`]; records with a missing amount
/// still open their bucket but add nothing to it. The sum of all bucket
/// totals equals [`total`] of the input. Totals saturate at the `Money`
/// range rather than overflow.
pub fn aggregate<R: FinancialRecord>(records: &[R], group_by: GroupBy) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = group_by.key(record);
        let amount = record.amount().unwrap_or(Money::ZERO);
        match index.get(&key) {
            Some(&slot) => buckets[slot].total += amount,
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket { key, total: amount });
            }
        }
    }

    buckets
}

/// Sum of every parseable amount in `records`.
pub fn total<R: FinancialRecord>(records: &[R]) -> Money {
    records.iter().filter_map(FinancialRecord::amount).sum()
}

/// Share of each bucket in the overall total, as whole percents rounded
/// down. Every share is 0 when the total is not positive.
pub fn share(buckets: &[Bucket]) -> Vec<(String, u16)> {
    let overall: i128 = buckets.iter().map(|b| i128::from(b.total.cents())).sum();
    buckets
        .iter()
        .map(|bucket| {
            let pct = if overall > 0 {
                (i128::from(bucket.total.cents()).max(0) * 100 / overall).min(100) as u16
            } else {
                0
            };
            (bucket.key.clone(), pct)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Expense;

    fn expense(category: Option<&str>, cents: Option<i64>, date: Option<&str>) -> Expense {
        Expense {
            category: category.map(str::to_string),
            amount: cents.map(Money::new),
            date: date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            ..Expense::default()
        }
    }

    #[test]
    fn group_by_parses_known_selectors() {
        assert_eq!("category".parse::<GroupBy>().unwrap(), GroupBy::Category);
        assert_eq!(" Date ".parse::<GroupBy>().unwrap(), GroupBy::Date);
    }

    #[test]
    fn group_by_rejects_unknown_selector() {
        let err = "amount".parse::<GroupBy>().unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidArgument("unknown grouping key: amount".to_string())
        );
    }

    #[test]
    fn empty_input_gives_no_buckets() {
        let records: Vec<Expense> = Vec::new();
        assert!(aggregate(&records, GroupBy::Category).is_empty());
        assert!(aggregate(&records, GroupBy::Date).is_empty());
    }

    #[test]
    fn buckets_follow_first_occurrence() {
        let records = vec![
            expense(Some("Shopping"), Some(100), None),
            expense(Some("Bills"), Some(200), None),
            expense(Some("Shopping"), Some(300), None),
        ];
        let keys: Vec<_> = aggregate(&records, GroupBy::Category)
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(keys, vec!["Shopping", "Bills"]);
    }

    #[test]
    fn missing_keys_go_to_sentinel_bucket() {
        let records = vec![
            expense(None, Some(100), None),
            expense(Some("Food"), Some(250), Some("2024-03-01")),
            expense(None, Some(50), Some("2024-03-01")),
        ];
        assert_eq!(
            aggregate(&records, GroupBy::Category),
            vec![
                Bucket {
                    key: UNDEFINED_KEY.to_string(),
                    total: Money::new(150)
                },
                Bucket {
                    key: "Food".to_string(),
                    total: Money::new(250)
                },
            ]
        );
        assert_eq!(
            aggregate(&records, GroupBy::Date),
            vec![
                Bucket {
                    key: UNDEFINED_KEY.to_string(),
                    total: Money::new(100)
                },
                Bucket {
                    key: "2024-03-01".to_string(),
                    total: Money::new(300)
                },
            ]
        );
    }

    #[test]
    fn missing_amount_opens_bucket_with_zero() {
        let records = vec![expense(Some("Other"), None, None)];
        assert_eq!(
            aggregate(&records, GroupBy::Category),
            vec![Bucket {
                key: "Other".to_string(),
                total: Money::ZERO
            }]
        );
        assert_eq!(total(&records), Money::ZERO);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_panicking() {
        let huge = 9_000_000_000_000_000_000;
        let records = vec![
            expense(Some("Food"), Some(huge), None),
            expense(Some("Food"), Some(huge), None),
            expense(Some("Bills"), Some(100), None),
        ];
        let buckets = aggregate(&records, GroupBy::Category);
        assert_eq!(buckets[0].total, Money::new(i64::MAX));
        assert_eq!(buckets[1].total, Money::new(100));
        assert_eq!(total(&records), Money::new(i64::MAX));
        let shares = share(&buckets);
        assert_eq!(shares[0], ("Food".to_string(), 99));
    }

    #[test]
    fn share_rounds_down_and_handles_zero_total() {
        let buckets = vec![
            Bucket {
                key: "a".to_string(),
                total: Money::new(1),
            },
            Bucket {
                key: "b".to_string(),
                total: Money::new(2),
            },
        ];
        assert_eq!(
            share(&buckets),
            vec![("a".to_string(), 33), ("b".to_string(), 66)]
        );

        let empty = vec![Bucket {
            key: "a".to_string(),
            total: Money::ZERO,
        }];
        assert_eq!(share(&empty), vec![("a".to_string(), 0)]);
    }
}
