//! Typed projection of a record
//!
//! The projector turns raw attribute text into a `ClientView` using a
//! `FieldSchema` (which attribute is which) and `ProjectionOptions` (how to
//! coerce). It never fails because of bad data: entries that cannot be read
//! as a decimal or a date are kept as their original text.
//!
//! # Pairing policy
//!
//! Balances and dates are zipped by position into transactions. When the two
//! lists differ in length the pairing is padded to the longer list and the
//! missing half of each extra pair is `None`.
//!
//! # Empty entries
//!
//! Empty balance or date entries carry no information for the view and are
//! skipped, so an empty attribute projects to an empty list.

use crate::types::{
    ClientView, FieldSchema, FieldValue, LatestBalance, ProjectionOptions, Record, Transaction,
    DATE_FORMAT, VALUE_MARK,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

/// Builds typed views of records for one field schema
#[derive(Debug, Clone, Default)]
pub struct TypeProjector {
    schema: FieldSchema,
}

impl TypeProjector {
    pub fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Project a record into its typed view
    ///
    /// # Arguments
    ///
    /// * `record` - The parsed record
    /// * `options` - Coercion switches and the `latest_balance` selector
    ///
    /// # Returns
    ///
    /// The `ClientView`. Positions missing from the record project as empty
    /// text or empty lists.
    pub fn project(&self, record: &Record, options: &ProjectionOptions) -> ClientView {
        let balances: Vec<FieldValue> = entries(&record.attribute_text(self.schema.balances))
            .map(|entry| coerce_number(entry, options.parse_numbers))
            .collect();
        let dates: Vec<FieldValue> = entries(&record.attribute_text(self.schema.dates))
            .map(|entry| coerce_date(entry, options.parse_dates))
            .collect();

        let current_balance = select_balance(&balances, options.latest_balance).cloned();
        let transactions = pair_transactions(&balances, &dates);

        ClientView {
            client_id: record.attribute_text(self.schema.id),
            client_name: record.attribute_text(self.schema.name),
            current_balance,
            legacy_balances_history: balances,
            transaction_dates: dates,
            transactions,
            data_source: self.schema.data_source.clone(),
        }
    }
}

/// Non-empty value entries of an attribute
fn entries(text: &str) -> impl Iterator<Item = &str> {
    text.split(VALUE_MARK).filter(|entry| !entry.is_empty())
}

/// Interpret an entry as an exact decimal, falling back to the raw text
///
/// Entries that would need rounding to fit a `Decimal` (more than 28
/// fractional digits) stay as text.
pub fn coerce_number(entry: &str, parse_numbers: bool) -> FieldValue {
    if !parse_numbers {
        return FieldValue::Text(entry.to_string());
    }
    match Decimal::from_str_exact(entry.trim()) {
        Ok(decimal) => FieldValue::Number(decimal),
        Err(e) => {
            debug!(entry, error = %e, "balance entry kept as text");
            FieldValue::Text(entry.to_string())
        }
    }
}

/// Interpret an entry as a `%Y-%m-%d` date, falling back to the raw text
pub fn coerce_date(entry: &str, parse_dates: bool) -> FieldValue {
    if !parse_dates {
        return FieldValue::Text(entry.to_string());
    }
    match NaiveDate::parse_from_str(entry.trim(), DATE_FORMAT) {
        Ok(date) => FieldValue::Date(date),
        Err(e) => {
            debug!(entry, error = %e, "date entry kept as text");
            FieldValue::Text(entry.to_string())
        }
    }
}

/// Pick the `current_balance` entry
pub fn select_balance(balances: &[FieldValue], latest: LatestBalance) -> Option<&FieldValue> {
    match latest {
        LatestBalance::First => balances.first(),
        LatestBalance::Last => balances.last(),
    }
}

/// Zip balances and dates by position, padding the shorter side with `None`
pub fn pair_transactions(balances: &[FieldValue], dates: &[FieldValue]) -> Vec<Transaction> {
    let length = balances.len().max(dates.len());
    (0..length)
        .map(|index| Transaction {
            amount: balances.get(index).cloned(),
            date: dates.get(index).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delimiter::parse_record;
    use rstest::rstest;
    use std::str::FromStr;

    fn number(text: &str) -> FieldValue {
        FieldValue::Number(Decimal::from_str(text).unwrap())
    }

    fn date(text: &str) -> FieldValue {
        FieldValue::Date(NaiveDate::parse_from_str(text, DATE_FORMAT).unwrap())
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn test_transaction_pairing() {
        let record = parse_record("101^John^100]50^2024-01-01]2024-02-01");
        let view = TypeProjector::default().project(&record, &ProjectionOptions::default());

        assert_eq!(
            view.transactions,
            vec![
                Transaction {
                    amount: Some(number("100")),
                    date: Some(date("2024-01-01")),
                },
                Transaction {
                    amount: Some(number("50")),
                    date: Some(date("2024-02-01")),
                },
            ]
        );
        assert_eq!(
            serde_json::to_value(&view.transactions).unwrap(),
            serde_json::json!([
                {"amount": "100", "date": "2024-01-01"},
                {"amount": "50", "date": "2024-02-01"}
            ])
        );
    }

    #[rstest]
    #[case::last(LatestBalance::Last, "50")]
    #[case::first(LatestBalance::First, "100")]
    fn test_latest_balance(#[case] latest: LatestBalance, #[case] expected: &str) {
        let record = parse_record("101^John^100]50^2024-01-01]2024-02-01");
        let options = ProjectionOptions {
            latest_balance: latest,
            ..ProjectionOptions::default()
        };
        let view = TypeProjector::default().project(&record, &options);
        assert_eq!(view.current_balance, Some(number(expected)));
    }

    #[test]
    fn test_bad_entries_degrade_to_text() {
        let record = parse_record("9^Bad^12.50]n/a]50\\25^2024-13-01]yesterday]2024-02-29");
        let view = TypeProjector::default().project(&record, &ProjectionOptions::default());

        assert_eq!(
            view.legacy_balances_history,
            vec![number("12.50"), text("n/a"), text("50\\25")]
        );
        assert_eq!(
            view.transaction_dates,
            vec![text("2024-13-01"), text("yesterday"), date("2024-02-29")]
        );
        assert_eq!(view.current_balance, Some(text("50\\25")));
    }

    #[rstest]
    #[case::too_many_fraction_digits("1.00000000000000000000000000001")]
    #[case::would_round_last_digit("0.12345678901234567890123456789")]
    fn test_inexact_number_stays_text(#[case] entry: &str) {
        assert_eq!(coerce_number(entry, true), text(entry));
    }

    #[test]
    fn test_decimal_scale_survives() {
        let record = parse_record("101^John Doe^2500.00]400.00]12.50");
        let view = TypeProjector::default().project(&record, &ProjectionOptions::default());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json["legacy_balances_history"],
            serde_json::json!(["2500.00", "400.00", "12.50"])
        );
        assert_eq!(json["current_balance"], "12.50");
    }

    #[test]
    fn test_parsing_switched_off() {
        let record = parse_record("101^John^100]50^2024-01-01");
        let options = ProjectionOptions {
            parse_numbers: false,
            parse_dates: false,
            ..ProjectionOptions::default()
        };
        let view = TypeProjector::default().project(&record, &options);

        assert_eq!(view.legacy_balances_history, vec![text("100"), text("50")]);
        assert_eq!(view.transaction_dates, vec![text("2024-01-01")]);
    }

    #[rstest]
    #[case::more_dates(
        "104^Lisa^100.00]50.00^2024-05-01]2024-05-15]2024-06-01",
        3,
        Transaction { amount: None, date: Some(date("2024-06-01")) }
    )]
    #[case::more_balances(
        "105^Mo^1]2]3^2024-05-01",
        3,
        Transaction { amount: Some(number("3")), date: None }
    )]
    fn test_mismatched_counts_are_padded(
        #[case] line: &str,
        #[case] expected_len: usize,
        #[case] expected_last: Transaction,
    ) {
        let view = TypeProjector::default()
            .project(&parse_record(line), &ProjectionOptions::default());
        assert_eq!(view.transactions.len(), expected_len);
        assert_eq!(view.transactions.last(), Some(&expected_last));
    }

    #[test]
    fn test_empty_and_missing_attributes() {
        let record = parse_record("103^Alex Chen^9800.00^^2024-04-20");
        let view = TypeProjector::default().project(&record, &ProjectionOptions::default());

        assert_eq!(view.client_id, "103");
        assert_eq!(view.client_name, "Alex Chen");
        assert_eq!(view.legacy_balances_history, vec![number("9800.00")]);
        assert!(view.transaction_dates.is_empty());
        assert_eq!(view.transactions.len(), 1);

        let bare = parse_record("106");
        let view = TypeProjector::default().project(&bare, &ProjectionOptions::default());
        assert_eq!(view.client_name, "");
        assert_eq!(view.current_balance, None);
        assert!(view.transactions.is_empty());
    }

    #[test]
    fn test_custom_schema() {
        let schema = FieldSchema::new(1, 4, 2, 3).unwrap();
        let record = parse_record("7^10]20^2024-01-01]2024-01-02^Renamed");
        let view = TypeProjector::new(schema).project(&record, &ProjectionOptions::default());

        assert_eq!(view.client_name, "Renamed");
        assert_eq!(view.current_balance, Some(number("20")));
        assert_eq!(view.transaction_dates.len(), 2);
    }
}
