// 🧾 Statement Entries - Immutable credit/debit records
//
// A customer's statement is an append-only list of entries. The balance is
// never stored: it is always folded from the entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

// ============================================================================
// ENTRY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money in (deposit)
    Credit,

    /// Money out (withdrawal)
    Debit,
}

// ============================================================================
// STATEMENT ENTRY
// ============================================================================

/// One line of a customer's statement
///
/// Fields are private: an entry cannot be changed once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementEntry {
    description: String,

    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,

    created_at: DateTime<Utc>,

    #[serde(rename = "type")]
    kind: EntryKind,
}

impl StatementEntry {
    /// Build an entry stamped with an explicit time
    pub fn new(
        description: String,
        amount: Decimal,
        kind: EntryKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        StatementEntry {
            description,
            amount,
            created_at,
            kind,
        }
    }

    /// Credit entry stamped now
    pub fn credit(description: String, amount: Decimal) -> Self {
        Self::new(description, amount, EntryKind::Credit, Utc::now())
    }

    /// Debit entry stamped now
    pub fn debit(description: String, amount: Decimal) -> Self {
        Self::new(description, amount, EntryKind::Debit, Utc::now())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Apply this entry to a running total
    pub fn apply_to(&self, total: Decimal) -> LedgerResult<Decimal> {
        let next = match self.kind {
            EntryKind::Credit => total.checked_add(self.amount),
            EntryKind::Debit => total.checked_sub(self.amount),
        };
        next.ok_or(LedgerError::Overflow)
    }

    /// Calendar date (UTC) the entry was recorded on
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

// ============================================================================
// STATEMENT QUERIES
// ============================================================================

/// Fold a statement into its balance: credits minus debits
pub fn balance(statement: &[StatementEntry]) -> LedgerResult<Decimal> {
    statement
        .iter()
        .try_fold(Decimal::ZERO, |total, entry| entry.apply_to(total))
}

/// Entries recorded on `date`, ignoring time of day, in statement order
pub fn entries_on(statement: &[StatementEntry], date: NaiveDate) -> Vec<StatementEntry> {
    statement
        .iter()
        .filter(|entry| entry.date() == date)
        .cloned()
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn entry(amount: Decimal, kind: EntryKind, created_at: DateTime<Utc>) -> StatementEntry {
        StatementEntry::new("test".to_string(), amount, kind, created_at)
    }

    #[test]
    fn test_empty_statement_balance_is_zero() {
        assert_eq!(balance(&[]), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_balance_credits_minus_debits() {
        let now = Utc::now();
        let statement = vec![
            entry(dec!(100), EntryKind::Credit, now),
            entry(dec!(40), EntryKind::Debit, now),
            entry(dec!(12.5), EntryKind::Credit, now),
            entry(dec!(0.25), EntryKind::Debit, now),
        ];

        assert_eq!(balance(&statement), Ok(dec!(72.25)));
    }

    #[test]
    fn test_balance_independent_of_order() {
        let now = Utc::now();
        let mut statement = vec![
            entry(dec!(30), EntryKind::Debit, now),
            entry(dec!(100), EntryKind::Credit, now),
            entry(dec!(20), EntryKind::Debit, now),
        ];
        let forward = balance(&statement).unwrap();
        statement.reverse();

        assert_eq!(forward, dec!(50));
        assert_eq!(balance(&statement), Ok(forward));
    }

    #[test_case(EntryKind::Credit, dec!(15) ; "credit adds")]
    #[test_case(EntryKind::Debit, dec!(-5) ; "debit subtracts")]
    fn test_apply_to(kind: EntryKind, expected: Decimal) {
        assert_eq!(entry(dec!(10), kind, Utc::now()).apply_to(dec!(5)), Ok(expected));
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let now = Utc::now();
        let statement = vec![
            entry(Decimal::MAX, EntryKind::Credit, now),
            entry(Decimal::MAX, EntryKind::Credit, now),
        ];

        assert_eq!(balance(&statement), Err(LedgerError::Overflow));
    }

    #[test]
    fn test_apply_to_underflow() {
        let debit = entry(Decimal::MAX, EntryKind::Debit, Utc::now());

        assert_eq!(debit.apply_to(dec!(-1)), Err(LedgerError::Overflow));
        assert_eq!(debit.apply_to(Decimal::MAX), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_entries_on_day_boundary() {
        let statement = vec![
            entry(dec!(1), EntryKind::Credit, at(2024, 3, 9, 23, 59)),
            entry(dec!(2), EntryKind::Credit, at(2024, 3, 10, 0, 0)),
            entry(dec!(3), EntryKind::Debit, at(2024, 3, 10, 23, 59)),
            entry(dec!(4), EntryKind::Credit, at(2024, 3, 11, 0, 0)),
        ];

        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let found = entries_on(&statement, day);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].amount(), dec!(2));
        assert_eq!(found[1].amount(), dec!(3));
    }

    #[test]
    fn test_entries_on_date_without_entries() {
        let statement = vec![entry(dec!(1), EntryKind::Credit, at(2024, 3, 9, 12, 0))];
        let day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();

        assert!(entries_on(&statement, day).is_empty());
    }

    #[test]
    fn test_entry_json_shape() {
        let e = entry(dec!(100), EntryKind::Credit, at(2024, 3, 10, 8, 30));
        let json = serde_json::to_value(&e).unwrap();

        assert_eq!(json["description"], "test");
        assert_eq!(json["amount"], 100.0);
        assert_eq!(json["type"], "credit");
        assert_eq!(json["createdAt"], "2024-03-10T08:30:00Z");
    }
}
