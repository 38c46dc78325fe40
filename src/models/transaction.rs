//! Defines the transaction model and the derived per-date summary.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

/// Alias for the integer type used for database row identifiers.
pub type DatabaseId = i64;

/// The direction of a transaction: money earned or money spent.
///
/// The direction is stored separately from the amount; amounts are always
/// non-negative and their signed contribution to totals is derived from the
/// kind at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned ("Receita" in the app's locale).
    Income,
    /// Money spent ("Despesa" in the app's locale).
    Expense,
}

impl TransactionKind {
    /// The canonical string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    /// Accepts the canonical English names and the Portuguese names used by
    /// the app's UI, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "income" | "receita" => Ok(TransactionKind::Income),
            "expense" | "despesa" => Ok(TransactionKind::Expense),
            other => Err(format!(
                "unknown transaction kind \"{other}\", expected \"income\" or \"expense\""
            )),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Income" => Ok(TransactionKind::Income),
            "Expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind \"{other}\" in database").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// A `Transaction` always has a database identifier; use [TransactionDraft]
/// for a record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// A free-text label describing the transaction.
    pub title: String,
    /// The amount of money spent or earned. Always non-negative; the
    /// direction is carried by `kind`.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
}

impl Transaction {
    /// Convert the transaction back into a draft, keeping its identifier.
    ///
    /// Used to prefill the edit form: saving the returned draft updates the
    /// original row instead of inserting a new one.
    pub fn into_draft(self) -> TransactionDraft {
        TransactionDraft {
            id: Some(self.id),
            title: self.title,
            amount: self.amount,
            date: self.date,
            kind: self.kind,
        }
    }
}

/// A transaction as entered in the add/edit form, before it is persisted.
///
/// The identifier is `None` for a brand new record and `Some` for a record
/// that was loaded for editing; the editor uses its presence to decide
/// between insert and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// The ID of the transaction being edited, or `None` when creating one.
    pub id: Option<DatabaseId>,
    /// A free-text label describing the transaction.
    pub title: String,
    /// The amount of money spent or earned. Must be non-negative.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
}

impl TransactionDraft {
    /// Create a draft for a new, not-yet-persisted transaction.
    pub fn new(title: &str, amount: f64, date: Date, kind: TransactionKind) -> Self {
        Self {
            id: None,
            title: title.to_owned(),
            amount,
            date,
            kind,
        }
    }
}

/// The total amount of all transactions of one kind on one date.
///
/// Produced by a read query to feed the stats chart; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    /// The kind the summary was filtered by.
    pub kind: TransactionKind,
    /// The date the transactions were grouped by.
    pub date: Date,
    /// The sum of the amounts of the grouped transactions.
    pub total: f64,
}

#[cfg(test)]
mod transaction_kind_tests {
    use std::str::FromStr;

    use super::TransactionKind;

    #[test]
    fn parses_english_and_portuguese_names() {
        assert_eq!(
            TransactionKind::from_str("income"),
            Ok(TransactionKind::Income)
        );
        assert_eq!(
            TransactionKind::from_str("Receita"),
            Ok(TransactionKind::Income)
        );
        assert_eq!(
            TransactionKind::from_str("EXPENSE"),
            Ok(TransactionKind::Expense)
        );
        assert_eq!(
            TransactionKind::from_str("despesa"),
            Ok(TransactionKind::Expense)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(TransactionKind::from_str("transfer").is_err());
    }
}
