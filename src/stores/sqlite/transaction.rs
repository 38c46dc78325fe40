//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params};
use tokio::sync::watch;

use crate::{
    Error,
    models::{DatabaseId, Transaction, TransactionDraft, TransactionKind, TransactionSummary},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database and republishes the full row
/// snapshot after every successful mutation.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    snapshot: Arc<watch::Sender<Vec<Transaction>>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`, seeding the snapshot
    /// channel with the rows currently in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the initial snapshot cannot be read.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        let rows = list_rows(&connection.lock().unwrap())?;
        let (snapshot, _) = watch::channel(rows);

        Ok(Self {
            connection,
            snapshot: Arc::new(snapshot),
        })
    }

    /// Re-query the table and push the result to all snapshot subscribers.
    ///
    /// Called with the connection lock already held so that subscribers
    /// never observe a snapshot older than the mutation that triggered it.
    fn publish(&self, connection: &Connection) {
        match list_rows(connection) {
            Ok(rows) => {
                self.snapshot.send_replace(rows);
            }
            Err(error) => tracing::error!("could not refresh transaction snapshot: {error}"),
        }
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NegativeAmount] if the draft's amount is negative,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(&mut self, draft: TransactionDraft) -> Result<Transaction, Error> {
        if draft.amount < 0.0 {
            return Err(Error::NegativeAmount(draft.amount));
        }

        let connection = self.connection.lock().unwrap();

        let transaction = connection
            .prepare(
                "INSERT INTO transactions (title, amount, date, kind)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, title, amount, date, kind",
            )?
            .query_row(
                (&draft.title, draft.amount, draft.date, draft.kind),
                map_row,
            )?;

        self.publish(&connection);

        Ok(transaction)
    }

    /// Replace the full row matching the transaction's identifier.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NegativeAmount] if the new amount is negative,
    /// - [Error::UpdateMissingTransaction] if no row matches the identifier,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error> {
        if transaction.amount < 0.0 {
            return Err(Error::NegativeAmount(transaction.amount));
        }

        let connection = self.connection.lock().unwrap();

        let rows_changed = connection.execute(
            "UPDATE transactions SET title = ?1, amount = ?2, date = ?3, kind = ?4 WHERE id = ?5",
            (
                &transaction.title,
                transaction.amount,
                transaction.date,
                transaction.kind,
                transaction.id,
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        self.publish(&connection);

        Ok(())
    }

    /// Delete the transaction with the given identifier.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if no row matches the identifier,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseId) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();

        let rows_changed = connection.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

        if rows_changed == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        self.publish(&connection);

        Ok(())
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseId) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, title, amount, date, kind FROM transactions WHERE id = :id")?
            .query_row(&[(":id", &id)], map_row)?;

        Ok(transaction)
    }

    /// Retrieve all transactions in insertion order.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL
    /// error.
    fn list_all(&self) -> Result<Vec<Transaction>, Error> {
        list_rows(&self.connection.lock().unwrap())
    }

    /// Retrieve the five largest expenses, ordered by amount descending.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL
    /// error.
    fn top_expenses(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, title, amount, date, kind FROM transactions
                 WHERE kind = ?1 ORDER BY amount DESC LIMIT 5",
            )?
            .query_map(params![TransactionKind::Expense], map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Sum the amounts of all transactions of `kind`, grouped by date and
    /// ordered by date ascending.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL
    /// error.
    fn summary_by_date(&self, kind: TransactionKind) -> Result<Vec<TransactionSummary>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT kind, date, SUM(amount) FROM transactions
                 WHERE kind = ?1 GROUP BY kind, date ORDER BY date ASC",
            )?
            .query_map(params![kind], |row| {
                Ok(TransactionSummary {
                    kind: row.get(0)?,
                    date: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .map(|maybe_summary| maybe_summary.map_err(Error::SqlError))
            .collect()
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Transaction>> {
        self.snapshot.subscribe()
    }
}

fn list_rows(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare("SELECT id, title, amount, date, kind FROM transactions")?
        .query_map([], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Map a database row to a [Transaction].
fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        kind: row.get(4)?,
    })
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        models::{Transaction, TransactionDraft, TransactionKind},
        stores::TransactionStore,
    };

    use super::SqliteTransactionStore;

    fn get_store() -> SqliteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SqliteTransactionStore::new(Arc::new(Mutex::new(conn))).unwrap()
    }

    fn draft(title: &str, amount: f64, kind: TransactionKind) -> TransactionDraft {
        TransactionDraft::new(title, amount, date!(2024 - 01 - 15), kind)
    }

    #[test]
    fn insert_assigns_id_and_round_trips() {
        let mut store = get_store();
        let want = draft("Groceries", 123.45, TransactionKind::Expense);

        let inserted = store.insert(want.clone()).unwrap();

        assert!(inserted.id > 0);
        assert_eq!(inserted.title, want.title);
        assert_eq!(inserted.amount, want.amount);
        assert_eq!(inserted.date, want.date);
        assert_eq!(inserted.kind, want.kind);

        let got = store.get(inserted.id).unwrap();
        assert_eq!(got, inserted);
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut store = get_store();

        let first = store
            .insert(draft("First", 1.0, TransactionKind::Income))
            .unwrap();
        let second = store
            .insert(draft("Second", 2.0, TransactionKind::Income))
            .unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn insert_rejects_negative_amounts() {
        let mut store = get_store();

        let result = store.insert(draft("Oops", -1.5, TransactionKind::Expense));

        assert_eq!(result, Err(Error::NegativeAmount(-1.5)));
        assert_eq!(store.list_all().unwrap(), vec![]);
    }

    #[test]
    fn get_fails_on_invalid_id() {
        let mut store = get_store();
        let transaction = store
            .insert(draft("Lunch", 25.0, TransactionKind::Expense))
            .unwrap();

        let maybe_transaction = store.get(transaction.id + 654);

        assert_eq!(maybe_transaction, Err(Error::NotFound));
    }

    #[test]
    fn update_replaces_the_full_row() {
        let mut store = get_store();
        let inserted = store
            .insert(draft("Lunhc", 25.0, TransactionKind::Expense))
            .unwrap();

        let corrected = Transaction {
            title: "Lunch".to_owned(),
            amount: 27.5,
            date: date!(2024 - 01 - 16),
            ..inserted
        };
        store.update(&corrected).unwrap();

        assert_eq!(store.get(inserted.id), Ok(corrected));
    }

    #[test]
    fn update_missing_row_reports_not_found_and_creates_nothing() {
        let mut store = get_store();

        let missing = Transaction {
            id: 1337,
            title: "Ghost".to_owned(),
            amount: 1.0,
            date: date!(2024 - 01 - 01),
            kind: TransactionKind::Income,
        };
        let result = store.update(&missing);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert_eq!(store.list_all().unwrap(), vec![]);
    }

    #[test]
    fn delete_missing_row_reports_not_found() {
        let mut store = get_store();

        assert_eq!(store.delete(42), Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn list_all_preserves_insertion_order() {
        let mut store = get_store();
        let want: Vec<Transaction> = (1..=3)
            .map(|i| {
                store
                    .insert(draft(
                        &format!("transaction #{i}"),
                        i as f64,
                        TransactionKind::Income,
                    ))
                    .unwrap()
            })
            .collect();

        let got = store.list_all().unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn top_expenses_returns_five_largest_descending() {
        let mut store = get_store();
        for i in 1..=10 {
            store
                .insert(draft(
                    &format!("expense #{i}"),
                    i as f64 * 10.0,
                    TransactionKind::Expense,
                ))
                .unwrap();
        }
        // Incomes must not show up even when they are larger.
        store
            .insert(draft("Salary", 10_000.0, TransactionKind::Income))
            .unwrap();

        let got = store.top_expenses().unwrap();

        let amounts: Vec<f64> = got.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![100.0, 90.0, 80.0, 70.0, 60.0]);
        assert!(got.iter().all(|t| t.kind == TransactionKind::Expense));
    }

    #[test]
    fn summary_groups_by_date_ascending() {
        let mut store = get_store();
        let cases = [
            (10.0, date!(2024 - 01 - 01)),
            (5.0, date!(2024 - 01 - 01)),
            (20.0, date!(2024 - 01 - 02)),
        ];
        for (amount, date) in cases {
            store
                .insert(TransactionDraft::new(
                    "Expense",
                    amount,
                    date,
                    TransactionKind::Expense,
                ))
                .unwrap();
        }
        store
            .insert(TransactionDraft::new(
                "Salary",
                100.0,
                date!(2024 - 01 - 01),
                TransactionKind::Income,
            ))
            .unwrap();

        let got = store.summary_by_date(TransactionKind::Expense).unwrap();

        let pairs: Vec<(time::Date, f64)> = got.iter().map(|s| (s.date, s.total)).collect();
        assert_eq!(
            pairs,
            vec![(date!(2024 - 01 - 01), 15.0), (date!(2024 - 01 - 02), 20.0)]
        );
        assert!(got.iter().all(|s| s.kind == TransactionKind::Expense));
    }

    #[test]
    fn subscribers_observe_each_mutation() {
        let mut store = get_store();
        let receiver = store.subscribe();
        assert_eq!(*receiver.borrow(), vec![]);

        let inserted = store
            .insert(draft("Coffee", 8.0, TransactionKind::Expense))
            .unwrap();
        assert_eq!(*receiver.borrow(), vec![inserted.clone()]);

        let renamed = Transaction {
            title: "Espresso".to_owned(),
            ..inserted
        };
        store.update(&renamed).unwrap();
        assert_eq!(*receiver.borrow(), vec![renamed.clone()]);

        store.delete(renamed.id).unwrap();
        assert_eq!(*receiver.borrow(), vec![]);
    }

    #[test]
    fn failed_mutations_do_not_publish() {
        let mut store = get_store();
        let inserted = store
            .insert(draft("Coffee", 8.0, TransactionKind::Expense))
            .unwrap();
        let mut receiver = store.subscribe();
        receiver.mark_unchanged();

        let _ = store.delete(inserted.id + 1);

        assert!(!receiver.has_changed().unwrap());
    }
}
