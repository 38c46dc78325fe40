//! Defines the transaction store trait.

use tokio::sync::watch;

use crate::{
    Error,
    models::{DatabaseId, Transaction, TransactionDraft, TransactionKind, TransactionSummary},
};

/// Handles the creation, retrieval and aggregation of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store and return it with its
    /// assigned identifier.
    ///
    /// The draft's identifier, if any, is ignored.
    fn insert(&mut self, draft: TransactionDraft) -> Result<Transaction, Error>;

    /// Replace the stored row matching the transaction's identifier.
    ///
    /// Implementers must report [Error::UpdateMissingTransaction] when no
    /// row matches, and must never create a new row.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error>;

    /// Delete the transaction with the given identifier.
    ///
    /// Implementers must report [Error::DeleteMissingTransaction] when no
    /// row matches.
    fn delete(&mut self, id: DatabaseId) -> Result<(), Error>;

    /// Retrieve a single transaction by its identifier.
    fn get(&self, id: DatabaseId) -> Result<Transaction, Error>;

    /// Retrieve all transactions in insertion order.
    fn list_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the five largest expenses, ordered by amount descending.
    fn top_expenses(&self) -> Result<Vec<Transaction>, Error>;

    /// Sum the amounts of all transactions of `kind`, grouped by date and
    /// ordered by date ascending.
    fn summary_by_date(&self, kind: TransactionKind) -> Result<Vec<TransactionSummary>, Error>;

    /// Subscribe to the store's row snapshot.
    ///
    /// The receiver holds the latest consistent snapshot of
    /// [TransactionStore::list_all] and is updated after every successful
    /// mutation.
    fn subscribe(&self) -> watch::Receiver<Vec<Transaction>>;
}
