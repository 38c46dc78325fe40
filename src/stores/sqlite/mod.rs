//! SQLite backed implementations of the store traits.

mod image;
mod transaction;

pub use image::SqliteImageStore;
pub use transaction::SqliteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// Initialize the database schema and create the stores that share the
/// connection.
///
/// The connection is owned by the returned stores; dropping both closes it.
///
/// # Errors
/// Returns an error if the schema cannot be created or the initial row
/// snapshots cannot be read.
pub fn create_stores(
    connection: Connection,
) -> Result<(SqliteTransactionStore, SqliteImageStore), Error> {
    initialize(&connection)?;

    let connection = Arc::new(Mutex::new(connection));
    let transaction_store = SqliteTransactionStore::new(connection.clone())?;
    let image_store = SqliteImageStore::new(connection)?;

    Ok((transaction_store, image_store))
}
