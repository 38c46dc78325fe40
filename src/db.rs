//! Creates the database schema and applies migrations.

use rusqlite::{Connection, OptionalExtension, Transaction as SqlTransaction};

use crate::Error;

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    title  TEXT NOT NULL,
    amount REAL NOT NULL,
    date   TEXT NOT NULL,
    kind   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS random_images (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    image_blob BLOB NOT NULL,
    timestamp  INTEGER NOT NULL
);
"#;

/// The schema version a freshly initialized database is at.
pub const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1. Each entry is (from_version, sql).
const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE transactions ADD COLUMN note TEXT;"),
];

/// Create the application tables and bring the schema up to
/// [CURRENT_VERSION].
///
/// Runs inside a single exclusive SQL transaction and is safe to call on an
/// already initialized database.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema or a migration step cannot be
/// applied.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    transaction.execute_batch(SCHEMA_V1)?;

    let recorded: Option<i32> = transaction
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()?;

    match recorded {
        None => {
            // Fresh database: the schema above is already at the latest
            // version, so no migrations apply.
            transaction.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [CURRENT_VERSION],
            )?;
        }
        Some(mut version) => {
            for (from, sql) in MIGRATIONS {
                if *from >= version {
                    transaction.execute_batch(sql)?;
                    version = from + 1;
                }
            }

            transaction.execute("UPDATE schema_version SET version = ?1", [CURRENT_VERSION])?;
        }
    }

    transaction.commit()?;

    Ok(())
}

/// Open the database file at `path`, creating it if necessary, and bring
/// its schema up to date.
///
/// # Errors
/// Returns an [Error::SqlError] if the file cannot be opened or the schema
/// cannot be applied.
pub fn open_or_init(path: &std::path::Path) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    initialize(&connection)?;

    Ok(connection)
}

/// Read the schema version recorded in the database.
///
/// # Errors
/// Returns an [Error::NotFound] if no version row has been written, or an
/// [Error::SqlError] on any other SQL error.
pub fn schema_version(connection: &Connection) -> Result<i32, Error> {
    let version = connection.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}
