//! Implements a SQLite backed saved-image store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::{
    Error,
    models::{DatabaseId, SavedImage},
    stores::ImageStore,
};

/// Stores background images in a SQLite database and republishes the full
/// gallery snapshot after every successful mutation.
#[derive(Debug, Clone)]
pub struct SqliteImageStore {
    connection: Arc<Mutex<Connection>>,
    snapshot: Arc<watch::Sender<Vec<SavedImage>>>,
}

impl SqliteImageStore {
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

    fn publish(&self, connection: &Connection) {
        match list_rows(connection) {
            Ok(rows) => {
                self.snapshot.send_replace(rows);
            }
            Err(error) => tracing::error!("could not refresh image snapshot: {error}"),
        }
    }
}

impl ImageStore for SqliteImageStore {
    /// Save image bytes with the current wall-clock timestamp.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL
    /// error.
    fn insert(&mut self, image_blob: Vec<u8>) -> Result<SavedImage, Error> {
        let timestamp = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;

        let connection = self.connection.lock().unwrap();

        let image = connection
            .prepare(
                "INSERT OR REPLACE INTO random_images (image_blob, timestamp)
                 VALUES (?1, ?2)
                 RETURNING id, image_blob, timestamp",
            )?
            .query_row((&image_blob, timestamp), map_row)?;

        self.publish(&connection);

        Ok(image)
    }

    /// Retrieve all saved images, newest first.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL
    /// error.
    fn list_all(&self) -> Result<Vec<SavedImage>, Error> {
        list_rows(&self.connection.lock().unwrap())
    }

    /// Delete the saved image with the given identifier.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingImage] if no row matches the identifier,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseId) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();

        let rows_changed = connection.execute("DELETE FROM random_images WHERE id = ?1", [id])?;

        if rows_changed == 0 {
            return Err(Error::DeleteMissingImage);
        }

        self.publish(&connection);

        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<SavedImage>> {
        self.snapshot.subscribe()
    }
}

// Rows inserted within the same millisecond fall back to id order.
fn list_rows(connection: &Connection) -> Result<Vec<SavedImage>, Error> {
    connection
        .prepare("SELECT id, image_blob, timestamp FROM random_images ORDER BY timestamp DESC, id DESC")?
        .query_map([], map_row)?
        .map(|maybe_image| maybe_image.map_err(Error::SqlError))
        .collect()
}

/// Map a database row to a [SavedImage].
fn map_row(row: &Row) -> Result<SavedImage, rusqlite::Error> {
    Ok(SavedImage {
        id: row.get(0)?,
        image_blob: row.get(1)?,
        timestamp: row.get(2)?,
    })
}
