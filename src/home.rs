//! View-model for the home screen: the reactive transaction list plus the
//! random background image.

use std::io::Cursor;

use image::ImageFormat;
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::{
    Error,
    fetcher::RandomImageFetcher,
    models::{DatabaseId, SavedImage, Transaction},
    stores::{ImageStore, TransactionStore},
};

/// Drives the home screen: exposes the live transaction list, fetches and
/// holds the current background image, and lets the user persist it.
#[derive(Debug)]
pub struct HomeScreen<T, I> {
    transactions: T,
    images: I,
    fetcher: RandomImageFetcher,
    background: watch::Sender<Option<Vec<u8>>>,
}

impl<T: TransactionStore, I: ImageStore> HomeScreen<T, I> {
    /// Create the home screen over the two stores and an image fetcher.
    pub fn new(transaction_store: T, image_store: I, fetcher: RandomImageFetcher) -> Self {
        let (background, _) = watch::channel(None);

        Self {
            transactions: transaction_store,
            images: image_store,
            fetcher,
            background,
        }
    }

    /// Subscribe to the live transaction list.
    pub fn transactions(&self) -> watch::Receiver<Vec<Transaction>> {
        self.transactions.subscribe()
    }

    /// Subscribe to the saved-image gallery.
    pub fn gallery(&self) -> watch::Receiver<Vec<SavedImage>> {
        self.images.subscribe()
    }

    /// Subscribe to the currently displayed background image bytes.
    pub fn background(&self) -> watch::Receiver<Option<Vec<u8>>> {
        self.background.subscribe()
    }

    /// Replace the current background image with already fetched bytes.
    pub fn set_background(&mut self, image_bytes: Vec<u8>) {
        self.background.send_replace(Some(image_bytes));
    }

    /// Fetch a new random background image.
    ///
    /// On success the new image replaces the current one. On any failure a
    /// warning is logged and the previous image is kept, so the screen
    /// never loses its picture to a flaky connection.
    pub async fn refresh_background(&mut self) {
        let cache_buster =
            (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;

        match self.fetcher.fetch(cache_buster).await {
            Ok(image_bytes) => {
                self.background.send_replace(Some(image_bytes));
            }
            Err(error) => {
                tracing::warn!("could not refresh background image: {error}");
            }
        }
    }

    /// Re-encode the current background image as PNG and save it to the
    /// gallery.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no background image has been fetched yet,
    /// - [Error::ImageDecode] if the current image cannot be re-encoded,
    /// - or [Error::SqlError] if the gallery insert fails.
    pub fn save_background(&mut self) -> Result<SavedImage, Error> {
        let image_bytes = self
            .background
            .borrow()
            .clone()
            .ok_or(Error::NotFound)?;

        let decoded = image::load_from_memory(&image_bytes)
            .map_err(|error| Error::ImageDecode(error.to_string()))?;

        let mut png_bytes = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|error| Error::ImageDecode(error.to_string()))?;

        self.images.insert(png_bytes)
    }

    /// Delete a transaction from the list.
    ///
    /// Failures are logged rather than surfaced; the list snapshot simply
    /// does not change.
    pub fn delete_transaction(&mut self, id: DatabaseId) {
        if let Err(error) = self.transactions.delete(id) {
            tracing::error!("could not delete transaction {id}: {error}");
        }
    }
}
