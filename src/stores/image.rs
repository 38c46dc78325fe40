//! Defines the saved-image store trait.

use tokio::sync::watch;

use crate::{
    Error,
    models::{DatabaseId, SavedImage},
};

/// Handles the local gallery of saved background images.
pub trait ImageStore {
    /// Save PNG-encoded image bytes, timestamping them with the current
    /// time, and return the stored record.
    fn insert(&mut self, image_blob: Vec<u8>) -> Result<SavedImage, Error>;

    /// Retrieve all saved images, newest first.
    fn list_all(&self) -> Result<Vec<SavedImage>, Error>;

    /// Delete the saved image with the given identifier.
    ///
    /// Implementers must report [Error::DeleteMissingImage] when no row
    /// matches.
    fn delete(&mut self, id: DatabaseId) -> Result<(), Error>;

    /// Subscribe to the store's row snapshot, newest first, updated after
    /// every successful mutation.
    fn subscribe(&self) -> watch::Receiver<Vec<SavedImage>>;
}
