//! Defines the saved background image model.

use serde::{Deserialize, Serialize};

use super::DatabaseId;

/// A background image the user chose to keep in the local gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedImage {
    /// The ID of the saved image.
    pub id: DatabaseId,
    /// The PNG-encoded image bytes.
    pub image_blob: Vec<u8>,
    /// When the image was saved, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}
