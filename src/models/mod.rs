//! Defines the domain models: transactions, derived summaries and saved
//! background images.

mod saved_image;
mod transaction;

pub use saved_image::SavedImage;
pub use transaction::{
    DatabaseId, Transaction, TransactionDraft, TransactionKind, TransactionSummary,
};
