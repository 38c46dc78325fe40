//! Defines the store traits the view-models depend on and their SQLite
//! implementations.
//!
//! Stores are explicitly constructed and passed to their consumers; there is
//! no process-wide database handle. Every store exposes its rows as a
//! continuously updating snapshot through [tokio::sync::watch] in addition
//! to the plain read methods.

mod image;
pub mod sqlite;
mod transaction;

pub use image::ImageStore;
pub use transaction::TransactionStore;
