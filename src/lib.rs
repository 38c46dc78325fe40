//! Carteira is the data and aggregation core of a personal-finance app:
//! a SQLite transaction ledger, balance/income/expense aggregation with
//! pt-BR currency formatting, a random background-image fetcher with a
//! local gallery, and the view-models that tie them together.
//!
//! The crate exposes no UI; consumers subscribe to the stores' and
//! view-models' watch channels and render the snapshots however they like.
//! The bundled CLI binary is one such consumer.

#![warn(missing_docs)]

pub mod aggregation;
pub mod currency;
pub mod dates;
pub mod db;
pub mod editor;
mod error;
pub mod fetcher;
pub mod home;
pub mod models;
pub mod stores;

pub use error::Error;
