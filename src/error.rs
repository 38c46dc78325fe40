//! Defines the application level error type.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date string could not be parsed as a `dd/MM/yyyy` calendar date.
    ///
    /// This is the single error kind for date-parse failures: every call
    /// site that parses a user supplied date reports it, none silently
    /// substitutes a default.
    #[error("could not parse \"{0}\" as a dd/MM/yyyy date")]
    InvalidDateFormat(String),

    /// A negative amount was used to create or update a transaction.
    ///
    /// Amounts are stored non-negative; the direction of a transaction is
    /// carried by its kind (income or expense).
    #[error("transaction amounts must not be negative, got {0}")]
    NegativeAmount(f64),

    /// The requested resource could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a saved image that does not exist
    #[error("tried to delete an image that is not in the database")]
    DeleteMissingImage,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The image request failed before a response body could be read.
    ///
    /// Covers connection errors and non-2xx status codes. The underlying
    /// error is carried as a string so that this type stays comparable.
    #[error("image request failed: {0}")]
    Network(String),

    /// The fetched or stored bytes could not be decoded as an image.
    #[error("could not decode image data: {0}")]
    ImageDecode(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JsonSerialization(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(value.to_string())
    }
}
