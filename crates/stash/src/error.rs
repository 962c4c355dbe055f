// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for client operations.

use crate::CodecError;

/// An error from a [`Client`](crate::Client) operation.
///
/// Errors from the store and the codec are passed through untouched: the client
/// never retries, translates or swallows them. A missing key is reported as
/// [`Error::NotFound`] regardless of which store is in use.
///
/// # Examples
///
/// ```
/// use stash::Error;
///
/// fn describe(result: stash::Result<String>) -> String {
///     match result {
///         Ok(value) => value,
///         Err(Error::NotFound) => "<miss>".to_string(),
///         Err(other) => format!("<error: {other}>"),
///     }
/// }
///
/// assert_eq!(describe(Err(Error::NotFound)), "<miss>");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The key does not exist, or has expired.
    #[error("key not found")]
    NotFound,

    /// The value could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The store reported a failure.
    #[error(transparent)]
    Store(#[from] stash_store::Error),
}

impl Error {
    /// Returns `true` for a cache miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// A specialized [`Result`] type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
