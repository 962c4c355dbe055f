// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for store operations.

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error from a store operation.
///
/// This is an opaque error type that can wrap any underlying error from a store
/// implementation: network failures, timeouts, protocol errors. It displays as its
/// cause. Use [`Error::downcast_ref`] to inspect the backend error when needed.
///
/// # Example
///
/// ```
/// use stash_store::Error;
///
/// let error = Error::caused_by("connection refused");
/// assert_eq!(error.to_string(), "connection refused");
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{cause}")]
pub struct Error {
    cause: BoxedCause,
}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    pub fn caused_by(cause: impl Into<BoxedCause>) -> Self {
        Self { cause: cause.into() }
    }

    /// Returns the underlying cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Returns the underlying cause if it is of type `E`.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.cause.downcast_ref::<E>()
    }

    /// Consumes the error and returns the underlying cause.
    #[must_use]
    pub fn into_cause(self) -> BoxedCause {
        self.cause
    }
}

/// A specialized [`Result`] type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
