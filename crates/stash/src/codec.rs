// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Value encoding.
//!
//! The client never inspects values. It hands them to a [`Codec`] on the way in
//! and out of the store, so any `serde` type can be cached and the wire format is
//! a choice of the caller.

use std::fmt::{self, Display};

use serde::{Serialize, de::DeserializeOwned};

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Converts values to and from the bytes kept in the store.
///
/// # Examples
///
/// ```
/// use stash::{BincodeCodec, Codec};
///
/// let codec = BincodeCodec;
/// let bytes = codec.encode(&("answer", 42_u32)).unwrap();
/// let value: (String, u32) = codec.decode(&bytes).unwrap();
/// assert_eq!(value, ("answer".to_string(), 42));
/// ```
pub trait Codec: Send + Sync {
    /// Encodes `value` into bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented in this format.
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;

    /// Decodes a value from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid encoding of `T`.
    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

/// Compact binary encoding using `bincode`. This is the default codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        bincode::serialize(value).map_err(CodecError::encode)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        bincode::deserialize(bytes).map_err(CodecError::decode)
    }
}

/// JSON encoding using `serde_json`.
///
/// Larger than [`BincodeCodec`] but readable by anything else that talks to the
/// same store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map_err(CodecError::encode)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(CodecError::decode)
    }
}

impl<C> Codec for &C
where
    C: Codec,
{
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        (**self).encode(value)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        (**self).decode(bytes)
    }
}

/// Which way a [`CodecError`] happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Value to bytes.
    Encode,
    /// Bytes to value.
    Decode,
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
        })
    }
}

/// An error raised while encoding or decoding a value.
#[derive(Debug, thiserror::Error)]
#[error("failed to {direction} value: {cause}")]
pub struct CodecError {
    direction: Direction,
    cause: BoxedCause,
}

impl CodecError {
    /// Creates an encoding error. Intended for custom [`Codec`] implementations.
    pub fn encode(cause: impl Into<BoxedCause>) -> Self {
        Self {
            direction: Direction::Encode,
            cause: cause.into(),
        }
    }

    /// Creates a decoding error. Intended for custom [`Codec`] implementations.
    pub fn decode(cause: impl Into<BoxedCause>) -> Self {
        Self {
            direction: Direction::Decode,
            cause: cause.into(),
        }
    }

    /// Returns whether encoding or decoding failed.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the underlying cause if it is of type `E`.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.cause.downcast_ref::<E>()
    }
}
