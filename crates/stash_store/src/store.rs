// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for key-value store backends.

use std::{sync::Arc, time::Duration};

use crate::Error;

/// Trait for byte-oriented key-value store connections.
///
/// Keys passed to a store are already namespaced and values are already encoded.
/// Implementations must be safe to share between concurrent callers; any queuing
/// or connection multiplexing happens behind this trait.
///
/// A `ttl` of `None` means the entry does not expire. Backends with millisecond
/// resolution round a non-zero sub-millisecond TTL up to one millisecond.
pub trait Store: Send + Sync {
    /// Reads the raw bytes stored under `key`.
    ///
    /// Returns `Ok(None)` when the key does not exist or has expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, Error>> + Send;

    /// Writes `value` under `key`, replacing any existing value.
    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Writes `value` under `key` only if the key does not exist.
    ///
    /// Returns `Ok(true)` when the value was written and `Ok(false)` when an
    /// existing value was left untouched. The check and the write must be atomic.
    fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Removes `key`. Removing a key that does not exist is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<S> Store for &S
where
    S: Store,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, Error>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set(key, value, ttl)
    }

    fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> impl Future<Output = Result<bool, Error>> + Send {
        (**self).set_if_absent(key, value, ttl)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).delete(key)
    }
}

impl<S> Store for Arc<S>
where
    S: Store,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, Error>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set(key, value, ttl)
    }

    fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> impl Future<Output = Result<bool, Error>> + Send {
        (**self).set_if_absent(key, value, ttl)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).delete(key)
    }
}
