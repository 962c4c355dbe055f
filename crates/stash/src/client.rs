// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The namespaced cache client.

use std::{borrow::Cow, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use stash_store::Store;

use crate::telemetry::{Operation, Outcome, Telemetry};
use crate::{BincodeCodec, Codec, Error, Namespace, Result};

/// A key-value cache client that namespaces keys and encodes values.
///
/// Every operation is a single request to the underlying [`Store`]: the client
/// prefixes the key, encodes or decodes the value with its [`Codec`] and returns
/// whatever the store reported. It keeps no mutable state of its own, so one
/// client can be shared by reference or behind an `Arc` between any number of
/// concurrent tasks.
///
/// A `ttl` of [`Duration::ZERO`] means the entry does not expire.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stash::Client;
/// use stash_store::testing::MockStore;
///
/// # futures::executor::block_on(async {
/// let client = Client::with_store(MockStore::new(), "sessions");
///
/// client.set("42", &vec!["admin".to_string()], Duration::from_secs(600)).await?;
/// let roles: Vec<String> = client.get("42").await?;
/// assert_eq!(roles, ["admin"]);
///
/// assert!(matches!(client.get::<Vec<String>>("43").await, Err(stash::Error::NotFound)));
/// # Ok::<(), stash::Error>(())
/// # }).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Client<S, C = BincodeCodec> {
    store: S,
    codec: C,
    namespace: Namespace,
    telemetry: Telemetry,
}

#[cfg(feature = "redis")]
impl Client<stash_redis::RedisStore> {
    /// Creates a client for the Redis server in `configuration`.
    ///
    /// This never fails and performs no I/O: the connection is opened by the first
    /// operation, which also reports any problem with the address.
    #[must_use]
    pub fn new(configuration: crate::Configuration) -> Self {
        Self::with_store(stash_redis::RedisStore::new(configuration.addr), configuration.prefix)
    }
}

impl<S> Client<S>
where
    S: Store,
{
    /// Creates a client over any store, using the default [`BincodeCodec`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stash::Client;
    /// use stash_store::testing::MockStore;
    ///
    /// let client = Client::with_store(MockStore::new(), "app");
    /// assert_eq!(client.key("user"), "app.user");
    /// ```
    #[must_use]
    pub fn with_store(store: S, prefix: impl Into<Namespace>) -> Self {
        Self {
            store,
            codec: BincodeCodec,
            namespace: prefix.into(),
            telemetry: Telemetry::default(),
        }
    }
}

impl<S, C> Client<S, C> {
    /// Replaces the codec used for values.
    ///
    /// Values written with one codec generally cannot be read with another.
    #[must_use]
    pub fn with_codec<C2>(self, codec: C2) -> Client<S, C2>
    where
        C2: Codec,
    {
        Client {
            store: self.store,
            codec,
            namespace: self.namespace,
            telemetry: self.telemetry,
        }
    }

    /// Enables a `tracing` event for every operation.
    #[cfg(any(feature = "logs", test))]
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            telemetry: self.telemetry.with_logs(),
            ..self
        }
    }

    /// Returns the key prefix. Empty when namespacing is disabled.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.namespace.prefix()
    }

    /// Returns the namespace applied to keys.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns the key under which `key` is kept in the store.
    #[must_use]
    pub fn key<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        self.namespace.key(key)
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the codec used for values.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn finish<T>(&self, operation: Operation, key: &str, result: Result<T>, outcome: impl FnOnce(&T) -> Outcome) -> Result<T> {
        match &result {
            Ok(value) => self.telemetry.record(operation, key, outcome(value), None),
            Err(Error::NotFound) => self.telemetry.record(operation, key, Outcome::Miss, None),
            Err(error) => self.telemetry.record(operation, key, Outcome::Failed, Some(error)),
        }
        result
    }
}

impl<S, C> Client<S, C>
where
    S: Store,
    C: Codec,
{
    /// Removes `key`. Removing a key that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store fails.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let key = self.key(key);
        let result = self.store.delete(&key).await.map_err(Error::from);
        self.finish(Operation::Delete, &key, result, |()| Outcome::Deleted)
    }

    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the key does not exist or has expired,
    /// [`Error::Store`] if the store fails and [`Error::Codec`] if the stored bytes
    /// cannot be decoded as `T`.
    pub async fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let key = self.key(key);
        let result = self.fetch(&key).await;
        self.finish(Operation::Get, &key, result, |_| Outcome::Hit)
    }

    /// Reads the value stored under `key` into `destination`.
    ///
    /// `destination` is only assigned once the value has been read and fully
    /// decoded. On any error, including a miss, it keeps its previous value.
    ///
    /// # Errors
    ///
    /// Same as [`Client::get`].
    pub async fn get_into<T>(&self, key: &str, destination: &mut T) -> Result<()>
    where
        T: DeserializeOwned,
    {
        *destination = self.get(key).await?;
        Ok(())
    }

    /// Writes `value` under `key`, replacing any existing value.
    ///
    /// The value is encoded before the store is contacted; if encoding fails the
    /// store is never called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if `value` cannot be encoded and [`Error::Store`]
    /// if the store fails.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self.key(key);
        let result = match self.codec.encode(value) {
            Ok(bytes) => self.store.set(&key, bytes, expiry(ttl)).await.map_err(Error::from),
            Err(error) => Err(error.into()),
        };
        self.finish(Operation::Set, &key, result, |()| Outcome::Stored)
    }

    /// Writes `value` under `key` only if the key does not exist.
    ///
    /// Returns `true` when the value was written and `false` when an existing
    /// value was left in place. The existence check and the write happen
    /// atomically in the store. As with [`Client::set`], nothing is sent to the
    /// store if encoding fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if `value` cannot be encoded and [`Error::Store`]
    /// if the store fails.
    pub async fn set_if_absent<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<bool>
    where
        T: Serialize + ?Sized,
    {
        let key = self.key(key);
        let result = match self.codec.encode(value) {
            Ok(bytes) => self.store.set_if_absent(&key, bytes, expiry(ttl)).await.map_err(Error::from),
            Err(error) => Err(error.into()),
        };
        self.finish(Operation::SetIfAbsent, &key, result, |stored| {
            if *stored { Outcome::Stored } else { Outcome::Kept }
        })
    }

    async fn fetch<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.store.get(key).await?.ok_or(Error::NotFound)?;
        Ok(self.codec.decode(&bytes)?)
    }
}

fn expiry(ttl: Duration) -> Option<Duration> {
    (!ttl.is_zero()).then_some(ttl)
}
