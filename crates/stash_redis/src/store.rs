// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{borrow::Cow, fmt::Debug, time::Duration};

use redis::{Cmd, RedisError, Value, aio::ConnectionManager};
use stash_store::{Error, Store};
use tokio::sync::OnceCell;

const DEFAULT_SCHEME: &str = "redis://";

/// Longest expiry sent as `PX`. Redis adds the expiry to the current time as a
/// signed 64-bit millisecond count and rejects values that would overflow it.
const MAX_EXPIRY_MILLIS: u64 = i64::MAX.unsigned_abs() / 2;

/// A [`Store`] backed by a Redis server.
///
/// The store holds a single multiplexed [`ConnectionManager`] that every operation
/// clones, so one `RedisStore` can serve any number of concurrent callers. The
/// connection is established lazily by the first operation; if that fails the
/// error is returned and the next operation tries again.
///
/// # Examples
///
/// ```
/// use stash_redis::RedisStore;
///
/// // No I/O happens here, so this works without a server.
/// let store = RedisStore::new("127.0.0.1:6379");
/// assert_eq!(store.addr(), Some("127.0.0.1:6379"));
/// ```
pub struct RedisStore {
    addr: Option<String>,
    connection: OnceCell<ConnectionManager>,
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("addr", &self.addr)
            .field("connected", &self.connection.initialized())
            .finish()
    }
}

impl RedisStore {
    /// Creates a store for the server at `addr`.
    ///
    /// `addr` is either a Redis URL (`redis://host:port/db`, `rediss://...`) or a
    /// bare `host:port`, which is treated as `redis://host:port`. The address is
    /// not validated until the first operation.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: Some(addr.into()),
            connection: OnceCell::new(),
        }
    }

    /// Creates a store over an already established connection.
    #[must_use]
    pub fn from_connection_manager(connection: ConnectionManager) -> Self {
        Self {
            addr: None,
            connection: OnceCell::from(connection),
        }
    }

    /// Returns the configured server address, if the store was created from one.
    #[must_use]
    pub fn addr(&self) -> Option<&str> {
        self.addr.as_deref()
    }

    async fn connection(&self) -> Result<ConnectionManager, Error> {
        self.connection
            .get_or_try_init(|| self.connect())
            .await
            .cloned()
    }

    async fn connect(&self) -> Result<ConnectionManager, Error> {
        let addr = self
            .addr
            .as_deref()
            .ok_or_else(|| Error::caused_by("redis: no server address configured"))?;
        let client = redis::Client::open(&*connection_url(addr)).map_err(store_error)?;
        ConnectionManager::new(client).await.map_err(store_error)
    }
}

impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let mut connection = self.connection().await?;
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut connection)
            .await
            .map_err(store_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), Error> {
        let mut connection = self.connection().await?;
        let _: Value = set_command(key, &value, ttl, false)
            .query_async(&mut connection)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<bool, Error> {
        let mut connection = self.connection().await?;
        let reply: Value = set_command(key, &value, ttl, true)
            .query_async(&mut connection)
            .await
            .map_err(store_error)?;
        // SET ... NX answers nil when the key already exists.
        Ok(written(&reply))
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut connection = self.connection().await?;
        let _: Value = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut connection)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

fn store_error(error: RedisError) -> Error {
    Error::caused_by(error)
}

fn connection_url(addr: &str) -> Cow<'_, str> {
    if addr.contains("://") {
        Cow::Borrowed(addr)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEME}{addr}"))
    }
}

/// Converts a TTL into the millisecond argument of `PX`.
///
/// Zero means no expiry. Anything shorter than a millisecond is rounded up so the
/// entry still expires instead of living forever. Very long TTLs are capped at
/// [`MAX_EXPIRY_MILLIS`].
fn expiry_millis(ttl: Option<Duration>) -> Option<u64> {
    let ttl = ttl.filter(|ttl| !ttl.is_zero())?;
    let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    Some(millis.clamp(1, MAX_EXPIRY_MILLIS))
}

/// `SET ... NX` replies nil when the key already existed.
fn written(reply: &Value) -> bool {
    !matches!(reply, Value::Nil)
}

fn set_command(key: &str, value: &[u8], ttl: Option<Duration>, only_if_absent: bool) -> Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value);
    if only_if_absent {
        cmd.arg("NX");
    }
    if let Some(millis) = expiry_millis(ttl) {
        cmd.arg("PX").arg(millis);
    }
    cmd
}
