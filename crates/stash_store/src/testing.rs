// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, an in-memory store that honours TTLs,
//! records all operations and supports failure injection for testing error paths.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{Error, Store};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A get operation was performed with the given key.
    Get(String),
    /// A set operation was performed.
    Set {
        /// The key that was written.
        key: String,
        /// The bytes that were written.
        value: Vec<u8>,
        /// The requested expiration.
        ttl: Option<Duration>,
    },
    /// A conditional set operation was performed.
    SetIfAbsent {
        /// The key that was written.
        key: String,
        /// The bytes that were offered.
        value: Vec<u8>,
        /// The requested expiration.
        ttl: Option<Duration>,
    },
    /// A delete operation was performed with the given key.
    Delete(String),
}

impl StoreOp {
    /// Returns the key this operation targeted.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Get(key) | Self::Delete(key) | Self::Set { key, .. } | Self::SetIfAbsent { key, .. } => key,
        }
    }
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

#[derive(Debug)]
struct StoredValue {
    bytes: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    /// A TTL too long to represent as an `Instant` never expires.
    fn new(bytes: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            bytes,
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

#[derive(Debug, Default)]
struct State {
    data: HashMap<String, StoredValue>,
    operations: Vec<StoreOp>,
}

impl State {
    fn live(&mut self, key: &str) -> Option<&StoredValue> {
        let now = Instant::now();
        if self.data.get(key).is_some_and(|value| !value.is_live(now)) {
            self.data.remove(key);
        }
        self.data.get(key)
    }
}

/// A configurable mock store for testing.
///
/// This store keeps values in memory, expires them lazily once their TTL has
/// elapsed, and can be configured to fail operations on demand. All operations are
/// recorded for later verification. Every operation runs under a single lock, so
/// `set_if_absent` is atomic.
///
/// Clones share the same data, operation log and failure predicate.
///
/// # Examples
///
/// ```
/// use stash_store::{Store, testing::{MockStore, StoreOp}};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// store.set("key", b"value".to_vec(), None).await.unwrap();
/// assert_eq!(store.get("key").await.unwrap(), Some(b"value".to_vec()));
///
/// assert_eq!(store.operations(), vec![
///     StoreOp::Set { key: "key".to_string(), value: b"value".to_vec(), ttl: None },
///     StoreOp::Get("key".to_string()),
/// ]);
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use stash_store::{Store, testing::{MockStore, StoreOp}};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "forbidden"));
/// assert!(store.get("forbidden").await.is_err());
/// assert!(store.get("allowed").await.is_ok());
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<State>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("state", &self.state)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store with pre-populated, non-expiring data.
    #[must_use]
    pub fn with_data<I, K>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let data = data
            .into_iter()
            .map(|(key, bytes)| (key.into(), StoredValue::new(bytes, None)))
            .collect();

        Self {
            state: Arc::new(Mutex::new(State {
                data,
                operations: Vec::new(),
            })),
            fail_when: Arc::default(),
        }
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// Failed operations are still recorded but leave the data untouched.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.state.lock().operations.clone()
    }

    /// Returns the number of recorded operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.state.lock().operations.len()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.state.lock().operations.clear();
    }

    /// Returns `true` if the store holds a live value for `key`.
    ///
    /// This does not record an operation.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.lock().live(key).is_some()
    }

    /// Returns the raw bytes stored under `key` without recording an operation.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().live(key).map(|value| value.bytes.clone())
    }

    fn check(&self, op: &StoreOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op));
        if fail {
            return Err(Error::caused_by(format!("mock: {} failed", op_name(op))));
        }
        Ok(())
    }

    /// Records `op`, then runs `apply` against the data unless the failure predicate matches.
    fn run<T>(&self, op: StoreOp, apply: impl FnOnce(&mut State) -> T) -> Result<T, Error> {
        let outcome = self.check(&op);
        let mut state = self.state.lock();
        state.operations.push(op);
        outcome.map(|()| apply(&mut state))
    }
}

fn op_name(op: &StoreOp) -> &'static str {
    match op {
        StoreOp::Get(_) => "get",
        StoreOp::Set { .. } => "set",
        StoreOp::SetIfAbsent { .. } => "set_if_absent",
        StoreOp::Delete(_) => "delete",
    }
}

impl Store for MockStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        self.run(StoreOp::Get(key.to_owned()), |state| {
            state.live(key).map(|value| value.bytes.clone())
        })
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), Error> {
        let op = StoreOp::Set {
            key: key.to_owned(),
            value: value.clone(),
            ttl,
        };
        self.run(op, |state| {
            state.data.insert(key.to_owned(), StoredValue::new(value, ttl));
        })
    }

    async fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<bool, Error> {
        let op = StoreOp::SetIfAbsent {
            key: key.to_owned(),
            value: value.clone(),
            ttl,
        };
        self.run(op, |state| {
            if state.live(key).is_some() {
                return false;
            }
            state.data.insert(key.to_owned(), StoredValue::new(value, ttl));
            true
        })
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.run(StoreOp::Delete(key.to_owned()), |state| {
            state.data.remove(key);
        })
    }
}
