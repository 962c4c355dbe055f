// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Byte-oriented key-value store abstraction for the `stash` cache client.
//!
//! This crate defines the [`Store`] trait that every store backend must satisfy,
//! along with the opaque [`Error`] type for failed store operations.
//!
//! # Overview
//!
//! A store only moves raw bytes. It knows nothing about namespaces or value types:
//! `stash` computes the effective key and encodes values before calling into the
//! store, and decodes whatever the store returns. A missing key is reported as
//! `Ok(None)`, never as an error, so each backend is free to map its own "not found"
//! condition and callers see one consistent miss signal from `stash`.
//!
//! # Implementing a Store
//!
//! ```
//! use stash_store::{Error, Store};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//! use std::time::Duration;
//!
//! struct SimpleStore(RwLock<HashMap<String, Vec<u8>>>);
//!
//! impl Store for SimpleStore {
//!     async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &str, value: Vec<u8>, _ttl: Option<Duration>) -> Result<(), Error> {
//!         self.0.write().unwrap().insert(key.to_owned(), value);
//!         Ok(())
//!     }
//!
//!     async fn set_if_absent(&self, key: &str, value: Vec<u8>, _ttl: Option<Duration>) -> Result<bool, Error> {
//!         let mut data = self.0.write().unwrap();
//!         if data.contains_key(key) {
//!             return Ok(false);
//!         }
//!         data.insert(key.to_owned(), value);
//!         Ok(true)
//!     }
//!
//!     async fn delete(&self, key: &str) -> Result<(), Error> {
//!         self.0.write().unwrap().remove(key);
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Testing
//!
//! Enable the `test-util` feature for [`testing::MockStore`], an in-memory store that
//! honours TTLs, records every operation and can be told to fail on demand.

pub mod error;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use store::Store;
