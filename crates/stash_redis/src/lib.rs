// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Redis-backed store for the `stash` cache client.
//!
//! [`RedisStore`] implements [`stash_store::Store`] on top of the `redis` crate's
//! [`ConnectionManager`](redis::aio::ConnectionManager), a multiplexed connection
//! that reconnects on its own. Wire protocol, multiplexing and reconnection all
//! live in `redis`; this crate only maps the four store operations onto commands.
//!
//! Creating a store never fails and never touches the network. The connection is
//! opened by the first operation, and any addressing or connection problem is
//! reported as a [`stash_store::Error`] from that operation.
//!
//! ```no_run
//! use stash_redis::RedisStore;
//! use stash_store::Store;
//!
//! # async fn example() -> Result<(), stash_store::Error> {
//! let store = RedisStore::new("localhost:6379");
//! store.set("greeting", b"hello".to_vec(), None).await?;
//! assert_eq!(store.get("greeting").await?, Some(b"hello".to_vec()));
//! # Ok(())
//! # }
//! ```

mod store;

#[doc(inline)]
pub use store::RedisStore;
