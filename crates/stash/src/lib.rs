// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A namespaced key-value cache client.
//!
//! [`Client`] is a thin layer over a remote key-value store. It offers four
//! operations, [`delete`](Client::delete), [`get`](Client::get),
//! [`set`](Client::set) and [`set_if_absent`](Client::set_if_absent), and does
//! three things on top of the store:
//!
//! - prefixes every key with a configurable [`Namespace`] (`prefix.key`),
//! - encodes values with a pluggable [`Codec`] ([`BincodeCodec`] by default),
//! - reports a missing key as [`Error::NotFound`], whatever the store.
//!
//! Connection handling, pooling and the wire protocol belong to the store. Any
//! type implementing [`Store`] can be used.
#![cfg_attr(
    feature = "redis",
    doc = r#"The default store is Redis, through [`RedisStore`].

# Examples

```no_run
use std::time::Duration;
use serde::{Deserialize, Serialize};
use stash::{Client, Configuration, Error};

#[derive(Serialize, Deserialize)]
struct Profile {
    name: String,
    visits: u32,
}

# async fn example() -> stash::Result<()> {
let client = Client::new(Configuration {
    addr: "redis://127.0.0.1:6379".to_string(),
    prefix: "profiles".to_string(),
});

// Stored under "profiles.ada" for ten minutes.
let profile = Profile { name: "Ada".to_string(), visits: 1 };
client.set("ada", &profile, Duration::from_secs(600)).await?;

// Only the first writer wins.
if client.set_if_absent("lock", &"worker-1", Duration::from_secs(30)).await? {
    println!("lock acquired");
}

match client.get::<Profile>("grace").await {
    Ok(profile) => println!("{} visited {} times", profile.name, profile.visits),
    Err(Error::NotFound) => println!("not cached"),
    Err(error) => return Err(error),
}

client.delete("ada").await?;
# Ok(())
# }
```
"#
)]
//!
//! # Features
//!
//! - `redis` (default): `RedisStore` and `Client::new`.
//! - `logs`: `Client::with_logs` emits a `tracing` event per operation.
//! - `test-util`: re-exports `MockStore` and `StoreOp` for testing code that uses a client.

mod client;
pub mod codec;
mod config;
mod error;
mod namespace;
mod telemetry;

#[doc(inline)]
pub use client::Client;
#[doc(inline)]
pub use codec::{BincodeCodec, Codec, CodecError, JsonCodec};
#[doc(inline)]
pub use config::{Configuration, DEFAULT_ADDR};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use namespace::{Namespace, SEPARATOR};
#[cfg(feature = "redis")]
#[doc(inline)]
pub use stash_redis::RedisStore;
#[doc(inline)]
pub use stash_store::{Error as StoreError, Store};

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use stash_store::testing::{MockStore, StoreOp};
