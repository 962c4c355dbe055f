// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Client configuration.

use serde::{Deserialize, Serialize};

/// Address used when none is configured.
pub const DEFAULT_ADDR: &str = "redis://127.0.0.1:6379";

/// Settings for [`Client::new`](crate::Client::new).
///
/// Deserializable, so it can be embedded in an application's own configuration.
/// Missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use stash::Configuration;
///
/// let configuration = Configuration::default()
///     .with_addr("cache.internal:6379")
///     .with_prefix("billing");
///
/// assert_eq!(configuration.addr, "cache.internal:6379");
/// assert_eq!(configuration.prefix, "billing");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Address of the store: a `redis://` URL or a bare `host:port`.
    pub addr: String,

    /// Namespace prepended to every key as `prefix.key`. Empty disables namespacing.
    pub prefix: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            prefix: String::new(),
        }
    }
}

impl Configuration {
    /// Sets the store address.
    #[must_use]
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    /// Sets the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}
