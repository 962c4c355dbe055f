// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key namespacing.

use std::borrow::Cow;

/// Separator placed between the prefix and the caller's key.
pub const SEPARATOR: char = '.';

/// A key prefix shared by every key a [`Client`](crate::Client) touches.
///
/// With a non-empty prefix `p`, key `k` is stored as `p.k`. An empty prefix
/// disables namespacing and keys are used unchanged. Neither part is escaped, so
/// `Namespace::new("a").key("b.c")` and `Namespace::new("a.b").key("c")` name the
/// same entry.
///
/// # Examples
///
/// ```
/// use stash::Namespace;
///
/// assert_eq!(Namespace::new("sessions").key("42"), "sessions.42");
/// assert_eq!(Namespace::new("").key("42"), "42");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Creates a namespace with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Returns the prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` if keys pass through unchanged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Returns the effective store key for `key`.
    ///
    /// Borrows `key` when the prefix is empty.
    #[must_use]
    pub fn key<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        if self.prefix.is_empty() {
            return Cow::Borrowed(key);
        }

        let mut effective = String::with_capacity(self.prefix.len() + SEPARATOR.len_utf8() + key.len());
        effective.push_str(&self.prefix);
        effective.push(SEPARATOR);
        effective.push_str(key);
        Cow::Owned(effective)
    }
}

impl From<String> for Namespace {
    fn from(prefix: String) -> Self {
        Self::new(prefix)
    }
}

impl From<&str> for Namespace {
    fn from(prefix: &str) -> Self {
        Self::new(prefix)
    }
}
