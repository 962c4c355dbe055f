// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Operation logging.
//!
//! With the `logs` feature, a client created with `with_logs()` emits one
//! `tracing` event per operation. Successful operations and misses are logged at
//! `DEBUG`; failures at `ERROR`. Without the feature every call here compiles
//! to nothing.

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
pub(crate) const OPERATION_FIELD: &str = "stash.operation";
#[cfg(test)]
pub(crate) const KEY_FIELD: &str = "stash.key";
#[cfg(test)]
pub(crate) const OUTCOME_FIELD: &str = "stash.outcome";

/// The client operation being recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    Delete,
    Get,
    Set,
    SetIfAbsent,
}

#[cfg(any(feature = "logs", test))]
impl Operation {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Get => "get",
            Self::Set => "set",
            Self::SetIfAbsent => "set_if_absent",
        }
    }
}

/// What an operation ended with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Hit,
    Miss,
    Stored,
    Kept,
    Deleted,
    Failed,
}

#[cfg(any(feature = "logs", test))]
impl Outcome {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Stored => "stored",
            Self::Kept => "kept",
            Self::Deleted => "deleted",
            Self::Failed => "failed",
        }
    }
}

/// Per-client logging switch.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Telemetry {
    #[cfg(any(feature = "logs", test))]
    logs_enabled: bool,
}

impl Telemetry {
    #[cfg(any(feature = "logs", test))]
    pub(crate) const fn with_logs(self) -> Self {
        Self { logs_enabled: true }
    }

    /// Records a finished operation. `error` is set when `outcome` is [`Outcome::Failed`].
    #[inline]
    pub(crate) fn record(self, operation: Operation, key: &str, outcome: Outcome, error: Option<&crate::Error>) {
        #[cfg(any(feature = "logs", test))]
        if self.logs_enabled {
            emit(operation, key, outcome, error);
        }

        #[cfg(not(any(feature = "logs", test)))]
        let _ = (self, operation, key, outcome, error);
    }
}

#[cfg(any(feature = "logs", test))]
fn emit(operation: Operation, key: &str, outcome: Outcome, error: Option<&crate::Error>) {
    let op = operation.as_str();
    let result = outcome.as_str();

    // Field names must match the constants above.
    match error {
        Some(error) => tracing::error!(
            stash.operation = op,
            stash.key = key,
            stash.outcome = result,
            error = %error,
            "stash.event"
        ),
        None => tracing::debug!(stash.operation = op, stash.key = key, stash.outcome = result, "stash.event"),
    }
}
