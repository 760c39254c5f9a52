//! Operations whose failure is expected and ignored.

use codeserve_engine::EngineError;

/// Outcome of an engine call whose failure must not stop the caller.
///
/// The value has to be consumed: either inspected or passed to
/// [`discard`](Self::discard), which logs a failure at debug level and drops it.
#[derive(Debug)]
#[must_use = "best-effort outcomes are dropped with `discard`"]
pub struct BestEffort<T> {
    operation: &'static str,
    outcome: Result<T, EngineError>,
}

impl<T> BestEffort<T> {
    /// Runs `f` and records its outcome.
    pub fn attempt(operation: &'static str, f: impl FnOnce() -> Result<T, EngineError>) -> Self {
        Self {
            operation,
            outcome: f(),
        }
    }

    /// Name of the attempted operation.
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns whether the operation failed.
    pub const fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&EngineError> {
        self.outcome.as_ref().err()
    }

    /// Drops the outcome, logging a failure.
    pub fn discard(self) {
        if let Err(error) = self.outcome {
            tracing::debug!(operation = self.operation, error = %error, "ignoring best-effort failure");
        }
    }
}
