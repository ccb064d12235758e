//! Result of a single attempt

/// Outcome of one invocation of the retried operation
///
/// Exactly one outcome exists per attempt. It lives only for the duration of
/// the invocation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome<T, E> {
    /// The operation produced a value
    Success(T),
    /// The operation failed on the attempt with this 0-based index
    Failure { error: E, attempt_index: u32 },
}

impl<T, E> AttemptOutcome<T, E> {
    /// Build an outcome from the operation's result
    pub fn from_result(result: Result<T, E>, attempt_index: u32) -> Self {
        match result {
            Ok(value) => AttemptOutcome::Success(value),
            Err(error) => AttemptOutcome::Failure {
                error,
                attempt_index,
            },
        }
    }

    /// Check if the attempt succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success(_))
    }

    /// 1-based ordinal of a failed attempt, as reported to observers
    pub fn attempt_ordinal(&self) -> Option<u32> {
        match self {
            AttemptOutcome::Success(_) => None,
            AttemptOutcome::Failure { attempt_index, .. } => Some(attempt_index + 1),
        }
    }

    /// Convert back into a `Result`, dropping the attempt index
    pub fn into_result(self) -> Result<T, E> {
        match self {
            AttemptOutcome::Success(value) => Ok(value),
            AttemptOutcome::Failure { error, .. } => Err(error),
        }
    }
}
