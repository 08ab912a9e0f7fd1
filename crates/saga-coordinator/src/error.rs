use std::fmt::Debug;

use thiserror::Error;

/// Error from saga execution.
///
/// Compensation failures are not reported here; they are collected in
/// [`Saga::errors`](crate::Saga::errors).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// The saga was executed before. Sagas are single-shot.
    #[error("saga has already been executed")]
    AlreadyExecuted,

    /// A participant's forward transaction failed.
    ///
    /// Displays as the participant's own error.
    #[error("{source}")]
    StepFailed {
        /// Name of the participant that failed.
        step: String,
        /// The participant's error, unchanged.
        #[source]
        source: E,
    },
}

impl<E: Debug> SagaError<E> {
    /// Name of the failing participant, if a participant failed.
    #[must_use]
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::StepFailed { step, .. } => Some(step),
            Self::AlreadyExecuted => None,
        }
    }

    /// The participant's original error, if a participant failed.
    #[must_use]
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::StepFailed { source, .. } => Some(source),
            Self::AlreadyExecuted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct TestError(String);

    #[test]
    fn step_failed_displays_participant_error() {
        let err = SagaError::StepFailed {
            step: "payment".to_string(),
            source: TestError("card declined".to_string()),
        };

        assert_eq!(err.to_string(), "card declined");
    }

    #[test]
    fn step_failed_exposes_source() {
        let err = SagaError::StepFailed {
            step: "payment".to_string(),
            source: TestError("card declined".to_string()),
        };

        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "card declined");
    }

    #[test]
    fn into_source_returns_original_error() {
        let err = SagaError::StepFailed {
            step: "payment".to_string(),
            source: TestError("card declined".to_string()),
        };

        assert_eq!(err.step(), Some("payment"));
        assert_eq!(
            err.into_source(),
            Some(TestError("card declined".to_string()))
        );
    }

    #[test]
    fn already_executed_has_no_step_or_source() {
        let err: SagaError<TestError> = SagaError::AlreadyExecuted;

        assert!(err.to_string().contains("already been executed"));
        assert!(err.step().is_none());
        assert!(err.into_source().is_none());
    }
}
