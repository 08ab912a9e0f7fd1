use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::audit::SagaAuditLog;
use crate::error::SagaError;
use crate::participant::Participant;

/// Lifecycle position of a saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SagaStatus {
    /// Not executed yet.
    Fresh,
    /// A thread is driving participants forward or compensating them.
    Running,
    /// Every participant succeeded.
    Succeeded,
    /// A participant failed and every compensation succeeded.
    RolledBack,
    /// A participant failed and at least one compensation failed too.
    RollbackIncomplete,
}

/// State built up by the executing thread and published when the run ends.
struct Outcome<E> {
    succeeded: usize,
    failed: bool,
    compensation_errors: IndexMap<String, E>,
    audit_log: SagaAuditLog,
}

impl<E> Outcome<E> {
    fn new() -> Self {
        Self {
            succeeded: 0,
            failed: false,
            compensation_errors: IndexMap::new(),
            audit_log: SagaAuditLog::new(),
        }
    }
}

/// A single-shot saga over borrowed participants.
///
/// Participants run in construction order. If one fails, the participants
/// before it are compensated in reverse order (LIFO). The failing participant
/// itself is not compensated.
///
/// `execute` takes `&self`, so one saga may be shared between threads. Only
/// the first caller runs it; everyone else gets
/// [`SagaError::AlreadyExecuted`].
pub struct Saga<'a, E> {
    participants: Vec<&'a dyn Participant<Error = E>>,
    executed: AtomicBool,
    outcome: OnceLock<Outcome<E>>,
}

impl<'a, E: Debug> Saga<'a, E> {
    /// Create a saga over `participants`, in execution order.
    ///
    /// Duplicate names are allowed but logged, since compensation errors are
    /// keyed by name.
    #[must_use]
    pub fn new(participants: Vec<&'a dyn Participant<Error = E>>) -> Self {
        warn_on_duplicate_names(&participants);
        Self {
            participants,
            executed: AtomicBool::new(false),
            outcome: OnceLock::new(),
        }
    }

    /// Run the saga.
    ///
    /// On success every participant has executed. On failure, the
    /// participants that already succeeded have been compensated, and any
    /// compensation errors are available from [`errors`](Self::errors).
    ///
    /// # Errors
    ///
    /// Returns `SagaError::AlreadyExecuted` if the saga was executed before,
    /// without calling any participant.
    /// Returns `SagaError::StepFailed` carrying the participant's own error
    /// if a participant failed.
    pub fn execute(&self) -> Result<(), SagaError<E>> {
        if self
            .executed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("rejecting execution of a saga that has already been executed");
            return Err(SagaError::AlreadyExecuted);
        }

        let mut outcome = Outcome::new();
        let result = self.drive_forward(&mut outcome);

        // Only the thread that won the guard above reaches this point.
        let _ = self.outcome.set(outcome);
        result
    }

    fn drive_forward(&self, outcome: &mut Outcome<E>) -> Result<(), SagaError<E>> {
        for (index, participant) in self.participants.iter().enumerate() {
            let name = participant.name();
            debug!(participant = name, index, "executing participant");
            outcome.audit_log.record_start(name);

            if let Err(source) = participant.execute() {
                outcome.audit_log.record_failure();
                outcome.failed = true;
                warn!(
                    participant = name,
                    index,
                    completed = outcome.succeeded,
                    error = ?source,
                    "participant failed, compensating completed participants"
                );
                self.compensate(outcome);
                return Err(SagaError::StepFailed {
                    step: name.to_string(),
                    source,
                });
            }

            outcome
                .audit_log
                .record_success(participant.compensation_description());
            outcome.succeeded += 1;
        }

        info!(participants = self.participants.len(), "saga completed");
        Ok(())
    }

    fn compensate(&self, outcome: &mut Outcome<E>) {
        let completed = &self.participants[..outcome.succeeded];

        for (index, participant) in completed.iter().enumerate().rev() {
            let name = participant.name();
            debug!(participant = name, index, "compensating participant");

            match participant.compensate() {
                Ok(()) => outcome.audit_log.record_compensated(index),
                Err(error) => {
                    warn!(participant = name, index, error = ?error, "compensation failed");
                    outcome.audit_log.record_compensation_failed(index);
                    outcome.compensation_errors.insert(name.to_string(), error);
                }
            }
        }

        if outcome.compensation_errors.is_empty() {
            info!(compensated = completed.len(), "saga rolled back");
        } else {
            warn!(
                compensated = completed.len(),
                failed = outcome.compensation_errors.len(),
                "saga rolled back with failed compensations"
            );
        }
    }
}

impl<E> Saga<'_, E> {
    /// Compensation errors keyed by participant name.
    ///
    /// `None` until a run has finished. An empty map after a failed run means
    /// the rollback was clean. If two participants share a name, the later
    /// compensation failure replaces the earlier one.
    #[must_use]
    pub fn errors(&self) -> Option<&IndexMap<String, E>> {
        self.outcome.get().map(|o| &o.compensation_errors)
    }

    /// Number of participants whose forward transaction succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcome.get().map_or(0, |o| o.succeeded)
    }

    /// Audit log of the finished run.
    #[must_use]
    pub fn audit_log(&self) -> Option<&SagaAuditLog> {
        self.outcome.get().map(|o| &o.audit_log)
    }

    #[must_use]
    pub fn status(&self) -> SagaStatus {
        match self.outcome.get() {
            Some(o) if !o.failed => SagaStatus::Succeeded,
            Some(o) if o.compensation_errors.is_empty() => SagaStatus::RolledBack,
            Some(_) => SagaStatus::RollbackIncomplete,
            None if self.executed.load(Ordering::Acquire) => SagaStatus::Running,
            None => SagaStatus::Fresh,
        }
    }

    /// Participant names in execution order.
    pub fn participant_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.participants.iter().map(|p| p.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl<E> fmt::Debug for Saga<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Saga")
            .field("participants", &self.participant_names().collect::<Vec<_>>())
            .field("status", &self.status())
            .field("succeeded", &self.succeeded())
            .finish_non_exhaustive()
    }
}

fn warn_on_duplicate_names<E>(participants: &[&dyn Participant<Error = E>]) {
    let mut seen = HashSet::new();
    for participant in participants {
        if !seen.insert(participant.name()) {
            warn!(
                participant = participant.name(),
                "duplicate participant name, compensation errors will be ambiguous"
            );
        }
    }
}
