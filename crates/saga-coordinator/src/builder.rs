use std::fmt::Debug;

use crate::participant::Participant;
use crate::saga::Saga;

/// Builder for a [`Saga`] over borrowed participants.
///
/// Participants run in the order they are added. Every participant must share
/// one error type; they may otherwise be of different concrete types.
///
/// ```
/// use saga_coordinator::{Participant, SagaBuilder};
///
/// struct Reserve;
///
/// impl Participant for Reserve {
///     type Error = String;
///     fn name(&self) -> &str { "reserve" }
///     fn execute(&self) -> Result<(), String> { Ok(()) }
/// }
///
/// struct Charge;
///
/// impl Participant for Charge {
///     type Error = String;
///     fn name(&self) -> &str { "charge" }
///     fn execute(&self) -> Result<(), String> { Err("card declined".to_string()) }
/// }
///
/// let (reserve, charge) = (Reserve, Charge);
/// let saga = SagaBuilder::new().participant(&reserve).participant(&charge).build();
///
/// let err = saga.execute().unwrap_err();
/// assert_eq!(err.step(), Some("charge"));
/// assert!(saga.errors().is_some_and(|errors| errors.is_empty()));
/// ```
pub struct SagaBuilder<'a, E> {
    participants: Vec<&'a dyn Participant<Error = E>>,
}

impl<'a, E> SagaBuilder<'a, E> {
    /// Create a builder with no participants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
        }
    }

    /// Append a participant.
    #[must_use]
    pub fn participant<P>(mut self, participant: &'a P) -> Self
    where
        P: Participant<Error = E> + 'a,
    {
        self.participants.push(participant);
        self
    }

    /// Append every participant yielded by `participants`, in order.
    #[must_use]
    pub fn participants<P, I>(mut self, participants: I) -> Self
    where
        P: Participant<Error = E> + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        self.participants.extend(
            participants
                .into_iter()
                .map(|p| p as &'a dyn Participant<Error = E>),
        );
        self
    }

    /// Build the saga.
    #[must_use]
    pub fn build(self) -> Saga<'a, E>
    where
        E: Debug,
    {
        Saga::new(self.participants)
    }
}

impl<E> Default for SagaBuilder<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}
