//! Saga coordinator for linear multi-service workflows.
//!
//! A [`Saga`] drives an ordered list of [`Participant`]s forward. When one of
//! them fails, every participant that already succeeded is compensated in
//! reverse order. A saga runs at most once; later calls to
//! [`Saga::execute`] are rejected without touching any participant.

mod audit;
mod builder;
mod error;
mod participant;
mod saga;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use error::SagaError;
pub use participant::Participant;
pub use saga::{Saga, SagaStatus};
