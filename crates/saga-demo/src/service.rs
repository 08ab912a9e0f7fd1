use std::sync::{Mutex, PoisonError};

use saga_coordinator::Participant;
use thiserror::Error;
use tracing::info;

use crate::scenario::FailurePoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{service}: something went wrong")]
    Transaction { service: String },

    #[error("{service}: compensation failed")]
    Compensation { service: String },
}

/// Demo service that stores a response when its transaction succeeds.
#[derive(Debug)]
pub(crate) struct Service {
    name: String,
    fail: Option<FailurePoint>,
    result: Mutex<Option<String>>,
}

impl Service {
    pub(crate) fn new(name: impl Into<String>, fail: Option<FailurePoint>) -> Self {
        Self {
            name: name.into(),
            fail,
            result: Mutex::new(None),
        }
    }

    /// Response stored by a successful, uncompensated transaction.
    pub(crate) fn result(&self) -> Option<String> {
        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Participant for Service {
    type Error = ServiceError;

    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self) -> Result<(), Self::Error> {
        info!(service = %self.name, "executing transaction");
        if self.fail == Some(FailurePoint::Execute) {
            return Err(ServiceError::Transaction {
                service: self.name.clone(),
            });
        }

        *self.result.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(format!("resp: {}", self.name));
        Ok(())
    }

    fn compensate(&self) -> Result<(), Self::Error> {
        info!(service = %self.name, "compensating transaction");
        if self.fail == Some(FailurePoint::Compensate) {
            return Err(ServiceError::Compensation {
                service: self.name.clone(),
            });
        }

        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("discard response of {}", self.name)
    }
}
