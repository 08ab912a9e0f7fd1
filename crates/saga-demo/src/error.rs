use std::path::PathBuf;

use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read scenario at '{path}'")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario at '{path}'")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown participant '{0}'")]
    UnknownParticipant(String),

    #[error("saga failed at '{step}'")]
    SagaFailed {
        step: String,
        #[source]
        source: ServiceError,
        compensation_errors: Vec<(String, ServiceError)>,
    },

    #[error("internal error: saga was already executed")]
    AlreadyExecuted,
}

pub type Result<T> = std::result::Result<T, CliError>;
