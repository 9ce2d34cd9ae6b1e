#![forbid(unsafe_code)]

use thiserror::Error;

use rigidlabel_client::ServiceError;
use rigidlabel_core::io::CsvError;
use rigidlabel_runtime::LabelerError;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Labeler(#[from] LabelerError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("background request failed: {0}")]
    Worker(String),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// 2 for bad input or configuration, 3 when the service could not be
    /// used, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::Config(_) => 2,
            Self::Service(_) | Self::Worker(_) | Self::Labeler(LabelerError::Service(_)) => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
