#![forbid(unsafe_code)]

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Machine-readable error codes reported by the transform service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidInput,
    NotEnoughPoints,
    SingularTransform,
    LabelNotFound,
    IoError,
    InternalError,
    /// A code this client does not know about.
    Other(String),
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotEnoughPoints => "NOT_ENOUGH_POINTS",
            Self::SingularTransform => "SINGULAR_TRANSFORM",
            Self::LabelNotFound => "LABEL_NOT_FOUND",
            Self::IoError => "IO_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "INVALID_INPUT" => Self::InvalidInput,
            "NOT_ENOUGH_POINTS" => Self::NotEnoughPoints,
            "SINGULAR_TRANSFORM" => Self::SingularTransform,
            "LABEL_NOT_FOUND" => Self::LabelNotFound,
            "IO_ERROR" => Self::IoError,
            "INTERNAL_ERROR" => Self::InternalError,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The service answered with `status: "error"`. The message is shown to
    /// the user as is.
    #[error("{message}")]
    Api { code: ErrorCode, message: String },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {endpoint} carried no data")]
    MissingData { endpoint: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ServiceError {
    #[must_use]
    pub fn api(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// The service-side error code, if the service produced one.
    #[must_use]
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether retrying the same request could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(error) => error.is_connect() || error.is_timeout(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip_through_strings() {
        for code in [
            ErrorCode::InvalidInput,
            ErrorCode::NotEnoughPoints,
            ErrorCode::SingularTransform,
            ErrorCode::LabelNotFound,
            ErrorCode::IoError,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::from(code.as_str()), code);
        }
        assert_eq!(
            ErrorCode::from("TEAPOT"),
            ErrorCode::Other("TEAPOT".to_string())
        );
    }

    #[test]
    fn api_error_displays_message_verbatim() {
        let error = ServiceError::api(
            ErrorCode::NotEnoughPoints,
            "At least 3 tie points required",
        );
        assert_eq!(error.to_string(), "At least 3 tie points required");
        assert_eq!(error.code(), Some(&ErrorCode::NotEnoughPoints));
        assert!(!error.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let error = ServiceError::Http {
            endpoint: "/health".to_string(),
            status: 503,
            body: String::new(),
        };
        assert!(error.is_transient());
    }
}
