use crate::domain::model::Source;
use reqwest::StatusCode;
use thiserror::Error;

/// 下游服務呼叫失敗的原因
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{downstream} responded with non-success status {status}")]
    Status {
        downstream: Source,
        status: StatusCode,
    },

    #[error("{downstream} transport failure: {error}")]
    Transport {
        downstream: Source,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SourceError {
    pub fn transport(
        downstream: Source,
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SourceError::Transport {
            downstream,
            error: error.into(),
        }
    }

    pub fn downstream(&self) -> Source {
        match self {
            SourceError::Status { downstream, .. }
            | SourceError::Transport { downstream, .. } => *downstream,
        }
    }

    /// Non-2xx outcomes are reported as a status, everything else is a transport-level failure.
    pub fn is_status(&self) -> bool {
        matches!(self, SourceError::Status { .. })
    }
}

#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("Downstream call failed: {0}")]
    Source(#[from] SourceError),

    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

impl CompositeError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            CompositeError::Source(e) => {
                format!("Could not reach the {} service", e.downstream())
            }
            CompositeError::ConfigError { message } => format!("Configuration problem: {}", message),
            CompositeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CompositeError::ApiError(_) => "Could not set up the HTTP client".to_string(),
            CompositeError::IoError(_) => "File system or network error".to_string(),
            CompositeError::ServerError { message } => format!("Server failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CompositeError::Source(_) => "Check that the downstream services are running and reachable",
            CompositeError::ConfigError { .. } | CompositeError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
            CompositeError::ApiError(_) => "Check the downstream timeout and TLS settings",
            CompositeError::IoError(_) => "Check file permissions and that the bind address is free",
            CompositeError::ServerError { .. } => "Inspect the server logs for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, CompositeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_status() {
        let err = SourceError::Status {
            downstream: Source::Product,
            status: StatusCode::NOT_FOUND,
        };
        assert!(err.is_status());
        assert_eq!(err.downstream(), Source::Product);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_transport_error_is_not_status() {
        let err = SourceError::transport(
            Source::Reviews,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert!(!err.is_status());

        let composite: CompositeError = err.into();
        assert!(composite.user_friendly_message().contains("review"));
    }
}
