//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Media error: {0}")]
    Media(#[from] reel_media::MediaError),

    #[error("Generation error: {0}")]
    Generation(#[from] reel_gen_client::GenError),

    #[error("Job file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Media(e) => e.is_retryable(),
            WorkerError::Generation(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Whether the failure is a missing credential or setting rather than a runtime fault.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WorkerError::ConfigError(_)
                | WorkerError::Generation(reel_gen_client::GenError::NotConfigured(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_gen_client::GenError;
    use reel_media::MediaError;

    #[test]
    fn test_classification() {
        let not_configured: WorkerError = GenError::not_configured("FAL_KEY is not set").into();
        assert!(not_configured.is_configuration());
        assert!(!not_configured.is_retryable());

        let rejected: WorkerError = GenError::RequestFailed("503".to_string()).into();
        assert!(rejected.is_retryable());
        assert!(!rejected.is_configuration());

        let empty: WorkerError = MediaError::EmptyInput("no clips".to_string()).into();
        assert!(!empty.is_retryable());
        assert!(empty.to_string().starts_with("Media error:"));
    }
}
