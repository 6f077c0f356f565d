//! Error types for the Tarantino generation pipeline.

use thiserror::Error;

/// Classification of a failed generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Provider,
    Truncated,
    InvalidPayload,
    Transport,
}

/// Failure of a single generation call.
///
/// Every variant is produced at the generation client boundary; nothing below the
/// client escapes as a panic or an unrelated error type.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("AI response was cut off (too long). Retrying usually fixes this, or raise max_output_tokens.")]
    Truncated { preview: String },

    #[error("AI returned invalid JSON. Please retry.")]
    InvalidPayload { preview: String },

    #[error("Request failed: {0}")]
    Transport(String),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Configuration(_) => ErrorKind::Configuration,
            GenerationError::Provider { .. } => ErrorKind::Provider,
            GenerationError::Truncated { .. } => ErrorKind::Truncated,
            GenerationError::InvalidPayload { .. } => ErrorKind::InvalidPayload,
            GenerationError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Whether re-issuing the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::Configuration(_))
    }

    /// HTTP status carried by provider failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerationError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Crate-level errors surfaced to the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Nothing stored under '{0}'. Run the phase that produces it first.")]
    SlotEmpty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
