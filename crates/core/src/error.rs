//! Error handling for the reanchor core library

use std::fmt;
use thiserror::Error;

/// Result type alias for reanchor operations
pub type Result<T> = std::result::Result<T, XzeError>;

/// Main error type for reanchor operations
#[derive(Error, Debug)]
pub enum XzeError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    /// AI service errors (Ollama generation/embedding failures)
    #[error("AI service error: {message}")]
    AiService { message: String },

    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Model not available error
    #[error("Model '{model}' is not available")]
    ModelNotAvailable { model: String },

    /// Timeout errors
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// Resource not found errors
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// A caller-supplied chunk or target document failed precondition checks
    /// (empty target, chunk referencing content absent from the target, etc).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// An injected port (embedder, LLM client) returned a failure that the
    /// cascade could not route around.
    #[error("Service failure: {message}")]
    ServiceFailure { message: String },

    /// The match run was cancelled via a `CancellationToken` before Layer 4
    /// could finish recovering every chunk.
    #[error("Match run cancelled")]
    Cancelled,

    /// A cascade invariant was violated (e.g. a chunk left unmatched after
    /// Layer 4, which is supposed to guarantee 100% recovery).
    #[error("Internal invariant violation: {message}")]
    InternalInvariantViolation { message: String },
}

impl XzeError {
    /// Create an AI service error
    pub fn ai<S: Into<String>>(message: S) -> Self {
        Self::AiService {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a model not available error
    pub fn model_not_available<S: Into<String>>(model: S) -> Self {
        Self::ModelNotAvailable {
            model: model.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a service failure error
    pub fn service_failure<S: Into<String>>(message: S) -> Self {
        Self::ServiceFailure {
            message: message.into(),
        }
    }

    /// Create an internal invariant violation error
    pub fn internal_invariant_violation<S: Into<String>>(message: S) -> Self {
        Self::InternalInvariantViolation {
            message: message.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::Http(_) => true,
            Self::AiService { .. } | Self::ServiceFailure { .. } => true,
            _ => false,
        }
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::FileSystem,
            Self::Http(_) | Self::Network { .. } => ErrorCategory::Network,
            Self::Json(_) | Self::Yaml(_) => ErrorCategory::Serialization,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::AiService { .. } | Self::ModelNotAvailable { .. } => ErrorCategory::AI,
            Self::Validation { .. } | Self::InvalidInput { .. } => ErrorCategory::Validation,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ServiceFailure { .. } => ErrorCategory::Service,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::InternalInvariantViolation { .. } => ErrorCategory::Invariant,
            Self::Generic(_) => ErrorCategory::Generic,
        }
    }
}

/// Error categories for metrics and logging
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    FileSystem,
    Network,
    Serialization,
    Configuration,
    AI,
    Validation,
    Timeout,
    NotFound,
    Service,
    Cancelled,
    Invariant,
    Generic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSystem => write!(f, "filesystem"),
            Self::Network => write!(f, "network"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
            Self::AI => write!(f, "ai"),
            Self::Validation => write!(f, "validation"),
            Self::Timeout => write!(f, "timeout"),
            Self::NotFound => write!(f, "not_found"),
            Self::Service => write!(f, "service"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Invariant => write!(f, "invariant"),
            Self::Generic => write!(f, "generic"),
        }
    }
}
