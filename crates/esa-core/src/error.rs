//! Error types shared by the esa crates.
//!
//! Every failure a tool invocation can hit is one of these variants. The
//! response formatter turns them into a single `Error: <Kind>: <message>`
//! line, so `Display` carries only what a caller should see.

use std::fmt;

/// Result type alias for esa operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A single field-level argument violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    /// Argument name as declared in the tool schema.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Create a new violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur while serving a tool call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required configuration value is absent or empty.
    #[error("Missing required environment: {key}")]
    Configuration {
        /// Name of the missing key
        key: String,
    },

    /// Tool arguments failed schema validation.
    #[error("Invalid arguments for {tool}: {}", join_violations(.violations))]
    Validation {
        /// Tool whose schema rejected the arguments
        tool: String,
        /// Every violation found, in schema order
        violations: Vec<FieldViolation>,
    },

    /// The remote API answered with a non-success status.
    #[error("{message}")]
    RemoteApi {
        /// HTTP status returned by the remote API
        status: u16,
        /// Remote message, or `Api Error: <status>` when none was given
        message: String,
    },

    /// A requested record does not exist.
    #[error("{message}")]
    NotFound {
        /// Human-readable description
        message: String,
    },

    /// The request never produced an HTTP status.
    #[error("{message}")]
    Transport {
        /// Human-readable description
        message: String,
        /// Underlying client error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A value could not be encoded or decoded.
    #[error("{message}")]
    Serialization {
        /// Human-readable description
        message: String,
    },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Stable failure-kind name, used as the prefix of error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration { .. } => "ConfigurationError",
            Error::Validation { .. } => "ValidationError",
            Error::RemoteApi { .. } => "RemoteApiError",
            Error::NotFound { .. } => "NotFoundError",
            Error::Transport { .. } => "TransportError",
            Error::Serialization { .. } => "SerializationError",
        }
    }

    /// Whether this error should abort startup rather than fail one call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Creates a configuration error naming the missing key.
    pub fn configuration<S: Into<String>>(key: S) -> Self {
        Error::Configuration { key: key.into() }
    }

    /// Creates a validation error for `tool`.
    pub fn validation<S: Into<String>>(tool: S, violations: Vec<FieldViolation>) -> Self {
        Error::Validation {
            tool: tool.into(),
            violations,
        }
    }

    /// Creates a remote API error.
    pub fn remote_api<S: Into<String>>(status: u16, message: S) -> Self {
        Error::RemoteApi {
            status,
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Creates a transport error with a message.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error with a message and source error.
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Error::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(err.to_string())
    }
}
