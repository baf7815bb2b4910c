//! Error types for Confvault.
//!
//! Every configuration operation fails with a [`ConfigurationError`]. The
//! variant names the operation that failed and each variant maps to a stable
//! [`ErrorCode`] that clients may use for diagnostics.
//!
//! # Error Handling Philosophy
//!
//! - Functions that can fail return `Result<T, ConfigurationError>`
//! - Falling back to default values is a normal outcome, not an error
//! - Errors are never retried by the service itself
//!
//! # Example
//!
//! ```
//! use confvault_core::{ConfigurationError, ErrorCode, Result};
//!
//! fn load(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(ConfigurationError::get("Configuration id cannot be empty"));
//!     }
//!     Ok(format!("config {}", id))
//! }
//!
//! let err = load("").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::Get);
//! ```

use std::fmt;

use thiserror::Error;

/// Boxed underlying cause of a [`ConfigurationError`].
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Stable error codes, one per failing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No default values could be loaded for a configuration.
    LoadingDefault,
    /// A configuration could not be saved.
    Save,
    /// A configuration could not be read or resolved.
    Get,
    /// A configuration could not be removed.
    Remove,
}

impl ErrorCode {
    /// Returns the numeric code as transmitted to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::LoadingDefault => "1",
            ErrorCode::Save => "2",
            ErrorCode::Get => "3",
            ErrorCode::Remove => "4",
        }
    }

    /// Returns a short symbolic name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::LoadingDefault => "LOADING_DEFAULT",
            ErrorCode::Save => "SAVE",
            ErrorCode::Get => "GET",
            ErrorCode::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Main error type for configuration operations.
///
/// # Example
///
/// ```
/// use confvault_core::ConfigurationError;
///
/// let err = ConfigurationError::loading_default("Couldn't load configuration resource: app-A");
/// assert!(err.is_loading_default());
/// assert_eq!(err.code().as_str(), "1");
/// ```
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Default values for a variation name could not be loaded.
    #[error("{message}")]
    LoadingDefault {
        /// Description of the failure
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// Reading or resolving a configuration failed.
    #[error("{message}")]
    Get {
        /// Description of the failure
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// Saving a configuration failed.
    #[error("{message}")]
    Save {
        /// Description of the failure
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// Removing a configuration failed.
    #[error("{message}")]
    Remove {
        /// Description of the failure
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },
}

impl ConfigurationError {
    // ============================================
    // Convenience constructors
    // ============================================

    /// Creates a LoadingDefault error.
    pub fn loading_default(message: impl Into<String>) -> Self {
        Self::LoadingDefault {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a LoadingDefault error with a cause.
    pub fn loading_default_with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::LoadingDefault {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Get error.
    pub fn get(message: impl Into<String>) -> Self {
        Self::Get {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Get error with a cause.
    pub fn get_with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Get {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Save error.
    pub fn save(message: impl Into<String>) -> Self {
        Self::Save {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Save error with a cause.
    pub fn save_with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Save {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Remove error.
    pub fn remove(message: impl Into<String>) -> Self {
        Self::Remove {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Remove error with a cause.
    pub fn remove_with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Remove {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns the error code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::LoadingDefault { .. } => ErrorCode::LoadingDefault,
            Self::Get { .. } => ErrorCode::Get,
            Self::Save { .. } => ErrorCode::Save,
            Self::Remove { .. } => ErrorCode::Remove,
        }
    }

    /// Returns the human readable message without the cause chain.
    pub fn message(&self) -> &str {
        match self {
            Self::LoadingDefault { message, .. }
            | Self::Get { message, .. }
            | Self::Save { message, .. }
            | Self::Remove { message, .. } => message,
        }
    }

    /// Returns true if default values could not be loaded.
    pub fn is_loading_default(&self) -> bool {
        matches!(self, Self::LoadingDefault { .. })
    }

    /// Returns true if this is a read/resolution error.
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get { .. })
    }

    /// Returns true if this is a save error.
    pub fn is_save(&self) -> bool {
        matches!(self, Self::Save { .. })
    }

    /// Returns true if this is a remove error.
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }

    /// Returns true if the error, or any error in its cause chain, is a
    /// LoadingDefault error.
    pub fn caused_by_loading_default(&self) -> bool {
        if self.is_loading_default() {
            return true;
        }

        let mut current = std::error::Error::source(self);
        while let Some(err) = current {
            if let Some(cfg) = err.downcast_ref::<ConfigurationError>()
                && cfg.is_loading_default()
            {
                return true;
            }
            current = err.source();
        }
        false
    }
}

/// Type alias for Results with ConfigurationError.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
