//! Error types for storage backends.

/// Errors that can occur when talking to a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was used before `open()` or after `close()`.
    #[error("store '{store}' is not open")]
    NotOpen { store: String },

    /// The backend is not reachable.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record does not have the expected shape.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The backend did not answer in time.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl StoreError {
    /// Creates a new not-open error.
    pub fn not_open(store: impl Into<String>) -> Self {
        Self::NotOpen {
            store: store.into(),
        }
    }

    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new invalid record error.
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord(reason.into())
    }

    /// Returns true if this is a transient error that might succeed on retry.
    ///
    /// The service never retries; callers may use this to decide.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::not_open("file");
        assert_eq!(err.to_string(), "store 'file' is not open");

        let err = StoreError::unavailable("connection refused");
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = StoreError::Timeout { seconds: 10 };
        assert_eq!(err.to_string(), "operation timed out after 10s");
    }

    #[test]
    fn test_is_transient() {
        assert!(StoreError::unavailable("network error").is_transient());
        assert!(StoreError::Timeout { seconds: 30 }.is_transient());
        assert!(!StoreError::not_open("memory").is_transient());
        assert!(!StoreError::invalid_record("missing id").is_transient());
    }
}
