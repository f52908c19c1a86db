//! Error types for the Kindred workspace.

use thiserror::Error;

/// A shared error type for the Kindred crates.
///
/// Errors only surface at the storage and configuration boundaries. The
/// conversational pipeline itself never returns one of these to the end user.
#[derive(Error, Debug, Clone)]
pub enum KindredError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Scoped store error (backend unavailable, quota exceeded, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KindredError {
    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for KindredError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KindredError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, KindredError>`.
pub type Result<T> = std::result::Result<T, KindredError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: KindredError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            KindredError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_is_serialization() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: KindredError = parse.unwrap_err().into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }

    #[test]
    fn test_storage_helper() {
        let err = KindredError::storage("quota exceeded");
        assert!(err.is_storage());
        assert_eq!(err.to_string(), "Storage error: quota exceeded");
    }
}
