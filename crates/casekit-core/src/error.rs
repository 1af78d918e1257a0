//! Error types for casekit.

use thiserror::Error;

use crate::models::ObjectType;

/// Result type alias using casekit's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for casekit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object type tag is not one of the supported categories
    #[error("Invalid object type: {0}")]
    InvalidObjectType(String),

    /// No default custom-attribute schema is administered for the type
    #[error("No default custom attributes defined for {0}")]
    DefaultSchemaNotFound(ObjectType),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("ioc 42".to_string());
        assert_eq!(err.to_string(), "Not found: ioc 42");
    }

    #[test]
    fn test_error_display_invalid_object_type() {
        let err = Error::InvalidObjectType("case".to_string());
        assert_eq!(err.to_string(), "Invalid object type: case");
    }

    #[test]
    fn test_error_display_default_schema_not_found() {
        let err = Error::DefaultSchemaNotFound(ObjectType::Evidence);
        assert_eq!(
            err.to_string(),
            "No default custom attributes defined for evidence"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("2 validation issue(s)".to_string());
        assert_eq!(err.to_string(), "Invalid input: 2 validation issue(s)");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>(r#"{"tab": }"#);
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "schema.json");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("schema.json"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
