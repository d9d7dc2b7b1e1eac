//! Error types for graph store operations
//!
//! This module defines the error type shared by every Graph Store backend,
//! so callers can handle Neo4j and in-memory failures the same way.

use thiserror::Error;

/// Main error type for graph store operations
#[derive(Error, Debug)]
pub enum GraphError {
    /// Connection error - network, pool, or a store that was already closed
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Query execution error
    #[error("Query error: {0}")]
    QueryError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Lexical index failure (in-memory backend)
    #[error("Index error: {0}")]
    IndexError(String),

    /// A caller supplied a parameter the store cannot honor
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Neo4rs driver error (wrapper)
    #[error("Neo4rs driver error: {0}")]
    DriverError(#[from] neo4rs::Error),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for graph store operations
pub type Result<T> = std::result::Result<T, GraphError>;

impl From<String> for GraphError {
    fn from(s: String) -> Self {
        GraphError::Other(s)
    }
}

impl From<&str> for GraphError {
    fn from(s: &str) -> Self {
        GraphError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::SerializationError(e.to_string())
    }
}

impl From<tantivy::TantivyError> for GraphError {
    fn from(e: tantivy::TantivyError) -> Self {
        GraphError::IndexError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GraphError::ConnectionError("Failed to connect".to_string());
        assert_eq!(error.to_string(), "Connection error: Failed to connect");

        let validation = GraphError::ValidationError("recipe targets edges".to_string());
        assert_eq!(
            validation.to_string(),
            "Validation error: recipe targets edges"
        );
    }

    #[test]
    fn test_error_conversion() {
        let error: GraphError = "test error".into();
        assert!(matches!(error, GraphError::Other(_)));

        let error: GraphError = "test error".to_string().into();
        assert!(matches!(error, GraphError::Other(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: GraphError = json_err.into();
        assert!(matches!(error, GraphError::SerializationError(_)));
    }
}
