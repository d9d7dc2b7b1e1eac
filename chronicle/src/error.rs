//! Application error type

use chronicle_kg::GraphError;
use thiserror::Error;

/// Failures of the ingestion and search layer.
///
/// Empty search results and an operator quitting at a gate are outcomes,
/// not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, empty or unparsable settings, raised before the store is touched
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any graph store failure; never retried
    #[error("graph store error: {0}")]
    Connectivity(#[from] GraphError),

    /// The confirmation source could not be read
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_errors_become_connectivity_errors() {
        let err: Error = GraphError::ConnectionError("refused".to_string()).into();
        assert!(matches!(err, Error::Connectivity(_)));
        assert_eq!(
            err.to_string(),
            "graph store error: Connection error: refused"
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = Error::Configuration("NEO4J_URI must be set".to_string());
        assert_eq!(err.to_string(), "configuration error: NEO4J_URI must be set");
    }
}
