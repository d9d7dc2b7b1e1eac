//! Neo4j connection management
//!
//! This module provides the pooled client used by the Neo4j graph store.

use neo4rs::{query, ConfigBuilder, Graph};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GraphError, Result};

/// Connection parameters for a Neo4j database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neo4jSettings {
    /// Bolt URI (e.g. "bolt://localhost:7687")
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Database name (default: "neo4j")
    pub database: String,
}

impl Neo4jSettings {
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Reject parameters that are empty or blank
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("uri", &self.uri),
            ("user", &self.user),
            ("password", &self.password),
            ("database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(GraphError::ConfigError(format!("Neo4j {} must be set", key)));
            }
        }
        Ok(())
    }
}

/// Neo4j client with connection pooling
pub struct Neo4jClient {
    graph: Graph,
}

impl Neo4jClient {
    /// Connect and verify the database answers
    pub async fn connect(settings: &Neo4jSettings) -> Result<Self> {
        settings.validate()?;
        info!(
            "Connecting to Neo4j at {} (database: {})",
            settings.uri, settings.database
        );

        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .fetch_size(500)
            .max_connections(16)
            .build()
            .map_err(|e| GraphError::ConfigError(e.to_string()))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| GraphError::ConnectionError(e.to_string()))?;

        let client = Self { graph };
        client.health_check().await?;
        info!("Successfully connected to Neo4j");
        Ok(client)
    }

    /// Simple health check using RETURN 1
    pub async fn health_check(&self) -> Result<bool> {
        debug!("Executing simple health check (RETURN 1)");

        self.graph
            .run(query("RETURN 1"))
            .await
            .map_err(|e| GraphError::ConnectionError(e.to_string()))?;

        debug!("Simple health check passed");
        Ok(true)
    }

    /// Get a reference to the underlying Neo4j Graph instance
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
