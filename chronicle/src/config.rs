//! Runtime configuration
//!
//! Built once at start and passed by reference. Nothing else reads the
//! environment.

use std::fmt;
use std::str::FromStr;

use chronicle_kg::Neo4jSettings;

use crate::error::{Error, Result};

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_PASSWORD: &str = "password";
pub const DEFAULT_NEO4J_DATABASE: &str = "neo4j";
pub const DEFAULT_NODE_LIMIT: usize = 5;

/// Which graph store to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Neo4j,
    Memory,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "neo4j" => Ok(Backend::Neo4j),
            "memory" => Ok(Backend::Memory),
            other => Err(Error::Configuration(format!(
                "unknown backend '{}' (expected 'neo4j' or 'memory')",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Neo4j => write!(f, "neo4j"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Env: `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`
    pub neo4j: Neo4jSettings,
    /// Env: `CHRONICLE_BACKEND`, default `neo4j`
    pub backend: Backend,
    /// Cap for recipe node search. Env: `CHRONICLE_NODE_LIMIT`, default 5
    pub node_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            neo4j: Neo4jSettings::new(
                DEFAULT_NEO4J_URI,
                DEFAULT_NEO4J_USER,
                DEFAULT_NEO4J_PASSWORD,
                DEFAULT_NEO4J_DATABASE,
            ),
            backend: Backend::default(),
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }
}

impl Config {
    /// Load `.env` (if present), then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    ///
    /// Unset keys take their default; a key that is set but blank is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let setting = |key: &str, default: &str| -> Result<String> {
            match lookup(key) {
                None => Ok(default.to_string()),
                Some(value) if value.trim().is_empty() => {
                    Err(Error::Configuration(format!("{} is set but empty", key)))
                }
                Some(value) => Ok(value.trim().to_string()),
            }
        };

        let neo4j = Neo4jSettings::new(
            setting("NEO4J_URI", DEFAULT_NEO4J_URI)?,
            setting("NEO4J_USER", DEFAULT_NEO4J_USER)?,
            setting("NEO4J_PASSWORD", DEFAULT_NEO4J_PASSWORD)?,
            setting("NEO4J_DATABASE", DEFAULT_NEO4J_DATABASE)?,
        );
        let backend = setting("CHRONICLE_BACKEND", "neo4j")?.parse()?;
        let node_limit = parse_node_limit(&setting(
            "CHRONICLE_NODE_LIMIT",
            &DEFAULT_NODE_LIMIT.to_string(),
        )?)?;

        let config = Self {
            neo4j,
            backend,
            node_limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Node cap for one search: `raw` when given, else the configured limit
    pub fn search_limit(&self, raw: Option<&str>) -> Result<usize> {
        match raw {
            Some(raw) => parse_node_limit(raw),
            None => Ok(self.node_limit),
        }
    }

    /// Check every value; CLI overrides go through here too
    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::Neo4j {
            self.neo4j
                .validate()
                .map_err(|e| Error::Configuration(e.to_string()))?;
        }
        if self.node_limit == 0 {
            return Err(Error::Configuration(
                "node limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a positive result cap
pub fn parse_node_limit(raw: &str) -> Result<usize> {
    let limit: usize = raw
        .trim()
        .parse()
        .map_err(|e| Error::Configuration(format!("invalid node limit '{}': {}", raw, e)))?;
    if limit == 0 {
        return Err(Error::Configuration(
            "node limit must be at least 1".to_string(),
        ));
    }
    Ok(limit)
}
