//! Ingestion phases

use chronicle_kg::Episode;

/// An ordered batch of episodes followed by one verification query
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// Banner printed before loading
    pub title: String,
    /// Episode names are `"{prefix} {index}"`
    pub prefix: String,
    pub episodes: Vec<Episode>,
    /// Searched once the phase is loaded
    pub query: String,
}

impl Phase {
    pub fn new(
        title: impl Into<String>,
        prefix: impl Into<String>,
        episodes: Vec<Episode>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            prefix: prefix.into(),
            episodes,
            query: query.into(),
        }
    }
}
