//! Knowledge graph schema module
//!
//! This module defines the temporal graph's data model (episodes, facts and
//! entity nodes) and the projection of structured records onto it.

pub mod projection;
pub mod types;

pub use projection::{
    append_summary, mentioned_names, plan_supersession, project_record, Claim, ExistingFact,
    RecordProjection, SupersessionPlan,
};
pub use types::{
    EntityNode, Episode, EpisodeAck, EpisodeBody, EpisodeSubmission, EpisodicNode, Fact,
    SourceKind,
};
