pub mod config;
pub mod confirm;
pub mod demo;
pub mod display;
pub mod error;
pub mod gate;
pub mod loader;
pub mod phase;
pub mod pipeline;
pub mod recipe;
pub mod rerank;
pub mod runner;
pub mod search;
pub mod session;

pub use config::{Backend, Config};
pub use confirm::{AutoConfirm, ConfirmationSource, Decision, ScriptedConfirmation, TerminalConfirmation};
pub use error::{Error, Result};
pub use gate::has_any_data;
pub use loader::{EpisodeLoader, LoadReport};
pub use phase::Phase;
pub use pipeline::{PipelineReport, QueryPipeline};
pub use recipe::{truncate_summary, NodeView, RecipeSearch};
pub use rerank::Reranker;
pub use runner::{PhaseRunner, RunOutcome, RunnerState};
pub use search::SearchOrchestrator;
pub use session::{Completion, SessionResult, StoreSession};
