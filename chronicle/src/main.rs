use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronicle::config::parse_node_limit;
use chronicle::demo::{self, DEFAULT_QUERY};
use chronicle::{
    AutoConfirm, Backend, Config, ConfirmationSource, Error, PhaseRunner, QueryPipeline,
    RunOutcome, StoreSession, TerminalConfirmation,
};
use chronicle_kg::{GraphStore, MemoryGraphStore, Neo4jGraphStore, SearchConfig, NODE_HYBRID_SEARCH_RRF};

#[derive(Parser)]
#[command(name = "chronicle")]
#[command(about = "Temporal knowledge graph ingestion and reranked search", long_about = None)]
struct Cli {
    /// Graph store backend (neo4j or memory); overrides CHRONICLE_BACKEND
    #[arg(short, long)]
    backend: Option<String>,

    /// Maximum nodes returned by recipe search; overrides CHRONICLE_NODE_LIMIT
    #[arg(short, long)]
    node_limit: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demonstration phases, then run the query pipeline
    Demo {
        /// Continue at every gate without asking
        #[arg(short, long)]
        yes: bool,

        /// Query for the pipeline
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Load the demonstration phases only
    Load {
        /// Continue at every gate without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Hybrid search, center-node rerank and recipe node search
    Search {
        /// Search query
        query: String,

        /// Node search recipe
        #[arg(short, long, default_value = "node_hybrid_search_rrf")]
        recipe: String,

        /// Maximum nodes to return (defaults to the configured node limit)
        #[arg(short, long)]
        limit: Option<String>,
    },

    /// Report whether the graph holds any data
    Status,

    /// Delete all graph data
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "chronicle=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Using {} backend", config.backend);

    // Recipe names and limits are configuration: resolve before touching the store
    let (recipe, node_limit) = match &cli.command {
        Commands::Search { recipe, limit, .. } => {
            (resolve_recipe(recipe)?, config.search_limit(limit.as_deref())?)
        }
        _ => (NODE_HYBRID_SEARCH_RRF, config.node_limit),
    };

    match config.backend {
        Backend::Neo4j => {
            let store = Neo4jGraphStore::connect(&config.neo4j).await?;
            execute(store, &cli.command, &recipe, node_limit).await
        }
        Backend::Memory => {
            let store = MemoryGraphStore::new()?;
            execute(store, &cli.command, &recipe, node_limit).await
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(backend) = &cli.backend {
        config = config.with_backend(backend.parse()?);
    }
    if let Some(limit) = &cli.node_limit {
        config = config.with_node_limit(parse_node_limit(limit)?);
    }
    config.validate()?;
    Ok(config)
}

fn resolve_recipe(name: &str) -> Result<SearchConfig> {
    SearchConfig::by_name(name)
        .ok_or_else(|| Error::Configuration(format!("unknown search recipe '{}'", name)).into())
}

async fn execute<S: GraphStore>(
    store: S,
    command: &Commands,
    recipe: &SearchConfig,
    node_limit: usize,
) -> Result<()> {
    let session = StoreSession::open(store);

    match command {
        Commands::Demo { yes, query } => {
            let query = query.as_deref().unwrap_or(DEFAULT_QUERY);
            let result = run_demo(session.store(), *yes, query, recipe, node_limit).await;
            session.finish(result).await?;
        }

        Commands::Load { yes } => {
            let result = load_phases(session.store(), *yes).await;
            session.finish(result).await?;
        }

        Commands::Search { query, .. } => {
            let result = QueryPipeline::new(session.store(), recipe.clone(), node_limit)
                .run(query)
                .await;
            session.finish(result).await?;
        }

        Commands::Status => {
            let result = chronicle::has_any_data(session.store()).await;
            let exists = session.finish(result).await?;
            println!(
                "Graph {}",
                if exists { "contains data" } else { "is empty" }
            );
        }

        Commands::Clear => {
            let result = session
                .store()
                .clear_all_data()
                .await
                .map_err(Error::from);
            session.finish(result).await?;
            println!("Graph data cleared.");
        }
    }

    Ok(())
}

async fn load_phases<S: GraphStore>(store: &S, yes: bool) -> chronicle::Result<RunOutcome> {
    let phases = demo::phases()?;
    let mut confirmation: Box<dyn ConfirmationSource> = if yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalConfirmation::stdio())
    };

    PhaseRunner::new(store, confirmation.as_mut())
        .run(&phases)
        .await
}

async fn run_demo<S: GraphStore>(
    store: &S,
    yes: bool,
    query: &str,
    recipe: &SearchConfig,
    node_limit: usize,
) -> chronicle::Result<RunOutcome> {
    let outcome = load_phases(store, yes).await?;
    if let RunOutcome::Aborted { completed_phases } = outcome {
        info!("Skipping query pipeline after abort ({} phase(s) loaded)", completed_phases);
        return Ok(outcome);
    }

    QueryPipeline::new(store, recipe.clone(), node_limit)
        .run(query)
        .await?;
    Ok(outcome)
}
