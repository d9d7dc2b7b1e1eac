//! Existence gate: is there anything in the graph already?

use chronicle_kg::GraphStore;
use tracing::info;

use crate::error::Result;

/// Whether at least one edge exists.
///
/// All-or-nothing: any data at all means the load is skipped, there is no
/// per-phase resume.
pub async fn has_any_data<S: GraphStore>(store: &S) -> Result<bool> {
    let exists = store.probe_any_edge().await?;
    info!("Existence probe: data {}", if exists { "found" } else { "absent" });
    Ok(exists)
}
