use tracing::info;

use crate::core::Result;
use crate::domain::{Lead, LeadCollection};
use crate::storage::{JsonFileLeadStore, LeadStore};

/// Starter leads written to a fresh data file.
pub fn default_leads() -> LeadCollection {
    LeadCollection::new(vec![
        Lead::pending(1, "john.doe@example.com"),
        Lead::pending(2, "jane.smith@example.com"),
        Lead::sent(3, "bob.wilson@example.com"),
        Lead::pending(4, "alice.brown@example.com"),
        Lead::pending(5, "charlie.davis@example.com"),
    ])
    .unwrap_or_default()
}

/// Writes `leads` to the store's file if it does not exist yet.
///
/// Returns whether a seed was written. An existing file is never touched.
pub async fn ensure_seeded(store: &JsonFileLeadStore, leads: &LeadCollection) -> Result<bool> {
    if store.exists().await {
        return Ok(false);
    }

    store.save_all(leads).await?;
    info!(
        path = %store.path().display(),
        lead_count = leads.len(),
        "seeded lead document"
    );
    Ok(true)
}
