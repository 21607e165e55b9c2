//! Lead persistence boundary.
//!
//! The dispatcher only ever sees [`LeadStore`]; the flat JSON file is one
//! implementation of it and the in-memory store is another.

pub mod json_file;
pub mod memory;

use async_trait::async_trait;

use crate::core::Result;
use crate::domain::LeadCollection;

pub use json_file::JsonFileLeadStore;
pub use memory::InMemoryLeadStore;

/// Whole-collection load/save contract.
///
/// `save_all` is a full replace: implementations either swap in the complete
/// new collection or leave the previous content untouched.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Fails with `CampaignError::StorageRead` when the backing resource is
    /// missing, unreadable, or malformed.
    async fn load_all(&self) -> Result<LeadCollection>;

    /// Fails with `CampaignError::StorageWrite` on any I/O failure.
    async fn save_all(&self, leads: &LeadCollection) -> Result<()>;
}

