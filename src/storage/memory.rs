use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::Result;
use crate::domain::LeadCollection;
use crate::storage::LeadStore;

/// Process-local lead store. Counts loads and saves so callers can observe
/// exactly how often the boundary was crossed.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<LeadCollection>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl InMemoryLeadStore {
    pub fn new(leads: LeadCollection) -> Self {
        Self {
            leads: RwLock::new(leads),
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        }
    }

    pub async fn snapshot(&self) -> LeadCollection {
        self.leads.read().await.clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn load_all(&self) -> Result<LeadCollection> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.leads.read().await.clone())
    }

    async fn save_all(&self, leads: &LeadCollection) -> Result<()> {
        *self.leads.write().await = leads.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Lead;

    #[tokio::test]
    async fn save_replaces_whole_collection() {
        let store = InMemoryLeadStore::new(
            LeadCollection::new(vec![Lead::pending(1, "a@x.com"), Lead::pending(2, "b@x.com")])
                .unwrap(),
        );

        let replacement = LeadCollection::new(vec![Lead::sent(2, "b@x.com")]).unwrap();
        store.save_all(&replacement).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), replacement);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }
}
