#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use leadcast::{
    CampaignError, Delivery, InMemoryLeadStore, Lead, LeadCollection, LeadStore, Mailer, Result,
    SimulatedMailer,
};

pub fn leads(items: Vec<Lead>) -> LeadCollection {
    LeadCollection::new(items).expect("unique ids")
}

/// Mailer that records how many deliveries were started.
pub struct CountingMailer {
    inner: SimulatedMailer,
    calls: AtomicUsize,
}

impl CountingMailer {
    pub fn new(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: SimulatedMailer::new(latency),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for CountingMailer {
    async fn deliver(&self, lead: &Lead) -> Delivery {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.deliver(lead).await
    }
}

/// In-memory store whose loads or saves can be switched to fail.
pub struct FlakyStore {
    pub inner: InMemoryLeadStore,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl FlakyStore {
    pub fn new(leads: LeadCollection) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryLeadStore::new(leads),
            fail_loads: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
        })
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LeadStore for FlakyStore {
    async fn load_all(&self) -> Result<LeadCollection> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(CampaignError::storage_read("injected read failure"));
        }
        self.inner.load_all().await
    }

    async fn save_all(&self, leads: &LeadCollection) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CampaignError::storage_write("injected write failure"));
        }
        self.inner.save_all(leads).await
    }
}
