//! Campaign dispatch: select pending leads, deliver to all of them
//! concurrently, then commit the status transitions in a single write.

pub mod mailer;

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::core::{CampaignError, Result};
use crate::domain::{CampaignRequest, CampaignResult, Lead, LeadCollection, LeadId};
use crate::storage::LeadStore;

pub use mailer::{Delivery, Mailer, SimulatedMailer};

#[derive(Clone)]
pub struct CampaignDispatcher {
    store: Arc<dyn LeadStore>,
    mailer: Arc<dyn Mailer>,
}

impl CampaignDispatcher {
    pub fn new(store: Arc<dyn LeadStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    pub async fn list_leads(&self) -> Result<LeadCollection> {
        self.store.load_all().await.inspect_err(|err| {
            error!(error = %err, "failed to load leads");
        })
    }

    /// Runs one campaign over `request`.
    ///
    /// Nothing is delivered if the load fails. When the commit fails after the
    /// deliveries went out the error is `CommitIndeterminate`; calling again
    /// with the same ids is safe because already-sent leads are skipped.
    pub async fn dispatch(&self, request: CampaignRequest) -> Result<CampaignResult> {
        let mut leads = self.store.load_all().await.inspect_err(|err| {
            error!(error = %err, "campaign aborted: failed to load leads");
        })?;

        let eligible: Vec<Lead> = leads.eligible(&request).into_iter().cloned().collect();
        if eligible.is_empty() {
            debug!(
                requested = request.len(),
                lead_count = leads.len(),
                "no pending leads among requested ids"
            );
            return Ok(CampaignResult {
                sent_count: 0,
                leads,
            });
        }

        info!(
            requested = request.len(),
            eligible = eligible.len(),
            "dispatching campaign"
        );

        let deliveries = join_all(eligible.iter().map(|lead| self.mailer.deliver(lead))).await;
        let delivered: HashSet<LeadId> = deliveries.iter().map(|d| d.lead_id).collect();

        let sent_count = leads.mark_sent(&delivered);

        if let Err(err) = self.store.save_all(&leads).await {
            warn!(
                delivered = delivered.len(),
                error = %err,
                "deliveries completed but commit failed; outcome indeterminate"
            );
            return Err(CampaignError::CommitIndeterminate {
                delivered: delivered.len(),
                reason: err.to_string(),
            });
        }

        info!(sent = sent_count, "campaign committed");
        Ok(CampaignResult { sent_count, leads })
    }
}
