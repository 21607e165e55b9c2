pub mod lead;

pub use lead::{CampaignRequest, CampaignResult, Lead, LeadCollection, LeadDocument, LeadId, LeadStatus};
