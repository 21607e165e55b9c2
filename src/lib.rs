// ============================================================================
// leadcast: campaign dispatch over a flat-file lead store
// ============================================================================

pub mod config;
pub mod core;
pub mod dispatch;
pub mod domain;
pub mod seed;
pub mod storage;
pub mod web;

pub use crate::core::{CampaignError, Result};
pub use crate::dispatch::{CampaignDispatcher, Delivery, Mailer, SimulatedMailer};
pub use crate::domain::{CampaignRequest, CampaignResult, Lead, LeadCollection, LeadId, LeadStatus};
pub use crate::storage::{InMemoryLeadStore, JsonFileLeadStore, LeadStore};
pub use crate::web::{AppState, build_router};
