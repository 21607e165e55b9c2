pub mod error;

pub use error::{CampaignError, Result};
