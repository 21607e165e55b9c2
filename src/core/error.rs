use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// Deliveries completed but the status transitions were never persisted.
    #[error(
        "Commit failed after {delivered} delivery(ies) completed; outcome is indeterminate: {reason}"
    )]
    CommitIndeterminate { delivered: usize, reason: String },
}

impl CampaignError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::StorageRead(message.into())
    }

    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::StorageWrite(message.into())
    }

    /// True when the caller cannot tell whether the side effects happened.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::CommitIndeterminate { .. })
    }
}

pub type Result<T> = std::result::Result<T, CampaignError>;
