use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core::{CampaignError, Result};

pub type LeadId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Pending,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub email: String,
    pub status: LeadStatus,
    /// Fields this service does not interpret; written back untouched.
    #[serde(flatten, default)]
    pub extra: JsonMap<String, JsonValue>,
}

impl Lead {
    pub fn pending(id: LeadId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            status: LeadStatus::Pending,
            extra: JsonMap::new(),
        }
    }

    pub fn sent(id: LeadId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            status: LeadStatus::Sent,
            extra: JsonMap::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == LeadStatus::Pending
    }

    /// Moves the lead to `sent`. Returns false when it already was; status never goes back.
    fn mark_sent(&mut self) -> bool {
        if self.is_pending() {
            self.status = LeadStatus::Sent;
            true
        } else {
            false
        }
    }
}

/// Ordered leads keyed by unique id.
///
/// Construction rejects duplicate ids, so every deserialized collection already
/// satisfies the uniqueness invariant. Order is the insertion order and is kept
/// as-is through every read/write cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Lead>", into = "Vec<Lead>")]
pub struct LeadCollection {
    leads: Vec<Lead>,
}

impl LeadCollection {
    pub fn new(leads: Vec<Lead>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(leads.len());
        for lead in &leads {
            if !seen.insert(lead.id) {
                return Err(CampaignError::storage_read(format!(
                    "duplicate lead id {}",
                    lead.id
                )));
            }
        }
        Ok(Self { leads })
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lead> {
        self.leads.iter()
    }

    pub fn get(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    pub fn as_slice(&self) -> &[Lead] {
        &self.leads
    }

    pub fn into_inner(self) -> Vec<Lead> {
        self.leads
    }

    /// Requested leads that are still pending, in collection order.
    pub fn eligible(&self, request: &CampaignRequest) -> Vec<&Lead> {
        self.leads
            .iter()
            .filter(|lead| lead.is_pending() && request.contains(lead.id))
            .collect()
    }

    /// Flips the given leads from pending to sent and returns how many changed.
    pub fn mark_sent(&mut self, ids: &HashSet<LeadId>) -> usize {
        self.leads
            .iter_mut()
            .filter(|lead| ids.contains(&lead.id))
            .map(Lead::mark_sent)
            .filter(|changed| *changed)
            .count()
    }
}

impl TryFrom<Vec<Lead>> for LeadCollection {
    type Error = String;

    fn try_from(leads: Vec<Lead>) -> std::result::Result<Self, Self::Error> {
        Self::new(leads).map_err(|err| err.to_string())
    }
}

impl From<LeadCollection> for Vec<Lead> {
    fn from(collection: LeadCollection) -> Self {
        collection.leads
    }
}

/// On-disk shape: `{ "leads": [...] }` plus any other top-level members,
/// which are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDocument {
    pub leads: LeadCollection,
    #[serde(flatten, default)]
    pub extra: JsonMap<String, JsonValue>,
}

/// Set of requested lead ids. Multiplicity in the input is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignRequest {
    ids: BTreeSet<LeadId>,
}

impl CampaignRequest {
    pub fn new(ids: impl IntoIterator<Item = LeadId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Builds a request from the untyped `leadIds` member of a request body.
    ///
    /// The value must be present and be an array of integers. Whole-valued
    /// floats such as `1.0` count as integers.
    pub fn from_json(lead_ids: Option<&JsonValue>) -> Result<Self> {
        let Some(value) = lead_ids else {
            return Err(CampaignError::invalid_request("leadIds must be an array"));
        };
        let JsonValue::Array(items) = value else {
            return Err(CampaignError::invalid_request("leadIds must be an array"));
        };

        let ids = items
            .iter()
            .map(|item| {
                json_lead_id(item).ok_or_else(|| {
                    CampaignError::invalid_request(format!(
                        "leadIds must contain only integers, got {}",
                        item
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(ids))
    }

    pub fn contains(&self, id: LeadId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn json_lead_id(item: &JsonValue) -> Option<LeadId> {
    if let Some(id) = item.as_i64() {
        return Some(id);
    }
    let float = item.as_f64()?;
    let in_range = float >= LeadId::MIN as f64 && float < LeadId::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as LeadId)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignResult {
    pub sent_count: usize,
    pub leads: LeadCollection,
}

impl CampaignResult {
    pub fn message(&self) -> String {
        if self.sent_count == 0 {
            "No pending leads found to send".to_string()
        } else {
            format!("Successfully sent {} email(s)", self.sent_count)
        }
    }
}
