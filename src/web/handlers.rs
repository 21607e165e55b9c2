use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::CampaignError;
use crate::domain::{CampaignRequest, Lead};
use crate::web::{AppState, Result};

#[derive(Debug, Serialize)]
pub struct SendCampaignResponse {
    pub message: String,
    pub sent: usize,
    pub leads: Vec<Lead>,
}

pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_leads(State(state): State<AppState>) -> Result<Json<Vec<Lead>>> {
    let leads = state.dispatcher.list_leads().await?;
    Ok(Json(leads.into_inner()))
}

pub async fn send_campaign(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SendCampaignResponse>> {
    let Json(body) = payload?;
    if !body.is_object() {
        return Err(CampaignError::invalid_request("request body must be a JSON object").into());
    }

    let request = CampaignRequest::from_json(body.get("leadIds"))?;
    let result = state.dispatcher.dispatch(request).await?;

    Ok(Json(SendCampaignResponse {
        message: result.message(),
        sent: result.sent_count,
        leads: result.leads.into_inner(),
    }))
}
