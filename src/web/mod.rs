//! HTTP surface of the campaign service.
//!
//! Every route is served both at the root and under `/api`, except `/health`.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::dispatch::CampaignDispatcher;

pub use error::{ErrorResponse, Result, WebError};
pub use handlers::SendCampaignResponse;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CampaignDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<CampaignDispatcher>) -> Self {
        Self { dispatcher }
    }
}

pub fn build_router(state: AppState) -> Router {
    let leads: Router<AppState> = Router::new()
        .route("/leads", get(handlers::list_leads))
        .route("/send-campaign", post(handlers::send_campaign));

    Router::new()
        .route("/health", get(handlers::healthcheck))
        .merge(leads.clone())
        .nest("/api", leads)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS]),
        )
        .with_state(state)
}
