//! # Scrape Endpoint Handler
//!
//! Triggers a maps-provider search and stores the resulting leads.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{IngestionRequest, IngestionService};

/// Request to start a scrape run
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    /// What to search for; defaults to the configured search term
    pub search_term: Option<String>,
    /// Geographic region to search in; defaults to the configured region
    pub region: Option<String>,
    /// Maximum number of leads to fetch (1-500)
    pub max_leads: Option<u32>,
    /// Drop new leads with fewer employees than this (requires auto_enrich)
    pub min_employees: Option<i32>,
    /// Drop new leads with more employees than this (requires auto_enrich)
    pub max_employees: Option<i32>,
    /// Crawl each new lead's website immediately (default: true)
    pub auto_enrich: Option<bool>,
}

/// Response from a scrape run
#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapeResponse {
    pub status: String,
    /// Leads created and kept after filtering
    pub leads_found: usize,
    /// Human-readable summary of the run
    pub message: String,
}

/// Scrape businesses from the maps provider into the lead store
#[utoipa::path(
    post,
    path = "/api/scrape",
    security(("bearer_auth" = [])),
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Scrape run finished", body = ScrapeResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 502, description = "Maps provider error", body = ApiError)
    ),
    tag = "scrape"
)]
pub async fn scrape_businesses(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let ingestion_request = IngestionRequest {
        search_term: request
            .search_term
            .unwrap_or_else(|| state.config.default_search_term.clone()),
        region: request
            .region
            .unwrap_or_else(|| state.config.default_region.clone()),
        max_leads: request.max_leads.unwrap_or(state.config.default_max_leads),
        auto_enrich: request.auto_enrich.unwrap_or(true),
        min_employees: request.min_employees,
        max_employees: request.max_employees,
    };

    let enrichment = std::sync::Arc::new(crate::services::EnrichmentService::new(
        state.providers.crawler.clone(),
        state.config.enrich_max_pages,
    ));
    let service = IngestionService::new(state.providers.maps.clone(), enrichment);
    let summary = service.ingest(&state.db, ingestion_request).await?;

    Ok(Json(ScrapeResponse {
        status: "success".to_string(),
        leads_found: summary.leads_found,
        message: summary.message,
    }))
}
