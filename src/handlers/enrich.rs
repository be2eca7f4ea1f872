//! # Enrich Endpoint Handler
//!
//! Crawls lead websites and merges the extracted attributes.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::EnrichmentService;

/// Request to enrich leads
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnrichRequest {
    /// Leads to enrich; all leads with status `scraped` when omitted
    pub lead_ids: Option<Vec<Uuid>>,
    /// Pages to crawl per site; defaults to the configured maximum
    pub max_pages_per_site: Option<u32>,
}

/// Response from an enrichment run
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrichResponse {
    pub status: String,
    /// Number of leads that were successfully enriched
    pub leads_enriched: usize,
    /// Human-readable summary of the run
    pub message: String,
}

/// Enrich leads with website content
///
/// The response is an advisory summary; callers re-fetch leads to see the
/// merged attributes.
#[utoipa::path(
    post,
    path = "/api/enrich",
    security(("bearer_auth" = [])),
    request_body = EnrichRequest,
    responses(
        (status = 200, description = "Enrichment run finished", body = EnrichResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "enrich"
)]
pub async fn enrich_leads(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichResponse>, ApiError> {
    let max_pages = request
        .max_pages_per_site
        .unwrap_or(state.config.enrich_max_pages);

    let service = EnrichmentService::new(state.providers.crawler.clone(), max_pages);
    let summary = service.enrich(&state.db, request.lead_ids).await?;

    Ok(Json(EnrichResponse {
        status: "success".to_string(),
        leads_enriched: summary.enriched,
        message: format!(
            "Succesvol {} leads verrijkt met website data",
            summary.enriched
        ),
    }))
}
