//! # Pitch Generation Handlers
//!
//! Single-lead and batch pitch generation through the text-generation
//! provider.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::models::lead::Model as LeadModel;
use crate::repositories::LeadRepository;
use crate::server::AppState;
use crate::services::PitchService;

/// Request to generate pitches for a batch of leads
#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePitchRequest {
    pub lead_ids: Vec<Uuid>,
}

/// Response from a batch pitch run
#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratePitchResponse {
    pub status: String,
    /// Number of pitches that were generated and stored
    pub pitches_generated: usize,
    /// Human-readable summary of the run
    pub message: String,
}

/// Generate a pitch for a single lead
#[utoipa::path(
    post,
    path = "/api/generate-pitch/{lead_id}",
    security(("bearer_auth" = [])),
    params(("lead_id" = Uuid, Path, description = "Lead identifier")),
    responses(
        (status = 200, description = "Pitch generated and stored", body = LeadModel),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Lead not found", body = ApiError),
        (status = 502, description = "Text-generation provider error", body = ApiError)
    ),
    tag = "pitch"
)]
pub async fn generate_pitch_for_lead(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<LeadModel>, ApiError> {
    let service = PitchService::new(state.providers.pitch.clone());
    let updated = service.generate_for_lead(&state.db, lead_id).await?;
    Ok(Json(updated))
}

/// Generate pitches for multiple leads
///
/// Per-lead failures are logged and skipped; the response counts successes.
#[utoipa::path(
    post,
    path = "/api/generate-pitches",
    security(("bearer_auth" = [])),
    request_body = GeneratePitchRequest,
    responses(
        (status = 200, description = "Batch run finished", body = GeneratePitchResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "None of the requested leads exist", body = ApiError)
    ),
    tag = "pitch"
)]
pub async fn generate_pitches_batch(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Json(request): Json<GeneratePitchRequest>,
) -> Result<Json<GeneratePitchResponse>, ApiError> {
    // Target only ids that actually exist; the whole batch 404s when none do.
    let repo = LeadRepository::new(&state.db);
    let mut existing = Vec::with_capacity(request.lead_ids.len());
    for lead_id in &request.lead_ids {
        match repo.get(*lead_id).await {
            Ok(lead) => existing.push(lead.id),
            Err(crate::error::RepositoryError::NotFound) => {
                tracing::warn!(lead_id = %lead_id, "Skipping unknown lead in pitch batch");
            }
            Err(err) => return Err(err.into()),
        }
    }

    if existing.is_empty() {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Geen leads gevonden",
        ));
    }

    let service = PitchService::new(state.providers.pitch.clone());
    let summary = service.generate_batch(&state.db, &existing).await?;

    Ok(Json(GeneratePitchResponse {
        status: "success".to_string(),
        pitches_generated: summary.generated,
        message: summary.message,
    }))
}
