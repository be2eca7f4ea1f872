//! # Leads CRUD Handlers
//!
//! List, fetch, patch and delete operations over stored leads.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::models::lead::{CallStatus, LeadStatus, Model as LeadModel};
use crate::repositories::{LeadFilters, LeadPatch, LeadRepository};
use crate::server::AppState;

/// Query parameters for listing leads
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListLeadsQuery {
    /// Filter by lifecycle status
    pub status: Option<LeadStatus>,
    /// Filter by call status
    pub call_status: Option<CallStatus>,
    /// Only leads with (true) or without (false) a website
    pub has_website: Option<bool>,
    /// Only leads with (true) or without (false) a phone number
    pub has_phone: Option<bool>,
    /// Minimum employee estimate (inclusive)
    pub min_employees: Option<i32>,
    /// Maximum employee estimate (inclusive)
    pub max_employees: Option<i32>,
    /// Maximum number of leads to return (1-500)
    pub limit: Option<u64>,
    /// Number of leads to skip
    pub offset: Option<u64>,
}

/// Response payload for the leads listing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct LeadsListResponse {
    /// Leads matching the query, in insertion order
    pub leads: Vec<LeadModel>,
    /// Total number of leads matching the filters, ignoring pagination
    pub total: u64,
}

/// Partial update request for a lead
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLeadRequest {
    /// New call status
    pub call_status: Option<CallStatus>,
    /// Free-form call notes
    pub call_notes: Option<String>,
    /// Corrected owner name
    pub owner_name: Option<String>,
    /// Contact person, when different from the owner
    pub contact_person: Option<String>,
}

/// Response payload for lead deletion
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteLeadResponse {
    pub status: String,
    pub message: String,
}

/// List leads with filters and pagination
#[utoipa::path(
    get,
    path = "/api/leads",
    security(("bearer_auth" = [])),
    params(ListLeadsQuery),
    responses(
        (status = 200, description = "Leads listed successfully", body = LeadsListResponse),
        (status = 400, description = "Invalid query parameters", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "leads"
)]
pub async fn list_leads(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<LeadsListResponse>, ApiError> {
    if let Some(limit) = query.limit
        && !(1..=500).contains(&limit)
    {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "limit must be between 1 and 500",
        ));
    }

    let filters = LeadFilters {
        status: query.status,
        call_status: query.call_status,
        has_website: query.has_website,
        has_phone: query.has_phone,
        min_employees: query.min_employees,
        max_employees: query.max_employees,
        limit: query.limit,
        offset: query.offset,
    };

    let repo = LeadRepository::new(&state.db);
    let (leads, total) = repo.list(&filters).await?;

    Ok(Json(LeadsListResponse { leads, total }))
}

/// Fetch a single lead by ID
#[utoipa::path(
    get,
    path = "/api/leads/{lead_id}",
    security(("bearer_auth" = [])),
    params(("lead_id" = Uuid, Path, description = "Lead identifier")),
    responses(
        (status = 200, description = "Lead found", body = LeadModel),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Lead not found", body = ApiError)
    ),
    tag = "leads"
)]
pub async fn get_lead(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<LeadModel>, ApiError> {
    let repo = LeadRepository::new(&state.db);
    let lead = repo.get(lead_id).await?;
    Ok(Json(lead))
}

/// Update a lead's call-review fields
#[utoipa::path(
    patch,
    path = "/api/leads/{lead_id}",
    security(("bearer_auth" = [])),
    params(("lead_id" = Uuid, Path, description = "Lead identifier")),
    request_body = UpdateLeadRequest,
    responses(
        (status = 200, description = "Lead updated", body = LeadModel),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Lead not found", body = ApiError)
    ),
    tag = "leads"
)]
pub async fn update_lead(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(lead_id): Path<Uuid>,
    Json(request): Json<UpdateLeadRequest>,
) -> Result<Json<LeadModel>, ApiError> {
    let patch = LeadPatch {
        call_status: request.call_status,
        call_notes: request.call_notes,
        owner_name: request.owner_name,
        contact_person: request.contact_person,
        ..Default::default()
    };

    let repo = LeadRepository::new(&state.db);
    let updated = repo.update(lead_id, patch).await?;

    Ok(Json(updated))
}

/// Delete a lead
#[utoipa::path(
    delete,
    path = "/api/leads/{lead_id}",
    security(("bearer_auth" = [])),
    params(("lead_id" = Uuid, Path, description = "Lead identifier")),
    responses(
        (status = 200, description = "Lead deleted", body = DeleteLeadResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Lead not found", body = ApiError)
    ),
    tag = "leads"
)]
pub async fn delete_lead(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<DeleteLeadResponse>, ApiError> {
    let repo = LeadRepository::new(&state.db);
    repo.delete(lead_id).await?;

    Ok(Json(DeleteLeadResponse {
        status: "success".to_string(),
        message: "Lead verwijderd".to_string(),
    }))
}
