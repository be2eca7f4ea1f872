//! # CSV Export Handler
//!
//! Streams the filtered lead set as a CSV download.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::export::{export_filename, leads_to_csv};
use crate::models::lead::{CallStatus, LeadStatus};
use crate::repositories::{LeadFilters, LeadRepository};
use crate::server::AppState;

/// Query parameters for the CSV export
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Filter by lifecycle status
    pub status: Option<LeadStatus>,
    /// Filter by call status
    pub call_status: Option<CallStatus>,
}

/// Export leads to CSV
#[utoipa::path(
    get,
    path = "/api/export/csv",
    security(("bearer_auth" = [])),
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "export"
)]
pub async fn export_csv(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filters = LeadFilters {
        status: query.status,
        call_status: query.call_status,
        ..Default::default()
    };

    let repo = LeadRepository::new(&state.db);
    let (leads, _) = repo.list(&filters).await?;

    let body = leads_to_csv(&leads);
    let filename = export_filename();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename={}", filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, body))
}
