//! Lead ingestion flow.
//!
//! Runs a maps-provider search, maps the raw listings into the lead store with
//! dedup, and optionally enriches the newly created leads in the same pass so
//! an employee-count filter can prune them before they reach the caller.

use std::sync::Arc;

use metrics::counter;
use sea_orm::DatabaseConnection;

use crate::error::IngestionError;
use crate::providers::{BusinessListing, MapsProvider, SearchQuery};
use crate::repositories::{CreateLeadRequest, LeadRepository};
use crate::services::enrichment::{EnrichOutcome, EnrichmentService};

/// Parameters for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestionRequest {
    pub search_term: String,
    pub region: String,
    pub max_leads: u32,
    /// Crawl each new lead's website immediately after creation.
    pub auto_enrich: bool,
    /// With `auto_enrich`, drop new leads whose employee estimate falls
    /// outside these bounds.
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

/// Aggregate result of one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestionSummary {
    /// Leads created and still present after filtering.
    pub leads_found: usize,
    pub duplicates_skipped: usize,
    pub enriched: usize,
    pub filtered_out: usize,
    /// Human-readable Dutch summary for the operator UI.
    pub message: String,
}

/// Service driving the maps-scraping collaborator.
pub struct IngestionService {
    maps: Arc<dyn MapsProvider>,
    enrichment: Arc<EnrichmentService>,
}

impl IngestionService {
    pub fn new(maps: Arc<dyn MapsProvider>, enrichment: Arc<EnrichmentService>) -> Self {
        Self { maps, enrichment }
    }

    /// Run one search-and-store pass.
    ///
    /// A provider failure before any listing is stored aborts the run; leads
    /// committed before a later failure stay in the store.
    pub async fn ingest(
        &self,
        db: &DatabaseConnection,
        request: IngestionRequest,
    ) -> Result<IngestionSummary, IngestionError> {
        let query = SearchQuery {
            search_term: request.search_term.clone(),
            region: request.region.clone(),
            max_results: request.max_leads,
        };

        tracing::info!(
            search_term = %query.search_term,
            region = %query.region,
            max_results = query.max_results,
            "Starting business search"
        );

        let listings = self.maps.search_businesses(&query).await?;
        counter!("ingestion_listings_total").increment(listings.len() as u64);

        let repo = LeadRepository::new(db);
        let mut created = Vec::new();
        let mut duplicates_skipped = 0usize;

        for listing in listings {
            let Some(create) = map_listing(&listing) else {
                tracing::warn!(
                    title = listing.title.as_deref().unwrap_or(""),
                    "Skipping listing without a resolvable city"
                );
                continue;
            };

            if let Some(existing) = repo
                .find_duplicate(&create.company_name, &create.city, create.phone.as_deref())
                .await?
            {
                tracing::debug!(
                    company_name = %create.company_name,
                    existing_id = %existing.id,
                    "Skipping duplicate listing"
                );
                duplicates_skipped += 1;
                continue;
            }

            let lead = repo.create(create).await?;
            created.push(lead);
        }

        counter!("ingestion_leads_created_total").increment(created.len() as u64);

        let scraped = created.len();
        let mut enriched = 0usize;
        let mut filtered_out = 0usize;

        if request.auto_enrich {
            for lead in &created {
                match self.enrichment.enrich_one(db, lead).await {
                    Ok(EnrichOutcome::Enriched) => enriched += 1,
                    Ok(EnrichOutcome::NoWebsite) => {}
                    Err(err) => {
                        tracing::warn!(
                            lead_id = %lead.id,
                            company_name = %lead.company_name,
                            error = %err,
                            "Auto-enrichment failed for new lead"
                        );
                    }
                }
            }

            // Employee filtering only applies to this run's leads; estimates
            // come from the enrichment pass above.
            if request.min_employees.is_some() || request.max_employees.is_some() {
                for lead in &created {
                    let current = repo.get(lead.id).await?;
                    let Some(estimate) = current.employee_estimate else {
                        continue;
                    };
                    let below = request.min_employees.is_some_and(|min| estimate < min);
                    let above = request.max_employees.is_some_and(|max| estimate > max);
                    if below || above {
                        repo.delete(lead.id).await?;
                        filtered_out += 1;
                    }
                }
            }
        }

        let leads_found = scraped - filtered_out;
        let mut message = format!("Succesvol {scraped} leads gescraped");
        if request.auto_enrich {
            message.push_str(&format!(", {enriched} verrijkt"));
        }
        if filtered_out > 0 {
            message.push_str(&format!(", {leads_found} na filtering"));
        }

        tracing::info!(
            scraped,
            enriched,
            filtered_out,
            duplicates_skipped,
            "Ingestion run finished"
        );

        Ok(IngestionSummary {
            leads_found,
            duplicates_skipped,
            enriched,
            filtered_out,
            message,
        })
    }
}

/// Map one raw listing to a create request.
///
/// The maps provider sometimes omits the city; when it does, the second-last
/// comma-separated address component usually holds it. Listings with no
/// resolvable city are dropped.
fn map_listing(listing: &BusinessListing) -> Option<CreateLeadRequest> {
    let address = listing.address.clone().unwrap_or_default();

    let city = listing
        .city
        .clone()
        .filter(|c| !c.trim().is_empty())
        .or_else(|| {
            let parts: Vec<&str> = address.split(',').collect();
            (parts.len() >= 2).then(|| parts[parts.len() - 2].trim().to_string())
        })
        .filter(|c| !c.trim().is_empty())?;

    Some(CreateLeadRequest {
        source: "google_maps".to_string(),
        company_name: listing
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Onbekend".to_string()),
        address,
        city,
        postal_code: listing.postal_code.clone().unwrap_or_default(),
        phone: listing.phone.clone(),
        website: listing.website.clone(),
        google_rating: listing.total_score,
        review_count: listing.reviews_count,
    })
}
