//! Lead enrichment flow.
//!
//! Walks a set of target leads, crawls each lead's website through the
//! crawler provider and merges the extracted attributes into the store. Leads
//! are enriched independently; one lead's crawl failure is logged and skipped
//! without aborting the rest of the batch.

use std::sync::Arc;

use metrics::counter;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::{EnrichmentError, RepositoryError};
use crate::models::lead::{LeadStatus, Model as LeadModel};
use crate::providers::CrawlerProvider;
use crate::repositories::{LeadFilters, LeadRepository};
use crate::services::extract::extract_business_info;

/// Outcome of enriching a single lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    Enriched,
    /// Lead has no website to crawl; left unenriched.
    NoWebsite,
}

/// Aggregate result of a batch enrichment run.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentSummary {
    pub targeted: usize,
    pub enriched: usize,
    pub skipped_no_website: usize,
    pub failed: usize,
}

/// Service driving the website-crawling collaborator.
pub struct EnrichmentService {
    crawler: Arc<dyn CrawlerProvider>,
    max_pages_per_site: u32,
}

impl EnrichmentService {
    pub fn new(crawler: Arc<dyn CrawlerProvider>, max_pages_per_site: u32) -> Self {
        Self {
            crawler,
            max_pages_per_site,
        }
    }

    /// Enrich one lead in place.
    pub async fn enrich_one(
        &self,
        db: &DatabaseConnection,
        lead: &LeadModel,
    ) -> Result<EnrichOutcome, EnrichmentError> {
        let Some(website) = lead.website.as_deref().filter(|w| !w.trim().is_empty()) else {
            return Ok(EnrichOutcome::NoWebsite);
        };

        let content = self
            .crawler
            .crawl_site(website, self.max_pages_per_site)
            .await?;
        let data = extract_business_info(&content);

        let repo = LeadRepository::new(db);
        repo.apply_enrichment(lead.id, data).await?;

        Ok(EnrichOutcome::Enriched)
    }

    /// Enrich a batch of leads, best effort.
    ///
    /// Targets the given ids, or every lead with status `scraped` when no ids
    /// are supplied. Unknown ids and per-lead failures are logged and skipped.
    pub async fn enrich(
        &self,
        db: &DatabaseConnection,
        lead_ids: Option<Vec<Uuid>>,
    ) -> Result<EnrichmentSummary, EnrichmentError> {
        let repo = LeadRepository::new(db);

        let targets = match lead_ids {
            Some(ids) => {
                let mut leads = Vec::with_capacity(ids.len());
                for id in ids {
                    match repo.get(id).await {
                        Ok(lead) => leads.push(lead),
                        Err(RepositoryError::NotFound) => {
                            tracing::warn!(lead_id = %id, "Skipping unknown lead in enrichment batch");
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                leads
            }
            None => {
                let (leads, _) = repo
                    .list(&LeadFilters {
                        status: Some(LeadStatus::Scraped),
                        ..Default::default()
                    })
                    .await?;
                leads
            }
        };

        let mut summary = EnrichmentSummary {
            targeted: targets.len(),
            ..Default::default()
        };

        // Strictly sequential; providers are rate-limited upstream and call
        // volumes are small.
        for lead in &targets {
            match self.enrich_one(db, lead).await {
                Ok(EnrichOutcome::Enriched) => {
                    counter!("enrichment_success_total").increment(1);
                    summary.enriched += 1;
                }
                Ok(EnrichOutcome::NoWebsite) => {
                    summary.skipped_no_website += 1;
                }
                Err(err) => {
                    counter!("enrichment_failure_total").increment(1);
                    tracing::warn!(
                        lead_id = %lead.id,
                        company_name = %lead.company_name,
                        error = %err,
                        "Enrichment failed for lead; continuing with the rest"
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
