//! Pitch generation flow.
//!
//! Builds the sales-pitch prompt for a lead, runs it through the
//! text-generation provider and stores the result. Single-lead generation is
//! all-or-nothing; the batch variant collects per-lead failures instead of
//! aborting.

use std::sync::Arc;

use metrics::counter;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::PitchGenerationError;
use crate::models::lead::Model as LeadModel;
use crate::providers::PitchProvider;
use crate::repositories::LeadRepository;
use crate::services::prompt::build_pitch_prompt;

/// Aggregate result of a batch pitch run.
#[derive(Debug, Clone, Default)]
pub struct PitchSummary {
    pub targeted: usize,
    pub generated: usize,
    pub failed: usize,
    /// Human-readable Dutch summary for the operator UI.
    pub message: String,
}

/// Service driving the text-generation collaborator.
pub struct PitchService {
    provider: Arc<dyn PitchProvider>,
}

impl PitchService {
    pub fn new(provider: Arc<dyn PitchProvider>) -> Self {
        Self { provider }
    }

    /// Generate and store a pitch for one lead.
    ///
    /// On failure the lead is left untouched, without a partial pitch.
    pub async fn generate_for_lead(
        &self,
        db: &DatabaseConnection,
        lead_id: Uuid,
    ) -> Result<LeadModel, PitchGenerationError> {
        let repo = LeadRepository::new(db);
        let lead = repo.get(lead_id).await?;

        let prompt = build_pitch_prompt(&lead);
        let pitch = self.provider.complete(&prompt).await?;

        let updated = repo.apply_pitch(lead_id, pitch).await?;
        counter!("pitch_success_total").increment(1);

        tracing::info!(
            lead_id = %lead_id,
            company_name = %updated.company_name,
            "Pitch generated"
        );

        Ok(updated)
    }

    /// Generate pitches for a batch of leads, best effort.
    pub async fn generate_batch(
        &self,
        db: &DatabaseConnection,
        lead_ids: &[Uuid],
    ) -> Result<PitchSummary, PitchGenerationError> {
        let mut summary = PitchSummary {
            targeted: lead_ids.len(),
            ..Default::default()
        };

        for &lead_id in lead_ids {
            match self.generate_for_lead(db, lead_id).await {
                Ok(_) => summary.generated += 1,
                Err(err) => {
                    counter!("pitch_failure_total").increment(1);
                    tracing::warn!(
                        lead_id = %lead_id,
                        error = %err,
                        "Pitch generation failed for lead; continuing with the rest"
                    );
                    summary.failed += 1;
                }
            }
        }

        summary.message = format!("Succesvol {} pitches gegenereerd", summary.generated);
        Ok(summary)
    }
}
