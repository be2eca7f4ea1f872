//! # Lead Repository
//!
//! This module contains the repository implementation for Lead entities. It
//! owns the store contract of the lead lifecycle: creation with validation,
//! filtered listing, partial updates with status recomputation, the
//! enrichment and pitch merge operations, and the ingestion dedup predicate.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::lead::{
    self, ActiveModel as LeadActiveModel, CallStatus, Entity as Lead, LeadStatus,
    Model as LeadModel, StringList, dedupe_key,
};

/// Request data for creating a new lead from an ingested listing.
#[derive(Debug, Clone, Default)]
pub struct CreateLeadRequest {
    /// Ingestion channel name, e.g. "google_maps".
    pub source: String,
    pub company_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub google_rating: Option<f64>,
    pub review_count: Option<i32>,
}

/// Conjunction of optional filter predicates for listing leads.
///
/// Absent fields impose no constraint. `limit`/`offset` paginate the result
/// set only; the reported total always covers the whole filtered set.
#[derive(Debug, Clone, Default)]
pub struct LeadFilters {
    pub status: Option<LeadStatus>,
    pub call_status: Option<CallStatus>,
    pub has_website: Option<bool>,
    pub has_phone: Option<bool>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Partial update over a lead. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct LeadPatch {
    pub owner_name: Option<String>,
    pub contact_person: Option<String>,
    pub description: Option<String>,
    pub services: Option<Vec<String>>,
    pub specializations: Option<Vec<String>>,
    pub recent_projects: Option<Vec<String>>,
    pub employee_estimate: Option<i32>,
    pub pitch: Option<String>,
    pub call_status: Option<CallStatus>,
    pub call_notes: Option<String>,
    pub enriched_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Website-derived attributes merged into a lead by the enrichment flow.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentData {
    pub description: Option<String>,
    pub services: Vec<String>,
    pub specializations: Vec<String>,
    pub recent_projects: Vec<String>,
    pub owner_name: Option<String>,
    pub contact_person: Option<String>,
    pub employee_estimate: Option<i32>,
}

/// Repository for Lead database operations
pub struct LeadRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LeadRepository<'a> {
    /// Create a new LeadRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new lead with status `scraped`.
    pub async fn create(&self, request: CreateLeadRequest) -> Result<LeadModel, RepositoryError> {
        if request.company_name.trim().is_empty() {
            return Err(RepositoryError::validation("company_name is required"));
        }
        if request.city.trim().is_empty() {
            return Err(RepositoryError::validation("city is required"));
        }

        let now = Utc::now();
        let key = dedupe_key(&request.company_name, &request.city);

        let lead = LeadActiveModel {
            id: Set(Uuid::new_v4()),
            source: Set(request.source),
            company_name: Set(request.company_name),
            address: Set(request.address),
            city: Set(request.city),
            postal_code: Set(request.postal_code),
            phone: Set(request.phone),
            website: Set(request.website),
            google_rating: Set(request.google_rating),
            review_count: Set(request.review_count),
            owner_name: Set(None),
            contact_person: Set(None),
            description: Set(None),
            services: Set(StringList::default()),
            specializations: Set(StringList::default()),
            recent_projects: Set(StringList::default()),
            employee_estimate: Set(None),
            pitch: Set(None),
            pitch_generated_at: Set(None),
            call_status: Set(CallStatus::NotCalled),
            call_notes: Set(None),
            called_at: Set(None),
            scraped_at: Set(now.into()),
            enriched_at: Set(None),
            status: Set(LeadStatus::Scraped),
            dedupe_key: Set(key),
        };

        let result = lead.insert(self.db).await?;
        Ok(result)
    }

    /// Get a lead by ID.
    pub async fn get(&self, lead_id: Uuid) -> Result<LeadModel, RepositoryError> {
        Lead::find_by_id(lead_id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// List leads matching the filters in insertion order, plus the total
    /// count of the filtered set independent of pagination.
    pub async fn list(
        &self,
        filters: &LeadFilters,
    ) -> Result<(Vec<LeadModel>, u64), RepositoryError> {
        let condition = Self::filter_condition(filters);

        let total = Lead::find()
            .filter(condition.clone())
            .count(self.db)
            .await?;

        let mut query = Lead::find()
            .filter(condition)
            .order_by_asc(lead::Column::ScrapedAt)
            .order_by_asc(lead::Column::Id);

        if let Some(offset) = filters.offset {
            query = query.offset(offset);
        }
        if let Some(limit) = filters.limit {
            query = query.limit(limit);
        }

        let leads = query.all(self.db).await?;
        Ok((leads, total))
    }

    /// Count leads matching the filters.
    pub async fn count(&self, filters: &LeadFilters) -> Result<u64, RepositoryError> {
        let count = Lead::find()
            .filter(Self::filter_condition(filters))
            .count(self.db)
            .await?;
        Ok(count)
    }

    /// Apply a partial update and recompute the derived status.
    ///
    /// Setting `pitch` stamps `pitch_generated_at` in the same write; moving
    /// `call_status` away from `not_called` stamps `called_at` once.
    pub async fn update(
        &self,
        lead_id: Uuid,
        patch: LeadPatch,
    ) -> Result<LeadModel, RepositoryError> {
        let existing = self.get(lead_id).await?;
        let now = Utc::now();

        let pitch_after = patch.pitch.clone().or_else(|| existing.pitch.clone());
        let enriched_at_after = patch.enriched_at.or(existing.enriched_at);

        let mut active = existing.clone().into_active_model();

        if let Some(owner_name) = patch.owner_name {
            active.owner_name = Set(Some(owner_name));
        }
        if let Some(contact_person) = patch.contact_person {
            active.contact_person = Set(Some(contact_person));
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(services) = patch.services {
            active.services = Set(services.into());
        }
        if let Some(specializations) = patch.specializations {
            active.specializations = Set(specializations.into());
        }
        if let Some(recent_projects) = patch.recent_projects {
            active.recent_projects = Set(recent_projects.into());
        }
        if let Some(employee_estimate) = patch.employee_estimate {
            active.employee_estimate = Set(Some(employee_estimate));
        }
        if let Some(pitch) = patch.pitch {
            active.pitch = Set(Some(pitch));
            active.pitch_generated_at = Set(Some(now.into()));
        }
        if let Some(call_status) = patch.call_status {
            active.call_status = Set(call_status);
            if call_status != CallStatus::NotCalled && existing.called_at.is_none() {
                active.called_at = Set(Some(now.into()));
            }
        }
        if let Some(call_notes) = patch.call_notes {
            active.call_notes = Set(Some(call_notes));
        }
        if let Some(enriched_at) = patch.enriched_at {
            active.enriched_at = Set(Some(enriched_at));
        }

        active.status = Set(LeadStatus::derive(pitch_after.as_deref(), enriched_at_after));

        let result = active.update(self.db).await?;
        Ok(result)
    }

    /// Merge website-derived attributes into a lead and stamp `enriched_at`.
    pub async fn apply_enrichment(
        &self,
        lead_id: Uuid,
        data: EnrichmentData,
    ) -> Result<LeadModel, RepositoryError> {
        let existing = self.get(lead_id).await?;
        let now = Utc::now();

        let mut active = existing.clone().into_active_model();
        active.description = Set(data.description);
        active.services = Set(data.services.into());
        active.specializations = Set(data.specializations.into());
        active.recent_projects = Set(data.recent_projects.into());
        if data.owner_name.is_some() {
            active.owner_name = Set(data.owner_name);
        }
        if data.contact_person.is_some() {
            active.contact_person = Set(data.contact_person);
        }
        active.employee_estimate = Set(data.employee_estimate);
        active.enriched_at = Set(Some(now.into()));
        active.status = Set(LeadStatus::derive(
            existing.pitch.as_deref(),
            Some(now.into()),
        ));

        let result = active.update(self.db).await?;
        Ok(result)
    }

    /// Store a generated pitch, stamping `pitch_generated_at` atomically.
    pub async fn apply_pitch(
        &self,
        lead_id: Uuid,
        pitch: String,
    ) -> Result<LeadModel, RepositoryError> {
        self.update(
            lead_id,
            LeadPatch {
                pitch: Some(pitch),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a lead. A second delete of the same id fails with NotFound.
    pub async fn delete(&self, lead_id: Uuid) -> Result<(), RepositoryError> {
        let lead = Lead::find_by_id(lead_id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        lead.delete(self.db).await?;
        Ok(())
    }

    /// Dedup predicate for ingestion: a listing is a duplicate when its
    /// normalized company name + city match an existing lead, or its phone
    /// number does.
    pub async fn find_duplicate(
        &self,
        company_name: &str,
        city: &str,
        phone: Option<&str>,
    ) -> Result<Option<LeadModel>, RepositoryError> {
        let key = dedupe_key(company_name, city);

        let mut condition = Condition::any().add(lead::Column::DedupeKey.eq(key));
        if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
            condition = condition.add(lead::Column::Phone.eq(phone));
        }

        let existing = Lead::find().filter(condition).one(self.db).await?;
        Ok(existing)
    }

    fn filter_condition(filters: &LeadFilters) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = filters.status {
            condition = condition.add(lead::Column::Status.eq(status));
        }
        if let Some(call_status) = filters.call_status {
            condition = condition.add(lead::Column::CallStatus.eq(call_status));
        }
        if let Some(has_website) = filters.has_website {
            condition = condition.add(if has_website {
                Condition::all()
                    .add(lead::Column::Website.is_not_null())
                    .add(lead::Column::Website.ne(""))
            } else {
                Condition::any()
                    .add(lead::Column::Website.is_null())
                    .add(lead::Column::Website.eq(""))
            });
        }
        if let Some(has_phone) = filters.has_phone {
            condition = condition.add(if has_phone {
                Condition::all()
                    .add(lead::Column::Phone.is_not_null())
                    .add(lead::Column::Phone.ne(""))
            } else {
                Condition::any()
                    .add(lead::Column::Phone.is_null())
                    .add(lead::Column::Phone.eq(""))
            });
        }
        if let Some(min) = filters.min_employees {
            condition = condition.add(lead::Column::EmployeeEstimate.gte(min));
        }
        if let Some(max) = filters.max_employees {
            condition = condition.add(lead::Column::EmployeeEstimate.lte(max));
        }

        condition
    }
}
