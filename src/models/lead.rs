//! Lead entity model
//!
//! This module contains the SeaORM entity model for the leads table, which
//! tracks a prospective business contact through its scraped -> enriched ->
//! pitch_ready lifecycle, plus the call-review state mutated by the operator.

use sea_orm::{ActiveModelBehavior, FromJsonQueryResult};
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle stage of a lead. Derived from other fields, never set directly;
/// see [`LeadStatus::derive`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Freshly ingested from the maps provider.
    #[sea_orm(string_value = "scraped")]
    Scraped,
    /// Website-derived attributes have been merged in.
    #[sea_orm(string_value = "enriched")]
    Enriched,
    /// An outreach pitch has been generated.
    #[sea_orm(string_value = "pitch_ready")]
    PitchReady,
}

impl LeadStatus {
    /// Project the lifecycle stage from its source fields.
    ///
    /// The stage reflects the most advanced step reached: `pitch_ready` iff a
    /// pitch exists, `enriched` iff enrichment completed without a pitch,
    /// `scraped` otherwise. Recomputed on every mutation so it can never
    /// drift from its inputs.
    pub fn derive(pitch: Option<&str>, enriched_at: Option<DateTimeWithTimeZone>) -> Self {
        if pitch.is_some() {
            LeadStatus::PitchReady
        } else if enriched_at.is_some() {
            LeadStatus::Enriched
        } else {
            LeadStatus::Scraped
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Scraped => "scraped",
            LeadStatus::Enriched => "enriched",
            LeadStatus::PitchReady => "pitch_ready",
        }
    }
}

/// Outcome of the operator's call review for a lead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    #[sea_orm(string_value = "not_called")]
    NotCalled,
    #[sea_orm(string_value = "called")]
    Called,
    #[sea_orm(string_value = "interested")]
    Interested,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl CallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CallStatus::NotCalled => "not_called",
            CallStatus::Called => "called",
            CallStatus::Interested => "interested",
            CallStatus::Rejected => "rejected",
        }
    }
}

/// JSON-backed ordered list of strings for enrichment attributes.
///
/// Order is display-relevant only; no semantic meaning is attached.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a comma-separated string for flat-file export.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

/// Lead entity representing one prospective business contact.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    /// Unique identifier for the lead (primary key), assigned at creation.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Provenance tag, e.g. the ingestion channel name ("google_maps").
    pub source: String,

    pub company_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub google_rating: Option<f64>,
    pub review_count: Option<i32>,

    // Filled by enrichment.
    pub owner_name: Option<String>,
    pub contact_person: Option<String>,
    pub description: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub services: StringList,
    #[sea_orm(column_type = "JsonBinary")]
    pub specializations: StringList,
    #[sea_orm(column_type = "JsonBinary")]
    pub recent_projects: StringList,
    pub employee_estimate: Option<i32>,

    // Filled by pitch generation; the pair is set atomically.
    pub pitch: Option<String>,
    #[schema(value_type = Option<chrono::DateTime<chrono::Utc>>)]
    pub pitch_generated_at: Option<DateTimeWithTimeZone>,

    // Call tracking, mutated by the reviewer at any stage.
    pub call_status: CallStatus,
    pub call_notes: Option<String>,
    #[schema(value_type = Option<chrono::DateTime<chrono::Utc>>)]
    pub called_at: Option<DateTimeWithTimeZone>,

    /// Set at creation, immutable.
    #[schema(value_type = chrono::DateTime<chrono::Utc>)]
    pub scraped_at: DateTimeWithTimeZone,
    #[schema(value_type = Option<chrono::DateTime<chrono::Utc>>)]
    pub enriched_at: Option<DateTimeWithTimeZone>,

    /// Derived lifecycle stage; see [`LeadStatus::derive`].
    pub status: LeadStatus,

    /// Normalized company name + city used for ingestion dedup.
    #[serde(skip_serializing)]
    pub dedupe_key: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Normalized dedup key over company name and city.
///
/// Lowercases, strips punctuation and collapses whitespace so that
/// "GroenTotaal B.V." in "Rotterdam" and "groentotaal bv" in " rotterdam "
/// map to the same key. Kept as a single function so the matching policy can
/// evolve without touching the ingestion flow.
pub fn dedupe_key(company_name: &str, city: &str) -> String {
    format!("{}|{}", normalize(company_name), normalize(city))
}

fn normalize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_space = true;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn derive_status_scraped_without_enrichment_or_pitch() {
        assert_eq!(LeadStatus::derive(None, None), LeadStatus::Scraped);
    }

    #[test]
    fn derive_status_enriched_when_enriched_without_pitch() {
        let now = Utc::now().into();
        assert_eq!(LeadStatus::derive(None, Some(now)), LeadStatus::Enriched);
    }

    #[test]
    fn derive_status_pitch_ready_wins_over_enriched() {
        let now = Utc::now().into();
        assert_eq!(
            LeadStatus::derive(Some("Beste..."), Some(now)),
            LeadStatus::PitchReady
        );
        assert_eq!(
            LeadStatus::derive(Some("Beste..."), None),
            LeadStatus::PitchReady
        );
    }

    #[test]
    fn dedupe_key_normalizes_case_punctuation_and_whitespace() {
        assert_eq!(
            dedupe_key("GroenTotaal B.V.", "Rotterdam"),
            dedupe_key("groentotaal   bv", " rotterdam ")
        );
        assert_ne!(
            dedupe_key("GroenTotaal", "Rotterdam"),
            dedupe_key("GroenTotaal", "Den Haag")
        );
    }

    #[test]
    fn string_list_joins_for_export() {
        let list = StringList(vec!["tuinaanleg".into(), "snoeien".into()]);
        assert_eq!(list.joined(), "tuinaanleg, snoeien");
        assert!(StringList::default().is_empty());
    }
}
