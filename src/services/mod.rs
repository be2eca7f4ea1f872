//! # Service Layer
//!
//! Orchestration of the external providers against the lead store: ingestion
//! (search and store), enrichment (crawl and extract), and pitch generation.

pub mod enrichment;
pub mod extract;
pub mod ingestion;
pub mod pitch;
pub mod prompt;

pub use enrichment::{EnrichOutcome, EnrichmentService, EnrichmentSummary};
pub use ingestion::{IngestionRequest, IngestionService, IngestionSummary};
pub use pitch::{PitchService, PitchSummary};
