//! Test utilities for database and router testing.
//!
//! Provides an in-memory SQLite database with migrations applied, a lead
//! fixture helper, and an application router wired to mock-server-backed
//! providers.

use std::sync::Arc;

use anyhow::Result;
use leadscout::config::AppConfig;
use leadscout::providers::{AnthropicPitchProvider, ApifyCrawlerProvider, ApifyMapsProvider};
use leadscout::repositories::{CreateLeadRequest, LeadRepository};
use leadscout::server::{AppState, ProviderSet, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_TOKEN: &str = "test-operator-token";

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Inserts a lead with the given name and city, returning its model.
#[allow(dead_code)]
pub async fn insert_lead(
    db: &DatabaseConnection,
    company_name: &str,
    city: &str,
) -> Result<leadscout::models::lead::Model> {
    let repo = LeadRepository::new(db);
    let lead = repo
        .create(CreateLeadRequest {
            source: "google_maps".to_string(),
            company_name: company_name.to_string(),
            address: format!("Straat 1, {}, Nederland", city),
            city: city.to_string(),
            postal_code: "1234 AB".to_string(),
            ..Default::default()
        })
        .await?;
    Ok(lead)
}

/// Builds an application state whose providers all point at `provider_base`
/// (typically a wiremock server URI).
#[allow(dead_code)]
pub async fn setup_test_state(provider_base: &str) -> Result<AppState> {
    let config = AppConfig {
        profile: "test".to_string(),
        operator_tokens: vec![TEST_TOKEN.to_string()],
        apify_token: Some("test-apify-token".to_string()),
        apify_api_base: provider_base.to_string(),
        anthropic_api_key: Some("test-anthropic-key".to_string()),
        anthropic_api_base: provider_base.to_string(),
        ..Default::default()
    };

    let db = setup_test_db().await?;
    let providers = Arc::new(ProviderSet {
        maps: Arc::new(ApifyMapsProvider::new(
            config.apify_api_base.clone(),
            "test-apify-token".to_string(),
        )),
        crawler: Arc::new(ApifyCrawlerProvider::new(
            config.apify_api_base.clone(),
            "test-apify-token".to_string(),
        )),
        pitch: Arc::new(AnthropicPitchProvider::new(
            config.anthropic_api_base.clone(),
            "test-anthropic-key".to_string(),
            config.anthropic_model.clone(),
            config.pitch_max_tokens,
        )),
    });

    Ok(AppState {
        db,
        config: Arc::new(config),
        providers,
    })
}

/// Builds the full router plus its state for oneshot-style tests.
#[allow(dead_code)]
pub async fn setup_test_app(provider_base: &str) -> Result<(AppState, axum::Router)> {
    let state = setup_test_state(provider_base).await?;
    let app = create_app(state.clone());
    Ok((state, app))
}
