//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Leadscout API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::db::init_pool;
use crate::handlers;
use crate::providers::{
    AnthropicPitchProvider, ApifyCrawlerProvider, ApifyMapsProvider, CrawlerProvider, MapsProvider,
    PitchProvider,
};
use crate::telemetry;

/// The external collaborators behind their capability traits.
pub struct ProviderSet {
    pub maps: Arc<dyn MapsProvider>,
    pub crawler: Arc<dyn CrawlerProvider>,
    pub pitch: Arc<dyn PitchProvider>,
}

impl ProviderSet {
    /// Build the production providers from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let apify_token = config.apify_token.clone().unwrap_or_default();
        let anthropic_key = config.anthropic_api_key.clone().unwrap_or_default();

        Self {
            maps: Arc::new(ApifyMapsProvider::new(
                config.apify_api_base.clone(),
                apify_token.clone(),
            )),
            crawler: Arc::new(ApifyCrawlerProvider::new(
                config.apify_api_base.clone(),
                apify_token,
            )),
            pitch: Arc::new(AnthropicPitchProvider::new(
                config.anthropic_api_base.clone(),
                anthropic_key,
                config.anthropic_model.clone(),
                config.pitch_max_tokens,
            )),
        }
    }
}

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub providers: Arc<ProviderSet>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/scrape", post(handlers::scrape::scrape_businesses))
        .route("/enrich", post(handlers::enrich::enrich_leads))
        .route(
            "/generate-pitch/{lead_id}",
            post(handlers::pitch::generate_pitch_for_lead),
        )
        .route(
            "/generate-pitches",
            post(handlers::pitch::generate_pitches_batch),
        )
        .route("/leads", get(handlers::leads::list_leads))
        .route(
            "/leads/{lead_id}",
            get(handlers::leads::get_lead)
                .patch(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/export/csv", get(handlers::export::export_csv))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = init_pool(&config).await?;
    migration::Migrator::up(&db, None).await?;

    let providers = Arc::new(ProviderSet::from_config(&config));
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState {
        db,
        config: Arc::new(config),
        providers,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::scrape::scrape_businesses,
        crate::handlers::enrich::enrich_leads,
        crate::handlers::pitch::generate_pitch_for_lead,
        crate::handlers::pitch::generate_pitches_batch,
        crate::handlers::leads::list_leads,
        crate::handlers::leads::get_lead,
        crate::handlers::leads::update_lead,
        crate::handlers::leads::delete_lead,
        crate::handlers::export::export_csv,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::lead::Model,
            crate::models::lead::LeadStatus,
            crate::models::lead::CallStatus,
            crate::models::lead::StringList,
            crate::handlers::scrape::ScrapeRequest,
            crate::handlers::scrape::ScrapeResponse,
            crate::handlers::enrich::EnrichRequest,
            crate::handlers::enrich::EnrichResponse,
            crate::handlers::pitch::GeneratePitchRequest,
            crate::handlers::pitch::GeneratePitchResponse,
            crate::handlers::leads::LeadsListResponse,
            crate::handlers::leads::UpdateLeadRequest,
            crate::handlers::leads::DeleteLeadResponse,
            crate::error::ApiError,
        )
    ),
    info(
        title = "Leadscout API",
        description = "API for scraping, enriching and pitching business leads",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
