//! # External Providers
//!
//! This module contains the clients for the three external collaborators the
//! Leadscout API composes: the Apify Google Maps actor (business listings),
//! the Apify website-content-crawler actor (page text for enrichment) and the
//! Anthropic Messages API (pitch text generation).

pub mod anthropic;
pub mod apify;
pub mod trait_;

pub use anthropic::AnthropicPitchProvider;
pub use apify::{ApifyCrawlerProvider, ApifyMapsProvider};
pub use trait_::{
    BusinessListing, CrawlerProvider, MapsProvider, PitchProvider, ProviderError, SearchQuery,
};
