//! # Leadscout API Library
//!
//! This library provides the core functionality for the Leadscout API
//! service: lead ingestion from a maps provider, website enrichment, pitch
//! generation and CSV export, plus the HTTP surface over the lead store.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod repositories;
pub mod server;
pub mod services;
pub mod telemetry;
pub use migration;
