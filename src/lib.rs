//! Laptop Advisor - a command-driven laptop catalog assistant
//!
//! This library provides the building blocks for the interactive advisor:
//! - CSV-backed catalog store and synthetic catalog generation
//! - Fuzzy brand matching tolerant of user typos
//! - Two-stage filter extraction (local patterns + delegated structured extraction)
//! - Cumulative session filters applied over the in-memory catalog
//! - Recommendation and comparison replies with deterministic fallbacks

pub mod advisor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod llm;
pub mod logging;
pub mod matcher;
pub mod session;

// Re-export main types for convenience
pub use crate::advisor::{Advisor, Outcome};
pub use crate::catalog::{CatalogStore, Product};
pub use crate::config::AdvisorConfig;
pub use crate::error::{AdvisorError, AdvisorResult};
pub use crate::filters::FilterSet;
pub use crate::session::Session;
