//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`QuoteAggregator`]: Concurrent quote collection, pricing, and ordering
//! - [`GuideCreationService`]: Guide creation routed by provider
//! - [`MarginSettingsService`]: Margin configuration updates

pub mod guide_creation;
pub mod margin_settings;
pub mod quote_aggregation;

pub use guide_creation::GuideCreationService;
pub use margin_settings::MarginSettingsService;
pub use quote_aggregation::{
    AggregationResult, MARGIN_CONFIG_UNAVAILABLE, QuoteAggregator, provider_failure_message,
};
