//! # Shipping Quotes
//!
//! Shipping-quote aggregation and guide creation across carrier-aggregator
//! providers.
//!
//! A quote request is fanned out to every configured provider (GE, T1,
//! Pakke, Manuable). Each provider's response is normalized into a
//! [`CanonicalQuote`](domain::entities::CanonicalQuote), priced with the
//! configured profit margins, and merged into one list ordered by total.
//! Guides are created against the provider that issued the chosen quote.
//!
//! # Layers
//!
//! - [`domain`]: Quotes, guides, margin configuration, and the margin engine
//! - [`infrastructure`]: Provider adapters, token management, persistence
//! - [`application`]: Quote aggregation, guide creation, margin settings
//! - [`api`]: REST surface
//! - [`config`]: Layered settings

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
