//! # Domain Entities
//!
//! Core business records flowing through the quote and guide pipelines.
//!
//! ## Entities
//!
//! - [`CanonicalQuote`]: Normalized quote from any provider
//! - [`GuideRequest`] / [`GuideResult`]: Canonical guide creation contract
//! - [`GlobalMarginConfig`]: Persisted margin configuration
//! - [`MarginTable`]: Per-request margin lookup table
//! - [`TokenRecord`]: Stored provider session token

pub mod guide;
pub mod margin_config;
pub mod quote;
pub mod token;

pub use guide::{Address, GuideRequest, GuideResult, Parcel};
pub use margin_config::{
    CourierMargin, GlobalMarginConfig, MarginLookup, MarginTable, ProfitMargin, ProviderMargins,
};
pub use quote::{CanonicalQuote, MarginAdjustment};
pub use token::TokenRecord;
