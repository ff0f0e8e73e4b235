//! # Application Layer
//!
//! Use cases orchestrating the domain and the provider adapters.
//!
//! - [`services`]: Quote aggregation, guide creation, margin settings
//! - [`dto`]: Response envelopes
//! - [`error`]: Application error type

pub mod dto;
pub mod error;
pub mod services;

pub use dto::{GuideData, MarginSettingsData, QuotesData, ResponseEnvelope};
pub use error::{ApplicationError, ApplicationResult};
