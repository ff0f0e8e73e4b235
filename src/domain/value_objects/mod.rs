//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderQuoteId`]: Provider-scoped quote identifier
//!
//! ## Requests
//!
//! - [`QuoteRequest`]: Canonical shipment quote request
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for non-finite monetary inputs
//! - [`round2`]: Two-decimal rounding used for all prices
//!
//! ## Domain Enums
//!
//! - `ProviderName`, `CourierName`, `ServiceType`
//! - `MarginType`, `AdjustmentSource`, `Environment`

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod shipment;

pub use arithmetic::{ArithmeticError, ArithmeticResult, ensure_finite, round2};
pub use enums::{
    AdjustmentSource, CourierName, Environment, MarginType, ParseEnumError, ProviderName,
    ServiceType,
};
pub use ids::ProviderQuoteId;
pub use shipment::QuoteRequest;
