//! # Domain Services
//!
//! Domain services encapsulating business logic that doesn't naturally
//! belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`margin`]: Profit margin computation and resolution

pub mod margin;

pub use margin::{
    MarginError, MarginResult, PROFIT_MARGIN_APPLIED, add_absolute_margin, add_percentage_margin,
    apply_courier_or_default_margin, apply_global_or_none, apply_margins,
};
