//! # Domain Layer
//!
//! Provider-independent model of shipping quotes, guides and margins.
//!
//! - [`entities`]: Quotes, guides and margin configuration
//! - [`value_objects`]: Enums, identifiers, requests and arithmetic helpers
//! - [`services`]: The margin engine
//! - [`errors`]: Domain validation errors

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
