//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`providers`]: HTTP integrations with shipping aggregators
//! - [`persistence`]: Repository ports and in-memory stores

pub mod persistence;
pub mod providers;
