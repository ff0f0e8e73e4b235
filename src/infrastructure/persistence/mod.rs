//! # Persistence Layer
//!
//! Repository ports and their in-memory implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`TokenRepository`]: Provider session tokens
//! - [`MarginConfigRepository`]: Margin configuration document
//!
//! ## Implementations
//!
//! - `in_memory`: `tokio::sync::RwLock` backed stores

pub mod in_memory;
pub mod traits;

pub use traits::{MarginConfigRepository, RepositoryError, RepositoryResult, TokenRepository};
