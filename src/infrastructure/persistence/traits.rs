//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the repository traits (ports) that abstract
//! persistence operations. The service only depends on these ports; the
//! bundled implementations keep state in memory.
//!
//! # Available Repositories
//!
//! - [`TokenRepository`]: Provider session tokens keyed by provider and environment
//! - [`MarginConfigRepository`]: The tenant-wide margin configuration document
//!
//! # Examples
//!
//! ```ignore
//! use shipping_quotes::infrastructure::persistence::traits::MarginConfigRepository;
//!
//! async fn snapshot(repo: &impl MarginConfigRepository) {
//!     let config = repo.get().await?;
//!     println!("margin configured: {}", config.is_some());
//! }
//! ```

use crate::domain::entities::{GlobalMarginConfig, TokenRecord};
use crate::domain::value_objects::{Environment, ProviderName};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for provider session tokens.
///
/// At most one token is stored per provider and environment. Saving
/// replaces the previous record; the last writer wins.
#[async_trait]
pub trait TokenRepository: Send + Sync + fmt::Debug {
    /// Gets the token record for a provider and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    async fn get(
        &self,
        provider: ProviderName,
        environment: Environment,
    ) -> RepositoryResult<Option<TokenRecord>>;

    /// Saves a token record, replacing any existing one for the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    async fn save(&self, record: &TokenRecord) -> RepositoryResult<()>;
}

/// Repository for the margin configuration document.
#[async_trait]
pub trait MarginConfigRepository: Send + Sync + fmt::Debug {
    /// Gets the current configuration, if one was ever stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    async fn get(&self) -> RepositoryResult<Option<GlobalMarginConfig>>;

    /// Replaces the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    async fn save(&self, config: &GlobalMarginConfig) -> RepositoryResult<()>;
}
