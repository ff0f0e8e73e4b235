//! # In-Memory Token Repository
//!
//! In-memory implementation of [`TokenRepository`].
//!
//! This implementation uses a thread-safe `HashMap` for storage. Tokens do
//! not survive a restart, which only costs one extra session request per
//! provider and environment.

use crate::domain::entities::TokenRecord;
use crate::domain::value_objects::{Environment, ProviderName};
use crate::infrastructure::persistence::traits::{RepositoryResult, TokenRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TokenRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryTokenRepository {
    storage: Arc<RwLock<HashMap<(ProviderName, Environment), TokenRecord>>>,
}

impl InMemoryTokenRepository {
    /// Creates a new empty in-memory token repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if no token is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn get(
        &self,
        provider: ProviderName,
        environment: Environment,
    ) -> RepositoryResult<Option<TokenRecord>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&(provider, environment)).cloned())
    }

    async fn save(&self, record: &TokenRecord) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert((record.provider(), record.environment()), record.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryTokenRepository::new();
        assert!(repo.is_empty());
        let result = repo
            .get(ProviderName::Manuable, Environment::Production)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn save_replaces_per_key() {
        let repo = InMemoryTokenRepository::new();
        repo.save(&TokenRecord::new(
            ProviderName::Manuable,
            Environment::Production,
            "one",
        ))
        .await
        .unwrap();
        repo.save(&TokenRecord::new(
            ProviderName::Manuable,
            Environment::Production,
            "two",
        ))
        .await
        .unwrap();

        let stored = repo
            .get(ProviderName::Manuable, Environment::Production)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.token(), "two");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn environments_are_isolated() {
        let repo = InMemoryTokenRepository::new();
        repo.save(&TokenRecord::new(
            ProviderName::Manuable,
            Environment::Development,
            "dev",
        ))
        .await
        .unwrap();

        assert!(
            repo.get(ProviderName::Manuable, Environment::Production)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.get(ProviderName::Manuable, Environment::Development)
                .await
                .unwrap()
                .is_some()
        );
    }
}
