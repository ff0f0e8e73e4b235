//! # In-Memory Margin Configuration Repository
//!
//! In-memory implementation of [`MarginConfigRepository`].

use crate::domain::entities::GlobalMarginConfig;
use crate::infrastructure::persistence::traits::{MarginConfigRepository, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`MarginConfigRepository`].
///
/// Readers receive a clone, so a request keeps its snapshot even if the
/// configuration is replaced while it runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarginConfigRepository {
    storage: Arc<RwLock<Option<GlobalMarginConfig>>>,
}

impl InMemoryMarginConfigRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with a configuration.
    #[must_use]
    pub fn with_config(config: GlobalMarginConfig) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Some(config))),
        }
    }

    /// Removes the stored configuration.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        *storage = None;
    }
}

#[async_trait]
impl MarginConfigRepository for InMemoryMarginConfigRepository {
    async fn get(&self) -> RepositoryResult<Option<GlobalMarginConfig>> {
        let storage = self.storage.read().await;
        Ok(storage.clone())
    }

    async fn save(&self, config: &GlobalMarginConfig) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        *storage = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::ProfitMargin;

    #[tokio::test]
    async fn empty_then_saved() {
        let repo = InMemoryMarginConfigRepository::new();
        assert!(repo.get().await.unwrap().is_none());

        let config = GlobalMarginConfig::new(ProfitMargin::percentage(10.0));
        repo.save(&config).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn snapshot_is_detached() {
        let repo =
            InMemoryMarginConfigRepository::with_config(GlobalMarginConfig::new(
                ProfitMargin::percentage(10.0),
            ));
        let snapshot = repo.get().await.unwrap().unwrap();

        repo.save(&GlobalMarginConfig::new(ProfitMargin::absolute(5.0)))
            .await
            .unwrap();

        assert_eq!(
            snapshot.global_margin_profit,
            ProfitMargin::percentage(10.0)
        );
        repo.clear().await;
        assert!(repo.get().await.unwrap().is_none());
    }
}
