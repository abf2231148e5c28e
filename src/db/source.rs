use crate::{db::RatingStore, error::AppResult};

/// Anything that can produce the rating dataset
///
/// The store is rebuilt from scratch on every load; sources keep no state
/// between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingSource: Send + Sync {
    /// Reads every rating and builds a fresh store
    async fn load(&self) -> AppResult<RatingStore>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// The built-in reference dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

#[async_trait::async_trait]
impl RatingSource for SampleSource {
    async fn load(&self) -> AppResult<RatingStore> {
        Ok(RatingStore::sample())
    }

    fn name(&self) -> &'static str {
        "sample"
    }
}

/// Loads a store from the given source, logging what was read
pub async fn load_ratings(source: &dyn RatingSource) -> AppResult<RatingStore> {
    tracing::info!(source = source.name(), "Loading ratings");

    let store = source.load().await?;

    tracing::info!(
        source = source.name(),
        users = store.user_count(),
        ratings = store.rating_count(),
        "Ratings loaded"
    );

    Ok(store)
}
