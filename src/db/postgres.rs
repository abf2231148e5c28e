use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{RatingSource, RatingStore},
    error::{AppError, AppResult},
};

const RATINGS_QUERY: &str = "SELECT user_id, item_id, rating FROM ratings";

/// Ratings table in PostgreSQL
///
/// Expects `ratings(user_id TEXT, item_id TEXT, rating DOUBLE PRECISION)`.
/// Rows are read in one pass; the connection is not kept after loading.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    database_url: String,
}

impl PostgresSource {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }
}

#[async_trait::async_trait]
impl RatingSource for PostgresSource {
    async fn load(&self) -> AppResult<RatingStore> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&self.database_url)
            .await?;

        let rows: Vec<(String, String, f64)> =
            sqlx::query_as(RATINGS_QUERY).fetch_all(&pool).await?;
        pool.close().await;

        store_from_rows(rows)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Builds a store from `(user, item, rating)` rows, rejecting NaN and infinities
fn store_from_rows(rows: Vec<(String, String, f64)>) -> AppResult<RatingStore> {
    let mut store = RatingStore::new();
    for (user, item, rating) in rows {
        if !rating.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "rating of '{}' by '{}' is not finite",
                item, user
            )));
        }
        store.insert(user, item, rating);
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: &str, item: &str, rating: f64) -> (String, String, f64) {
        (user.to_string(), item.to_string(), rating)
    }

    #[test]
    fn test_rows_build_store() {
        let store = store_from_rows(vec![
            row("Alice", "Frozen", 1.0),
            row("Alice", "Inception", 5.0),
            row("Bob", "Frozen", 2.0),
        ])
        .unwrap();
        assert_eq!(store.user_count(), 2);
        assert_eq!(store.rating_count(), 3);
    }

    #[test]
    fn test_non_finite_rows_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let rows = vec![row("Alice", "Frozen", 1.0), row("Bob", "Dune", bad)];
            let result = store_from_rows(rows);
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }
}
