use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::{
    db::{CsvSource, PostgresSource, RatingSource, SampleSource},
    error::{AppError, AppResult},
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; takes precedence over `ratings_path`
    #[serde(default)]
    pub database_url: Option<String>,

    /// CSV file with `user,item,rating` rows
    #[serde(default)]
    pub ratings_path: Option<String>,

    /// Whether the CSV file starts with a header row
    #[serde(default)]
    pub ratings_has_headers: bool,

    /// Only the N most similar neighbors contribute when set
    #[serde(default)]
    pub neighborhood_size: Option<usize>,

    /// Default number of recommendations returned
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_recommendation_limit() -> usize {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            ratings_path: None,
            ratings_has_headers: false,
            neighborhood_size: None,
            recommendation_limit: default_recommendation_limit(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.neighborhood()?;
        Ok(config)
    }

    /// The configured neighborhood size; zero is rejected
    pub fn neighborhood(&self) -> AppResult<Option<NonZeroUsize>> {
        neighborhood_size(self.neighborhood_size)
    }

    /// Picks the rating source: Postgres, then CSV, then the built-in sample
    pub fn rating_source(&self) -> Box<dyn RatingSource> {
        if let Some(url) = &self.database_url {
            Box::new(PostgresSource::new(url.clone()))
        } else if let Some(path) = &self.ratings_path {
            Box::new(CsvSource::new(path).has_headers(self.ratings_has_headers))
        } else {
            Box::new(SampleSource)
        }
    }
}

/// Validates a requested neighborhood size
///
/// `None` means every positive neighbor contributes. A size of zero would
/// silently discard every contributor, so it is an input error.
pub fn neighborhood_size(size: Option<usize>) -> AppResult<Option<NonZeroUsize>> {
    match size {
        None => Ok(None),
        Some(n) => NonZeroUsize::new(n).map(Some).ok_or_else(|| {
            AppError::InvalidInput("neighborhood size must be at least 1".to_string())
        }),
    }
}
