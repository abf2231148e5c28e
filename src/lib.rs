pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod report;
pub mod services;

use std::num::NonZeroUsize;

use anyhow::Result;
use clap::Parser;

use crate::api::{create_router, AppState};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::{load_ratings, RatingStore};
use crate::services::RecommenderEngine;

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Applies command-line overrides on top of the environment configuration
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(path) = &cli.ratings {
        config.ratings_path = Some(path.clone());
        config.database_url = None;
    }
    Ok(config)
}

pub fn execute(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let store = runtime.block_on(load_ratings(config.rating_source().as_ref()))?;

    match cli.command {
        Command::Serve { port } => runtime.block_on(handle_serve(store, config, port)),
        Command::Users => {
            print!("{}", handle_users(&store));
            Ok(())
        }
        Command::Recommend {
            user,
            limit,
            neighbors,
        } => {
            let limit = limit.unwrap_or(config.recommendation_limit);
            let neighborhood = neighbors.or(config.neighborhood()?);
            print!("{}", handle_recommend(&store, &user, limit, neighborhood)?);
            Ok(())
        }
        Command::Similarity { user_a, user_b } => {
            println!("{}", handle_similarity(&store, &user_a, &user_b)?);
            Ok(())
        }
        Command::Neighbors { user } => {
            print!("{}", handle_neighbors(&store, &user)?);
            Ok(())
        }
    }
}

pub async fn handle_serve(store: RatingStore, config: Config, port: Option<u16>) -> Result<()> {
    let addr = format!("{}:{}", config.host, port.unwrap_or(config.port));
    let app = create_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn handle_users(store: &RatingStore) -> String {
    store.users().map(|user| format!("{}\n", user)).collect()
}

pub fn handle_recommend(
    store: &RatingStore,
    user: &str,
    limit: usize,
    neighborhood: Option<NonZeroUsize>,
) -> Result<String> {
    let engine = RecommenderEngine::new(store).with_neighborhood(neighborhood);
    let recommendations = engine.recommend_top(user, limit)?;
    let neighbors = engine.neighbors(user)?;
    Ok(report::render(user, &recommendations, &neighbors))
}

pub fn handle_similarity(store: &RatingStore, user_a: &str, user_b: &str) -> Result<String> {
    let similarity = RecommenderEngine::new(store).similarity(user_a, user_b)?;
    Ok(format!("{:.4}", similarity))
}

pub fn handle_neighbors(store: &RatingStore, user: &str) -> Result<String> {
    let neighbors = RecommenderEngine::new(store).neighbors(user)?;
    Ok(report::render_neighbors(user, &neighbors))
}
