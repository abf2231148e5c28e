pub mod ranking;
pub mod recommender;
pub mod similarity;

pub use recommender::{recommend, similarity, RecommenderEngine};
