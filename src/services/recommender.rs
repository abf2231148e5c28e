use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use crate::{
    db::RatingStore,
    error::RecommendError,
    models::{Recommendation, SimilarityScore},
    services::{ranking, similarity::pearson},
};

/// User-based collaborative filtering over a borrowed rating store
///
/// Every call recomputes from the store's current contents; nothing is
/// cached between calls, so the engine is cheap to build per request.
pub struct RecommenderEngine<'a> {
    store: &'a RatingStore,
    neighborhood: Option<NonZeroUsize>,
}

impl<'a> RecommenderEngine<'a> {
    /// Creates an engine in which every positively correlated user contributes
    pub fn new(store: &'a RatingStore) -> Self {
        Self {
            store,
            neighborhood: None,
        }
    }

    /// Restricts contributions to the `size` most similar neighbors
    pub fn with_neighborhood(mut self, size: Option<NonZeroUsize>) -> Self {
        self.neighborhood = size;
        self
    }

    /// Pearson similarity between two users
    ///
    /// A user compared with themselves scores 1.0.
    pub fn similarity(&self, first: &str, second: &str) -> Result<f64, RecommendError> {
        let first_ratings = self.store.ratings_for(first)?;
        let second_ratings = self.store.ratings_for(second)?;

        if first == second {
            return Ok(1.0);
        }

        Ok(pearson(first_ratings, second_ratings))
    }

    /// Every other user with their similarity to `user`, most similar first
    pub fn neighbors(&self, user: &str) -> Result<Vec<SimilarityScore>, RecommendError> {
        let own = self.store.ratings_for(user)?;

        let mut scores = Vec::with_capacity(self.store.user_count().saturating_sub(1));
        for other in self.store.users().filter(|other| *other != user) {
            let theirs = self.store.ratings_for(other)?;
            scores.push(SimilarityScore::new(other, pearson(own, theirs)));
        }

        ranking::rank_neighbors(&mut scores);
        Ok(scores)
    }

    /// Ranked recommendations for items `user` has not rated
    ///
    /// Each candidate's score is the similarity-weighted mean of the ratings
    /// given by positively correlated neighbors. Users with similarity <= 0
    /// contribute nothing.
    pub fn recommend(&self, user: &str) -> Result<Vec<Recommendation>, RecommendError> {
        let own = self.store.ratings_for(user)?;

        let mut contributors: Vec<SimilarityScore> = self
            .neighbors(user)?
            .into_iter()
            .filter(|score| score.similarity > 0.0)
            .collect();
        if let Some(size) = self.neighborhood {
            contributors.truncate(size.get());
        }

        // item -> (sum of rating * similarity, sum of similarity)
        let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for neighbor in &contributors {
            let sim = neighbor.similarity;
            for (item, &rating) in self.store.ratings_for(&neighbor.user)? {
                if own.contains_key(item) {
                    continue;
                }
                let entry = totals.entry(item.as_str()).or_insert((0.0, 0.0));
                entry.0 += rating * sim;
                entry.1 += sim;
            }
        }

        let mut recommendations: Vec<Recommendation> = totals
            .into_iter()
            .filter(|(_, (_, sim_sum))| *sim_sum > 0.0)
            .map(|(item, (total, sim_sum))| Recommendation::new(item, total / sim_sum))
            .collect();

        ranking::rank_recommendations(&mut recommendations);

        tracing::debug!(
            user = %user,
            neighbors = contributors.len(),
            candidates = recommendations.len(),
            "Recommendations computed"
        );

        Ok(recommendations)
    }

    /// The `limit` best recommendations for `user`
    pub fn recommend_top(
        &self,
        user: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        self.recommend(user).map(|ranked| ranking::top_n(ranked, limit))
    }
}

/// Pearson similarity between two users of `store`
pub fn similarity(store: &RatingStore, first: &str, second: &str) -> Result<f64, RecommendError> {
    RecommenderEngine::new(store).similarity(first, second)
}

/// Ranked recommendations for `user` using every positive neighbor
pub fn recommend(store: &RatingStore, user: &str) -> Result<Vec<Recommendation>, RecommendError> {
    RecommenderEngine::new(store).recommend(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relation;

    #[test]
    fn test_sample_similarities() {
        let store = RatingStore::sample();
        let engine = RecommenderEngine::new(&store);

        assert!(engine.similarity("Alice", "Bob").unwrap() > 0.7);
        assert!(engine.similarity("Alice", "Charlie").unwrap() < -0.7);
    }

    #[test]
    fn test_similarity_unknown_user() {
        let store = RatingStore::sample();
        let engine = RecommenderEngine::new(&store);

        assert_eq!(
            engine.similarity("nonexistent", "Alice"),
            Err(RecommendError::unknown_user("nonexistent"))
        );
        assert_eq!(
            engine.similarity("Alice", "nonexistent"),
            Err(RecommendError::unknown_user("nonexistent"))
        );
    }

    #[test]
    fn test_self_similarity_is_one() {
        let store = RatingStore::sample();
        let engine = RecommenderEngine::new(&store);
        assert_eq!(engine.similarity("Eve", "Eve").unwrap(), 1.0);
    }

    #[test]
    fn test_recommend_avengers_for_alice() {
        let store = RatingStore::sample();
        let recs = recommend(&store, "Alice").unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item, "Avengers");
        assert!((recs[0].score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommend_unknown_user() {
        let store = RatingStore::sample();
        assert_eq!(
            recommend(&store, "nonexistent"),
            Err(RecommendError::unknown_user("nonexistent"))
        );
    }

    #[test]
    fn test_negative_neighbors_contribute_nothing() {
        let store = RatingStore::sample();
        // Eve is the only one who rated Avengers and she disagrees with Charlie
        assert!(similarity(&store, "Charlie", "Eve").unwrap() <= 0.0);
        assert!(recommend(&store, "Charlie").unwrap().is_empty());
    }

    #[test]
    fn test_weighted_mean_of_neighbors() {
        let mut store = RatingStore::new();
        for (user, ratings) in [
            ("me", [1.0, 2.0, 3.0]),
            ("close", [1.0, 2.0, 3.0]),
            ("loose", [1.0, 3.0, 2.0]),
        ] {
            for (item, value) in ["a", "b", "c"].iter().zip(ratings) {
                store.insert(user, *item, value);
            }
        }
        store.insert("close", "new", 5.0);
        store.insert("loose", "new", 1.0);

        let engine = RecommenderEngine::new(&store);
        let close = engine.similarity("me", "close").unwrap();
        let loose = engine.similarity("me", "loose").unwrap();
        assert!((close - 1.0).abs() < 1e-9);
        assert!((loose - 0.5).abs() < 1e-9);

        let recs = engine.recommend("me").unwrap();
        let expected = (5.0 * close + 1.0 * loose) / (close + loose);
        assert_eq!(recs.len(), 1);
        assert!((recs[0].score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_no_novel_items_gives_empty_list() {
        let mut store = RatingStore::new();
        store.insert("a", "x", 1.0);
        store.insert("a", "y", 2.0);
        store.insert("b", "x", 1.0);
        store.insert("b", "y", 2.0);
        assert!(recommend(&store, "a").unwrap().is_empty());
    }

    #[test]
    fn test_user_without_ratings_gets_nothing() {
        let mut store = RatingStore::sample();
        store.add_user("Newcomer");
        assert!(recommend(&store, "Newcomer").unwrap().is_empty());
    }

    #[test]
    fn test_neighborhood_limits_contributors() {
        let mut store = RatingStore::new();
        for user in ["me", "twin", "cousin"] {
            store.insert(user, "a", 1.0);
            store.insert(user, "b", 3.0);
        }
        store.insert("me", "c", 5.0);
        store.insert("twin", "c", 5.0);
        store.insert("cousin", "c", 4.0);
        store.insert("twin", "new", 5.0);
        store.insert("cousin", "new", 1.0);

        let engine = RecommenderEngine::new(&store);
        let all = engine.recommend("me").unwrap();
        assert!(all[0].score < 5.0);

        let nearest = RecommenderEngine::new(&store)
            .with_neighborhood(NonZeroUsize::new(1))
            .recommend("me")
            .unwrap();
        assert_eq!(nearest.len(), 1);
        assert!((nearest[0].score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_rater_is_not_a_neighbor() {
        let mut store = RatingStore::new();
        for (item, value) in [("a", 4.0), ("b", 4.0), ("c", 3.5), ("d", 3.5), ("e", 4.0)] {
            store.insert("me", item, value);
            store.insert("flat", item, 1.1);
        }
        store.insert("flat", "x", 1.0);

        let engine = RecommenderEngine::new(&store);
        assert_eq!(engine.similarity("me", "flat").unwrap(), 0.0);
        assert!(engine.recommend("me").unwrap().is_empty());
    }

    #[test]
    fn test_recommend_top_truncates() {
        let mut store = RatingStore::new();
        for user in ["me", "other"] {
            store.insert(user, "a", 1.0);
            store.insert(user, "b", 4.0);
        }
        store.insert("other", "x", 3.0);
        store.insert("other", "y", 5.0);
        store.insert("other", "z", 4.0);

        let engine = RecommenderEngine::new(&store);
        let top = engine.recommend_top("me", 2).unwrap();
        let items: Vec<&str> = top.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["y", "z"]);
    }

    #[test]
    fn test_neighbors_report() {
        let store = RatingStore::sample();
        let engine = RecommenderEngine::new(&store);
        let neighbors = engine.neighbors("Alice").unwrap();

        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.iter().all(|n| n.user != "Alice"));
        assert!(neighbors
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));

        let charlie = neighbors.iter().find(|n| n.user == "Charlie").unwrap();
        assert_eq!(charlie.relation, Relation::Dissimilar);
        let bob = neighbors.iter().find(|n| n.user == "Bob").unwrap();
        assert_eq!(bob.relation, Relation::Similar);
    }
}
