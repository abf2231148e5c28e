use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RecommendError;
use crate::models::Rating;

/// One user's ratings keyed by item identifier
pub type UserRatings = BTreeMap<String, f64>;

/// The full known rating universe: user -> item -> rating value
///
/// Ordered maps keep iteration lexicographic, so anything computed from the
/// store (sums, tie-breaks) comes out the same on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingStore {
    ratings: BTreeMap<String, UserRatings>,
}

impl RatingStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user without any ratings
    pub fn add_user(&mut self, user: impl Into<String>) {
        self.ratings.entry(user.into()).or_default();
    }

    /// Records a rating, replacing any earlier rating of the same item
    pub fn insert(&mut self, user: impl Into<String>, item: impl Into<String>, value: f64) {
        self.ratings
            .entry(user.into())
            .or_default()
            .insert(item.into(), value);
    }

    /// Returns the ratings of a registered user
    pub fn ratings_for(&self, user: &str) -> Result<&UserRatings, RecommendError> {
        self.ratings
            .get(user)
            .ok_or_else(|| RecommendError::unknown_user(user))
    }

    /// Iterates over user identifiers in lexicographic order
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.ratings.keys().map(String::as_str)
    }

    pub fn user_count(&self) -> usize {
        self.ratings.len()
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.values().map(BTreeMap::len).sum()
    }

    /// The five-user movie dataset the recommender was first demonstrated with
    pub fn sample() -> Self {
        let rows: [(&str, &[(&str, f64)]); 5] = [
            (
                "Alice",
                &[
                    ("Star Wars", 5.0),
                    ("Harry Potter", 3.0),
                    ("Lord of the Rings", 4.0),
                    ("Frozen", 1.0),
                    ("Inception", 5.0),
                ],
            ),
            (
                "Bob",
                &[
                    ("Star Wars", 4.0),
                    ("Harry Potter", 2.0),
                    ("Lord of the Rings", 5.0),
                    ("Frozen", 1.0),
                    ("Inception", 4.0),
                ],
            ),
            (
                "Charlie",
                &[
                    ("Star Wars", 1.0),
                    ("Harry Potter", 5.0),
                    ("Lord of the Rings", 1.0),
                    ("Frozen", 5.0),
                    ("Inception", 2.0),
                ],
            ),
            (
                "David",
                &[
                    ("Star Wars", 2.0),
                    ("Harry Potter", 5.0),
                    ("Lord of the Rings", 2.0),
                    ("Frozen", 4.0),
                    ("Inception", 3.0),
                ],
            ),
            (
                "Eve",
                &[
                    ("Star Wars", 5.0),
                    ("Harry Potter", 1.0),
                    ("Lord of the Rings", 4.0),
                    ("Inception", 4.0),
                    ("Avengers", 5.0),
                ],
            ),
        ];

        let mut store = Self::new();
        for (user, items) in rows {
            for (item, value) in items {
                store.insert(user, *item, *value);
            }
        }
        store
    }
}

impl FromIterator<Rating> for RatingStore {
    fn from_iter<I: IntoIterator<Item = Rating>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl Extend<Rating> for RatingStore {
    fn extend<I: IntoIterator<Item = Rating>>(&mut self, iter: I) {
        for rating in iter {
            self.insert(rating.user, rating.item, rating.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user() {
        let store = RatingStore::new();
        let result = store.ratings_for("Alice");
        assert_eq!(result, Err(RecommendError::unknown_user("Alice")));
    }

    #[test]
    fn test_registered_user_without_ratings() {
        let mut store = RatingStore::new();
        store.add_user("Zoe");
        assert!(store.ratings_for("Zoe").unwrap().is_empty());
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_insert_replaces_existing_rating() {
        let mut store = RatingStore::new();
        store.insert("Alice", "Frozen", 1.0);
        store.insert("Alice", "Frozen", 2.5);
        let ratings = store.ratings_for("Alice").unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings["Frozen"], 2.5);
    }

    #[test]
    fn test_add_user_keeps_existing_ratings() {
        let mut store = RatingStore::new();
        store.insert("Alice", "Frozen", 1.0);
        store.add_user("Alice");
        assert_eq!(store.rating_count(), 1);
    }

    #[test]
    fn test_users_are_ordered() {
        let store: RatingStore = vec![
            Rating::new("Eve", "Avengers", 5.0),
            Rating::new("Alice", "Frozen", 1.0),
            Rating::new("Charlie", "Frozen", 5.0),
        ]
        .into_iter()
        .collect();
        let users: Vec<&str> = store.users().collect();
        assert_eq!(users, vec!["Alice", "Charlie", "Eve"]);
    }

    #[test]
    fn test_sample_dataset() {
        let store = RatingStore::sample();
        assert_eq!(store.user_count(), 5);
        assert_eq!(store.rating_count(), 25);
        assert_eq!(store.ratings_for("Eve").unwrap()["Avengers"], 5.0);
        assert!(!store.ratings_for("Alice").unwrap().contains_key("Avengers"));
    }
}
