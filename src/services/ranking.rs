use std::cmp::Ordering;

use crate::models::{Recommendation, SimilarityScore};

/// Higher value first, then identifier ascending
fn by_value_then_id(a_value: f64, a_id: &str, b_value: f64, b_id: &str) -> Ordering {
    b_value.total_cmp(&a_value).then_with(|| a_id.cmp(b_id))
}

/// Sorts recommendations by score descending; equal scores by item id
pub fn rank_recommendations(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| by_value_then_id(a.score, &a.item, b.score, &b.item));
}

/// Sorts neighbors by similarity descending; equal similarities by user id
pub fn rank_neighbors(scores: &mut [SimilarityScore]) {
    scores.sort_by(|a, b| by_value_then_id(a.similarity, &a.user, b.similarity, &b.user));
}

/// Keeps at most `limit` entries of an already ranked list
pub fn top_n<T>(mut ranked: Vec<T>, limit: usize) -> Vec<T> {
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendations_descending() {
        let mut recs = vec![
            Recommendation::new("a", 2.0),
            Recommendation::new("b", 4.5),
            Recommendation::new("c", 3.0),
        ];
        rank_recommendations(&mut recs);
        let items: Vec<&str> = recs.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_broken_by_item() {
        let mut recs = vec![
            Recommendation::new("Zodiac", 4.0),
            Recommendation::new("Alien", 4.0),
            Recommendation::new("Memento", 5.0),
        ];
        rank_recommendations(&mut recs);
        let items: Vec<&str> = recs.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Memento", "Alien", "Zodiac"]);
    }

    #[test]
    fn test_neighbors_descending() {
        let mut scores = vec![
            SimilarityScore::new("Charlie", -0.9),
            SimilarityScore::new("Bob", 0.8),
            SimilarityScore::new("Eve", 0.8),
            SimilarityScore::new("David", 0.0),
        ];
        rank_neighbors(&mut scores);
        let users: Vec<&str> = scores.iter().map(|s| s.user.as_str()).collect();
        assert_eq!(users, vec!["Bob", "Eve", "David", "Charlie"]);
    }

    #[test]
    fn test_top_n() {
        assert_eq!(top_n(vec![1, 2, 3], 2), vec![1, 2]);
        assert_eq!(top_n(vec![1, 2, 3], 10), vec![1, 2, 3]);
        assert!(top_n(vec![1, 2, 3], 0).is_empty());
    }
}
