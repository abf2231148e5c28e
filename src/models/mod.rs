use serde::{Deserialize, Serialize};

/// A single user-item rating as read from a source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user: String,
    pub item: String,
    pub value: f64,
}

impl Rating {
    pub fn new(user: impl Into<String>, item: impl Into<String>, value: f64) -> Self {
        Self {
            user: user.into(),
            item: item.into(),
            value,
        }
    }
}

/// An item the query user has not rated, with its similarity-weighted score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item: String,
    pub score: f64,
}

impl Recommendation {
    pub fn new(item: impl Into<String>, score: f64) -> Self {
        Self {
            item: item.into(),
            score,
        }
    }
}

/// Whether another user agrees with the query user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Similar,
    Dissimilar,
}

impl Relation {
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity > 0.0 {
            Relation::Similar
        } else {
            Relation::Dissimilar
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Similar => "similar",
            Relation::Dissimilar => "dissimilar",
        }
    }
}

/// Similarity between the query user and another user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityScore {
    pub user: String,
    pub similarity: f64,
    pub relation: Relation,
}

impl SimilarityScore {
    pub fn new(user: impl Into<String>, similarity: f64) -> Self {
        Self {
            user: user.into(),
            similarity,
            relation: Relation::from_similarity(similarity),
        }
    }
}
