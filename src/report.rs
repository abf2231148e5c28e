use std::fmt::Write;

use crate::models::{Recommendation, SimilarityScore};

const STAR: char = '★';

/// One star per rating point, rounded
fn stars(score: f64) -> String {
    let count = score.round().max(0.0) as usize;
    std::iter::repeat(STAR).take(count).collect()
}

/// Human-readable recommendation report for the terminal
pub fn render(
    user: &str,
    recommendations: &[Recommendation],
    neighbors: &[SimilarityScore],
) -> String {
    if recommendations.is_empty() {
        return format!("No recommendations available for {}.\n", user);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Top Recommendations for {}:\n", user);
    for rec in recommendations {
        let _ = writeln!(
            out,
            "{} {} (score: {:.2}) {}",
            STAR,
            rec.item,
            rec.score,
            stars(rec.score)
        );
    }

    let _ = writeln!(out, "\nSimilarity Analysis:\n-------------------");
    for neighbor in neighbors {
        let _ = writeln!(
            out,
            "- {} is {} to you (score: {:.2})",
            neighbor.user,
            neighbor.relation.as_str(),
            neighbor.similarity
        );
    }

    out
}

/// Similarity table as printed by the `neighbors` command
pub fn render_neighbors(user: &str, neighbors: &[SimilarityScore]) -> String {
    let mut out = format!("User similarity with {}:\n", user);
    for neighbor in neighbors {
        let _ = writeln!(
            out,
            "  {:<16} {:>6.2}  {}",
            neighbor.user,
            neighbor.similarity,
            neighbor.relation.as_str()
        );
    }
    out
}
