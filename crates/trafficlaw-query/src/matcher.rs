//! Cosine scoring over index candidates.

use trafficlaw_store::CatalogIndex;

/// Cosine similarity between two vectors.
///
/// Zero-norm input scores 0.0 rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Best-scoring candidate at or above `threshold`, with its score.
///
/// Replacement is strictly greater-than, so ties keep the earliest
/// candidate and repeat runs give the same answer.
pub fn find_best(
    query: &[f32],
    candidates: &[usize],
    index: &CatalogIndex,
    threshold: f32,
) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for &i in candidates {
        let score = cosine_similarity(query, index.embedding(i));
        let better = match best {
            None => true,
            Some((_, best_score)) => score > best_score,
        };
        if better {
            best = Some((i, score));
        }
    }
    best.filter(|(_, score)| *score >= threshold)
}
