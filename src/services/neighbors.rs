use crate::models::{RatingStore, RatingVector, SimilarityResult};

use super::similarity::cosine_similarity;

/// Sorts by descending score. The sort is stable: equal scores keep their
/// incoming order.
pub(crate) fn rank_by_score<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

/// Returns the `k` users most similar to `target`, best first.
///
/// Every user in the store is scored; ties keep store order.
pub fn top_similar_users(
    target: &RatingVector,
    store: &RatingStore,
    k: usize,
) -> Vec<SimilarityResult> {
    if k == 0 {
        return Vec::new();
    }

    let mut similarities: Vec<SimilarityResult> = store
        .iter()
        .map(|(user, ratings)| SimilarityResult {
            user: user.clone(),
            score: cosine_similarity(target, ratings),
        })
        .collect();

    rank_by_score(&mut similarities, |s| s.score);
    similarities.truncate(k);
    similarities
}
