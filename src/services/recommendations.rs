use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, ItemId, RatingStore, RatingVector, Recommendation, ScoredItem, SimilarityResult},
};

use super::neighbors::{rank_by_score, top_similar_users};

/// Neighborhood and list sizes used when a caller does not pick its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDefaults {
    pub top_users: usize,
    pub top_items: usize,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            top_users: 5,
            top_items: 10,
        }
    }
}

/// Scores every item the target has not rated, best first.
///
/// Each neighbor adds `similarity * rating` for every item in its full vector.
/// Scores are raw weighted sums and are not normalized by total similarity.
/// Ties keep the order in which items were first reached.
pub fn score_items(
    target: &RatingVector,
    store: &RatingStore,
    neighbors: &[SimilarityResult],
) -> Vec<ScoredItem> {
    let mut totals: IndexMap<&ItemId, f64> = IndexMap::new();

    for neighbor in neighbors {
        let Some(ratings) = store.get(&neighbor.user) else {
            continue;
        };

        for (item, rating) in ratings.iter() {
            if target.contains(item) {
                continue;
            }
            *totals.entry(item).or_insert(0.0) += neighbor.score * rating;
        }
    }

    let mut scores: Vec<ScoredItem> = totals
        .into_iter()
        .map(|(item, score)| ScoredItem {
            item: item.clone(),
            score,
        })
        .collect();
    rank_by_score(&mut scores, |s| s.score);
    scores
}

/// Recommends up to `top_items` titles for `target` from its `top_users`
/// nearest neighbors.
///
/// Every item in the store must be in the catalog; a missing title is
/// reported as [`AppError::UnknownItem`].
pub fn recommend(
    target: &RatingVector,
    store: &RatingStore,
    catalog: &Catalog,
    top_users: usize,
    top_items: usize,
) -> AppResult<Vec<Recommendation>> {
    let neighbors = top_similar_users(target, store, top_users);
    tracing::debug!(
        neighbors = neighbors.len(),
        best_similarity = neighbors.first().map(|n| n.score),
        "Selected neighborhood"
    );

    let mut ranked = score_items(target, store, &neighbors);
    ranked.truncate(top_items);

    ranked
        .into_iter()
        .map(|scored| {
            let title = catalog
                .title(&scored.item)
                .ok_or_else(|| AppError::UnknownItem(scored.item.clone()))?
                .to_string();
            Ok(Recommendation {
                item: scored.item,
                title,
                score: scored.score,
            })
        })
        .collect()
}

/// Recommender bound to one loaded community and catalog
pub struct Recommender<'a> {
    store: &'a RatingStore,
    catalog: &'a Catalog,
    defaults: EngineDefaults,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over the given store and catalog
    pub fn new(store: &'a RatingStore, catalog: &'a Catalog, defaults: EngineDefaults) -> Self {
        Self {
            store,
            catalog,
            defaults,
        }
    }

    /// Recommends with the configured neighborhood and list sizes
    pub fn recommend(&self, target: &RatingVector) -> AppResult<Vec<Recommendation>> {
        self.recommend_with(target, self.defaults.top_users, self.defaults.top_items)
    }

    pub fn recommend_with(
        &self,
        target: &RatingVector,
        top_users: usize,
        top_items: usize,
    ) -> AppResult<Vec<Recommendation>> {
        recommend(target, self.store, self.catalog, top_users, top_items)
    }
}
