use indexmap::IndexMap;

use super::{ItemId, Rating};

/// Sparse ratings of one user, keyed by item.
///
/// Iteration follows insertion order. Re-rating an item replaces the value
/// without moving it, so rankings built by walking a vector are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingVector {
    ratings: IndexMap<ItemId, Rating>,
}

impl RatingVector {
    /// Creates an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rating for an item, returning the previous rating if any
    pub fn insert(&mut self, item: ItemId, rating: Rating) -> Option<Rating> {
        debug_assert!(rating.is_finite(), "ratings must be finite");
        self.ratings.insert(item, rating)
    }

    pub fn get(&self, item: &ItemId) -> Option<Rating> {
        self.ratings.get(item).copied()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.ratings.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Iterates `(item, rating)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, Rating)> + '_ {
        self.ratings.iter().map(|(item, rating)| (item, *rating))
    }

    /// Keeps only the items for which `keep` returns true.
    ///
    /// Returns the number of items removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&ItemId, Rating) -> bool,
    {
        let before = self.ratings.len();
        self.ratings.retain(|item, rating| keep(item, *rating));
        before - self.ratings.len()
    }
}

impl FromIterator<(ItemId, Rating)> for RatingVector {
    fn from_iter<I: IntoIterator<Item = (ItemId, Rating)>>(iter: I) -> Self {
        let mut vector = RatingVector::new();
        for (item, rating) in iter {
            vector.insert(item, rating);
        }
        vector
    }
}
