use std::collections::HashSet;

use indexmap::IndexMap;

use super::{ItemId, Rating, RatingVector, UserId};

/// Community ratings, one vector per user.
///
/// Users iterate in the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    users: IndexMap<UserId, RatingVector>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one `(user, item, rating)` triple
    pub fn add_rating(&mut self, user: UserId, item: ItemId, rating: Rating) {
        self.users.entry(user).or_default().insert(item, rating);
    }

    /// Replaces a user's whole vector, keeping the user's original position
    pub fn insert(&mut self, user: UserId, ratings: RatingVector) {
        self.users.insert(user, ratings);
    }

    pub fn get(&self, user: &UserId) -> Option<&RatingVector> {
        self.users.get(user)
    }

    /// Iterates users in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &RatingVector)> + '_ {
        self.users.iter()
    }

    /// Iterates every `(user, item, rating)` triple, user by user
    pub fn ratings(&self) -> impl Iterator<Item = (&UserId, &ItemId, Rating)> + '_ {
        self.users.iter().flat_map(|(user, ratings)| {
            ratings
                .iter()
                .map(move |(item, rating)| (user, item, rating))
        })
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Total ratings across all users
    pub fn rating_count(&self) -> usize {
        self.users.values().map(RatingVector::len).sum()
    }

    /// Number of distinct items rated by anyone
    pub fn distinct_items(&self) -> usize {
        self.users
            .values()
            .flat_map(|ratings| ratings.iter().map(|(item, _)| item))
            .collect::<HashSet<_>>()
            .len()
    }
}

impl FromIterator<(UserId, RatingVector)> for RatingStore {
    fn from_iter<I: IntoIterator<Item = (UserId, RatingVector)>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}
