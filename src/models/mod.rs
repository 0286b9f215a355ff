use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt::Display};

pub mod catalog;
pub mod rating_store;
pub mod rating_vector;

pub use catalog::Catalog;
pub use rating_store::RatingStore;
pub use rating_vector::RatingVector;

/// A single explicit rating. Bounds are a dataset convention, not enforced here.
pub type Rating = f64;

/// Identifier for a catalog item (a MovieLens `movieId`, kept as text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier for a community user (a MovieLens `userId`, kept as text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

macro_rules! text_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

text_id!(ItemId);
text_id!(UserId);

/// Similarity of one candidate user to the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub user: UserId,
    pub score: f64,
}

/// An unrated item with its similarity-weighted aggregate score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    pub item: ItemId,
    pub score: f64,
}

/// A scored item resolved to its display title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: ItemId,
    pub title: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_item_id_display() {
        let id = ItemId::from("318");
        assert_eq!(format!("{}", id), "318");
        assert_eq!(id.as_str(), "318");
    }

    #[test]
    fn test_item_id_serde_is_transparent() {
        let id = ItemId::from("2571");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""2571""#);

        let deserialized: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_ids_are_borrowable_as_str() {
        let mut by_user: HashMap<UserId, u32> = HashMap::new();
        by_user.insert(UserId::from("7"), 3);
        assert_eq!(by_user.get("7"), Some(&3));
    }
}
