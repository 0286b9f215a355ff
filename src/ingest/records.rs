use csv::StringRecord;
use thiserror::Error;

use crate::models::{ItemId, Rating, UserId};

use super::columns::ResolvedColumns;

/// Why a single row was skipped
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid movie id `{0}`")]
    InvalidItemId(String),

    #[error("invalid rating `{0}`")]
    InvalidRating(String),
}

/// Normalizes a user-supplied movie id to its canonical integer text
/// (`" 0042 "` becomes `"42"`).
pub fn normalize_item_id(raw: &str) -> Result<ItemId, ParseError> {
    raw.trim()
        .parse::<i64>()
        .map(|id| ItemId::from(id.to_string()))
        .map_err(|_| ParseError::InvalidItemId(raw.to_string()))
}

/// Parses a finite rating, ignoring surrounding whitespace
pub fn parse_rating(raw: &str) -> Result<Rating, ParseError> {
    match raw.trim().parse::<Rating>() {
        Ok(rating) if rating.is_finite() => Ok(rating),
        _ => Err(ParseError::InvalidRating(raw.to_string())),
    }
}

fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    name: &'static str,
) -> Result<&'r str, ParseError> {
    record.get(idx).ok_or(ParseError::MissingField(name))
}

/// One row of the requesting user's own ratings
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRating {
    pub item: ItemId,
    pub rating: Rating,
}

impl PersonalRating {
    pub fn parse(raw_item: &str, raw_rating: &str) -> Result<Self, ParseError> {
        Ok(Self {
            item: normalize_item_id(raw_item)?,
            rating: parse_rating(raw_rating)?,
        })
    }

    pub fn from_record(record: &StringRecord, columns: &ResolvedColumns) -> Result<Self, ParseError> {
        Self::parse(
            field(record, columns.item_id, "movie id")?,
            field(record, columns.rating, "rating")?,
        )
    }
}

/// Header positions of the community ratings table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityColumns {
    pub user_id: usize,
    pub item_id: usize,
    pub rating: usize,
}

/// One `(user, item, rating)` row of the community ratings table.
///
/// Ids are kept exactly as written; only the rating is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityRating {
    pub user: UserId,
    pub item: ItemId,
    pub rating: Rating,
}

impl CommunityRating {
    pub fn parse(raw_user: &str, raw_item: &str, raw_rating: &str) -> Result<Self, ParseError> {
        Ok(Self {
            user: UserId::from(raw_user),
            item: ItemId::from(raw_item),
            rating: parse_rating(raw_rating)?,
        })
    }

    pub fn from_record(record: &StringRecord, columns: CommunityColumns) -> Result<Self, ParseError> {
        Self::parse(
            field(record, columns.user_id, "userId")?,
            field(record, columns.item_id, "movieId")?,
            field(record, columns.rating, "rating")?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_item_id() {
        assert_eq!(normalize_item_id(" 0042 ").unwrap(), ItemId::from("42"));
        assert_eq!(normalize_item_id("+7").unwrap(), ItemId::from("7"));
        assert_eq!(
            normalize_item_id("4.0"),
            Err(ParseError::InvalidItemId("4.0".to_string()))
        );
        assert!(normalize_item_id("").is_err());
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating(" 4.5 ").unwrap(), 4.5);
        assert_eq!(parse_rating("3").unwrap(), 3.0);
        assert!(parse_rating("great").is_err());
        assert!(parse_rating("NaN").is_err());
        assert!(parse_rating("inf").is_err());
    }

    #[test]
    fn test_personal_rating_from_record() {
        let record = StringRecord::from(vec!["Heat", "6", "4.0"]);
        let columns = ResolvedColumns { item_id: 1, rating: 2 };

        let parsed = PersonalRating::from_record(&record, &columns).unwrap();
        assert_eq!(parsed.item, ItemId::from("6"));
        assert_eq!(parsed.rating, 4.0);
    }

    #[test]
    fn test_personal_rating_short_row() {
        let record = StringRecord::from(vec!["6"]);
        let columns = ResolvedColumns { item_id: 0, rating: 1 };

        assert_eq!(
            PersonalRating::from_record(&record, &columns),
            Err(ParseError::MissingField("rating"))
        );
    }

    #[test]
    fn test_community_rating_keeps_raw_ids() {
        let record = StringRecord::from(vec!["12", "0031", "2.5", "1260759144"]);
        let columns = CommunityColumns {
            user_id: 0,
            item_id: 1,
            rating: 2,
        };

        let parsed = CommunityRating::from_record(&record, columns).unwrap();
        assert_eq!(parsed.user, UserId::from("12"));
        assert_eq!(parsed.item, ItemId::from("0031"));
        assert_eq!(parsed.rating, 2.5);
    }

    #[test]
    fn test_community_rating_non_numeric() {
        let record = StringRecord::from(vec!["12", "31", "n/a"]);
        let columns = CommunityColumns {
            user_id: 0,
            item_id: 1,
            rating: 2,
        };

        assert_eq!(
            CommunityRating::from_record(&record, columns),
            Err(ParseError::InvalidRating("n/a".to_string()))
        );
    }
}
