use std::collections::HashMap;

use thiserror::Error;

/// Accepted spellings of the movie id column, compared case-insensitively
pub const ITEM_ID_CANDIDATES: [&str; 2] = ["movieid", "movie_id"];

/// Accepted spellings of the rating column, compared case-insensitively
pub const RATING_CANDIDATES: [&str; 1] = ["rating"];

/// Header positions of the two columns a personal ratings table needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub item_id: usize,
    pub rating: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnResolutionError {
    #[error("Could not find a movie id column (accepted: movieId, movie_id). Found headers: {found:?}")]
    MissingItemId { found: Vec<String> },

    #[error("Could not find a rating column (accepted: rating). Found headers: {found:?}")]
    MissingRating { found: Vec<String> },
}

/// Finds the movie id and rating columns among `headers`.
///
/// Matching ignores case. When two headers differ only in case, the later one
/// wins.
pub fn resolve_columns<'a, I>(headers: I) -> Result<ResolvedColumns, ColumnResolutionError>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    let lowered: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (header.to_lowercase(), idx))
        .collect();

    let find = |candidates: &[&str]| candidates.iter().find_map(|c| lowered.get(*c).copied());
    let found = || -> Vec<String> {
        headers.iter().map(|h| h.to_string()).collect()
    };

    let item_id = find(&ITEM_ID_CANDIDATES[..])
        .ok_or_else(|| ColumnResolutionError::MissingItemId { found: found() })?;
    let rating = find(&RATING_CANDIDATES[..])
        .ok_or_else(|| ColumnResolutionError::MissingRating { found: found() })?;

    Ok(ResolvedColumns { item_id, rating })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_movielens_headers() {
        let cols = resolve_columns(["userId", "movieId", "rating", "timestamp"]).unwrap();
        assert_eq!(cols, ResolvedColumns { item_id: 1, rating: 2 });
    }

    #[test]
    fn test_resolves_case_insensitive_snake_case() {
        let cols = resolve_columns(["Rating", "MOVIE_ID"]).unwrap();
        assert_eq!(cols, ResolvedColumns { item_id: 1, rating: 0 });
    }

    #[test]
    fn test_prefers_movieid_over_movie_id() {
        let cols = resolve_columns(["movie_id", "movieid", "rating"]).unwrap();
        assert_eq!(cols.item_id, 1);
    }

    #[test]
    fn test_later_duplicate_header_wins() {
        let cols = resolve_columns(["movieId", "MovieID", "rating"]).unwrap();
        assert_eq!(cols.item_id, 1);
    }

    #[test]
    fn test_missing_item_id_column() {
        let err = resolve_columns(["title", "rating"]).unwrap_err();
        assert_eq!(
            err,
            ColumnResolutionError::MissingItemId {
                found: vec!["title".to_string(), "rating".to_string()]
            }
        );
    }

    #[test]
    fn test_missing_rating_column() {
        let err = resolve_columns(["movieId", "stars"]).unwrap_err();
        assert!(matches!(err, ColumnResolutionError::MissingRating { .. }));
    }

    #[test]
    fn test_empty_headers() {
        let err = resolve_columns(std::iter::empty()).unwrap_err();
        assert_eq!(err, ColumnResolutionError::MissingItemId { found: vec![] });
    }
}
