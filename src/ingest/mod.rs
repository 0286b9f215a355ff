//! Ingestion of the MovieLens tables and the requesting user's own ratings.
//!
//! Malformed rows are skipped and only counted. Missing files or required
//! columns abort the load.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, ItemId, RatingStore, RatingVector},
};

pub mod columns;
pub mod records;

pub use columns::{resolve_columns, ColumnResolutionError, ResolvedColumns};
pub use records::{normalize_item_id, parse_rating, CommunityRating, ParseError, PersonalRating};

use records::CommunityColumns;

/// Where the community dataset lives and how much of it to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub movies_path: PathBuf,
    pub ratings_path: PathBuf,
    /// Maximum number of ratings rows read, malformed rows included.
    /// `None` reads the whole table.
    pub sample_limit: Option<usize>,
}

/// Row counts from one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows read
    pub seen: usize,
    /// Rows that failed to parse
    pub skipped: usize,
    /// Parsed rows whose movie is not in the catalog
    pub dropped_unknown: usize,
}

/// The requesting user's ratings, filtered to the catalog
#[derive(Debug, Clone)]
pub struct PersonalRatings {
    pub ratings: RatingVector,
    pub report: IngestReport,
}

/// Catalog and community ratings, loaded once per run
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: Catalog,
    pub store: RatingStore,
    pub ratings_report: IngestReport,
}

/// Headline numbers for a loaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub movies: usize,
    pub users: usize,
    pub ratings: usize,
    pub rated_movies: usize,
}

impl Dataset {
    /// Loads the catalog and the (sampled) ratings table from disk
    pub fn load(config: &IngestConfig) -> AppResult<Self> {
        let movies = open_input(&config.movies_path)?;
        let ratings = open_input(&config.ratings_path)?;
        Self::from_readers(movies, ratings, config.sample_limit)
    }

    pub fn from_readers<M: Read, R: Read>(
        movies: M,
        ratings: R,
        sample_limit: Option<usize>,
    ) -> AppResult<Self> {
        let catalog = load_catalog(movies)?;
        let (store, ratings_report) = load_ratings(ratings, &catalog, sample_limit)?;
        Ok(Self {
            catalog,
            store,
            ratings_report,
        })
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            movies: self.catalog.len(),
            users: self.store.len(),
            ratings: self.store.rating_count(),
            rated_movies: self.store.distinct_items(),
        }
    }
}

fn open_input(path: &Path) -> AppResult<File> {
    if !path.exists() {
        return Err(AppError::MissingInput(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

fn header_index(
    headers: &StringRecord,
    table: &'static str,
    column: &'static str,
) -> AppResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or(AppError::MissingColumn { table, column })
}

/// Reads the next record, treating anything but an I/O failure as a bad row
fn next_row(result: csv::Result<StringRecord>) -> AppResult<Option<StringRecord>> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(err) if err.is_io_error() => Err(err.into()),
        Err(_) => Ok(None),
    }
}

/// Reads a `movieId,title,...` table into a catalog
pub fn load_catalog<R: Read>(reader: R) -> AppResult<Catalog> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let id_col = header_index(&headers, "movies", "movieId")?;
    let title_col = header_index(&headers, "movies", "title")?;

    let mut catalog = Catalog::new();
    let mut skipped = 0;
    for result in csv_reader.records() {
        let fields = next_row(result)?.and_then(|record| {
            let id = record.get(id_col)?.to_string();
            let title = record.get(title_col)?.to_string();
            Some((id, title))
        });
        match fields {
            Some((id, title)) => catalog.insert(ItemId::from(id), title),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Skipped malformed movie rows");
    }
    tracing::info!(movies = catalog.len(), "Loaded movie catalog");
    Ok(catalog)
}

/// Reads a `userId,movieId,rating,...` table into per-user vectors.
///
/// At most `sample_limit` data rows are read. Ratings for movies missing from
/// `catalog` are dropped so every stored item has a title.
pub fn load_ratings<R: Read>(
    reader: R,
    catalog: &Catalog,
    sample_limit: Option<usize>,
) -> AppResult<(RatingStore, IngestReport)> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = CommunityColumns {
        user_id: header_index(&headers, "ratings", "userId")?,
        item_id: header_index(&headers, "ratings", "movieId")?,
        rating: header_index(&headers, "ratings", "rating")?,
    };

    let mut store = RatingStore::new();
    let mut report = IngestReport::default();
    for result in csv_reader.records() {
        if sample_limit.is_some_and(|limit| report.seen >= limit) {
            break;
        }
        report.seen += 1;

        let Some(record) = next_row(result)? else {
            report.skipped += 1;
            continue;
        };
        let row = match CommunityRating::from_record(&record, columns) {
            Ok(row) => row,
            Err(_) => {
                report.skipped += 1;
                continue;
            }
        };
        if !catalog.contains(&row.item) {
            report.dropped_unknown += 1;
            continue;
        }
        store.add_rating(row.user, row.item, row.rating);
    }

    if report.skipped > 0 || report.dropped_unknown > 0 {
        tracing::warn!(
            skipped = report.skipped,
            dropped_unknown = report.dropped_unknown,
            "Some community ratings were not loaded"
        );
    }
    tracing::info!(
        rows = report.seen,
        users = store.len(),
        ratings = store.rating_count(),
        sample_limit = ?sample_limit,
        "Loaded community ratings"
    );
    Ok((store, report))
}

/// Removes items the catalog does not know, returning how many were removed
pub fn filter_to_catalog(ratings: &mut RatingVector, catalog: &Catalog) -> usize {
    ratings.retain(|item, _| catalog.contains(item))
}

/// Reads the requesting user's ratings table.
///
/// Column names are resolved with [`resolve_columns`]. Unparsable rows are
/// skipped, a repeated movie keeps its last rating, and movies missing from
/// `catalog` are dropped.
pub fn load_personal_ratings<R: Read>(reader: R, catalog: &Catalog) -> AppResult<PersonalRatings> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = resolve_columns(headers.iter())?;

    let mut ratings = RatingVector::new();
    let mut report = IngestReport::default();
    for result in csv_reader.records() {
        report.seen += 1;
        let parsed = next_row(result)?
            .map(|record| PersonalRating::from_record(&record, &columns));
        match parsed {
            Some(Ok(row)) => {
                ratings.insert(row.item, row.rating);
            }
            Some(Err(err)) => {
                tracing::debug!(row = report.seen, error = %err, "Skipping personal rating row");
                report.skipped += 1;
            }
            None => report.skipped += 1,
        }
    }

    report.dropped_unknown = filter_to_catalog(&mut ratings, catalog);
    if report.dropped_unknown > 0 {
        tracing::warn!(
            dropped = report.dropped_unknown,
            "Rated movies not found in the catalog will be ignored"
        );
    }
    tracing::info!(
        movies = ratings.len(),
        skipped = report.skipped,
        seen = report.seen,
        "Loaded personal ratings"
    );

    Ok(PersonalRatings { ratings, report })
}

/// Opens and reads a personal ratings file
pub fn load_personal_ratings_file(path: &Path, catalog: &Catalog) -> AppResult<PersonalRatings> {
    load_personal_ratings(open_input(path)?, catalog)
}
