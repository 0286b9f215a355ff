use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    ingest::{load_personal_ratings_file, Dataset, IngestConfig, PersonalRatings},
    models::Recommendation,
    services::{
        report::{render_table, save_recommendations},
        Recommender,
    },
};

/// Movie recommendations from users with similar taste
#[derive(Debug, Parser)]
#[command(name = "cinematch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recommend movies for a personal ratings CSV
    Recommend(RecommendArgs),
    /// Serve recommendations over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Default, Args)]
pub struct RecommendArgs {
    /// Personal ratings CSV; prompted for when omitted
    #[arg(long)]
    pub ratings: Option<PathBuf>,
    /// Number of similar users to draw from
    #[arg(long)]
    pub top_users: Option<usize>,
    /// Number of movies to recommend
    #[arg(long)]
    pub top_items: Option<usize>,
    /// Output CSV path
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Print only, do not write the CSV
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
}

impl RecommendArgs {
    /// Overrides env-derived settings with explicit flags
    pub fn apply(&self, config: &mut Config) {
        if let Some(top_users) = self.top_users {
            config.top_users = top_users;
        }
        if let Some(top_items) = self.top_items {
            config.top_items = top_items;
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
    }
}

impl ServeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

/// Loads the dataset on the blocking pool
pub async fn load_dataset(ingest: IngestConfig) -> AppResult<Dataset> {
    tokio::task::spawn_blocking(move || Dataset::load(&ingest))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

const MOVIE_EXAMPLES: usize = 5;
const RATING_EXAMPLES: usize = 10;

/// Dataset summary shown before prompting, with the first few movies and
/// rating rows as a sanity check
pub fn dataset_summary(dataset: &Dataset) -> String {
    let stats = dataset.stats();
    let report = dataset.ratings_report;

    let mut lines = vec![format!(
        "Loaded {} movies. Example (first {}):",
        stats.movies, MOVIE_EXAMPLES
    )];
    lines.extend(
        dataset
            .catalog
            .iter()
            .take(MOVIE_EXAMPLES)
            .map(|(item, title)| format!("  {} -> {}", item, title)),
    );
    lines.push(format!(
        "Loaded {} ratings (skipped {} malformed and {} unknown-movie rows out of {}). Example rows (first {}):",
        stats.ratings, report.skipped, report.dropped_unknown, report.seen, RATING_EXAMPLES
    ));
    lines.extend(
        dataset
            .store
            .ratings()
            .take(RATING_EXAMPLES)
            .map(|(user, item, rating)| format!("  user {}, movie {}, rating {:?}", user, item, rating)),
    );
    lines.push(format!("Unique users in loaded sample: {}", stats.users));
    lines.push(format!("Unique movies in loaded sample: {}", stats.rated_movies));
    lines.join("\n")
}

pub fn print_dataset_summary(dataset: &Dataset) {
    println!("{}", dataset_summary(dataset));
}

/// Warning for rated movies the catalog does not know, out of all parsed ones
fn unknown_items_warning(personal: &PersonalRatings) -> Option<String> {
    let dropped = personal.report.dropped_unknown;
    (dropped > 0).then(|| {
        format!(
            "Warning: {} of your {} rated movie IDs were not found in the movies catalog and will be ignored.",
            dropped,
            personal.ratings.len() + dropped
        )
    })
}

/// Asks for the personal ratings path on `output` and reads it from `input`.
///
/// Surrounding whitespace and quotes (as left by drag-and-drop) are removed.
pub fn prompt_for_path<R: BufRead, W: Write>(mut input: R, mut output: W) -> AppResult<PathBuf> {
    write!(output, "Enter the path to your personal ratings CSV: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let path = line.trim().trim_matches('"');
    if path.is_empty() {
        return Err(AppError::InvalidInput(
            "no personal ratings path given".to_string(),
        ));
    }
    Ok(PathBuf::from(path))
}

/// Runs one recommendation pass for a personal ratings file and reports it
pub fn run_recommend(
    config: &Config,
    args: &RecommendArgs,
    dataset: &Dataset,
) -> AppResult<Vec<Recommendation>> {
    let path = match &args.ratings {
        Some(path) => path.clone(),
        None => {
            let stdin = std::io::stdin();
            prompt_for_path(stdin.lock(), std::io::stdout())?
        }
    };

    let personal = load_personal_ratings_file(&path, &dataset.catalog)?;
    if let Some(warning) = unknown_items_warning(&personal) {
        println!("{}", warning);
    }
    println!(
        "Loaded personal ratings: {} items (skipped {} malformed rows out of {}).",
        personal.ratings.len(),
        personal.report.skipped,
        personal.report.seen
    );

    let recommender = Recommender::new(&dataset.store, &dataset.catalog, config.engine_defaults());
    let recommendations = recommender.recommend(&personal.ratings)?;

    println!("\nTop movie recommendations for you:");
    print!("{}", render_table(&recommendations));

    if !args.no_save {
        save_recommendations(&recommendations, &config.output_file)?;
        println!("\nRecommendations saved to {}", config.output_file.display());
    }

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        ingest::IngestReport,
        models::{ItemId, RatingVector},
    };

    #[test]
    fn test_dataset_summary_shows_first_rows() {
        let movies = "movieId,title\n\
            1,Toy Story (1995)\n\
            2,Jumanji (1995)\n\
            3,Grumpier Old Men (1995)\n\
            4,Waiting to Exhale (1995)\n\
            5,Father of the Bride Part II (1995)\n\
            6,Heat (1995)\n";
        let ratings = "userId,movieId,rating\n1,1,4.0\n1,6,3.5\n2,9,5.0\n";
        let dataset = Dataset::from_readers(movies.as_bytes(), ratings.as_bytes(), None).unwrap();

        let summary = dataset_summary(&dataset);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "Loaded 6 movies. Example (first 5):");
        assert_eq!(lines[1], "  1 -> Toy Story (1995)");
        assert_eq!(lines[5], "  5 -> Father of the Bride Part II (1995)");
        assert!(!summary.contains("Heat (1995)"));
        assert_eq!(
            lines[6],
            "Loaded 2 ratings (skipped 0 malformed and 1 unknown-movie rows out of 3). Example rows (first 10):"
        );
        assert_eq!(lines[7], "  user 1, movie 1, rating 4.0");
        assert_eq!(lines[8], "  user 1, movie 6, rating 3.5");
        assert_eq!(lines[9], "Unique users in loaded sample: 1");
        assert_eq!(lines[10], "Unique movies in loaded sample: 2");
    }

    #[test]
    fn test_unknown_items_warning_counts_all_rated() {
        let personal = PersonalRatings {
            ratings: [(ItemId::from("1"), 5.0), (ItemId::from("2"), 3.0)]
                .into_iter()
                .collect::<RatingVector>(),
            report: IngestReport {
                seen: 3,
                skipped: 0,
                dropped_unknown: 1,
            },
        };

        let warning = unknown_items_warning(&personal).unwrap();
        assert!(warning.starts_with("Warning: 1 of your 3 rated movie IDs"));

        let clean = PersonalRatings {
            report: IngestReport::default(),
            ..personal
        };
        assert_eq!(unknown_items_warning(&clean), None);
    }

    #[test]
    fn test_prompt_strips_quotes_and_whitespace() {
        let mut shown = Vec::new();
        let path = prompt_for_path("  \"/home/me/my ratings.csv\"\n".as_bytes(), &mut shown).unwrap();

        assert_eq!(path, PathBuf::from("/home/me/my ratings.csv"));
        assert_eq!(
            String::from_utf8(shown).unwrap(),
            "Enter the path to your personal ratings CSV: "
        );
    }

    #[test]
    fn test_prompt_rejects_empty_input() {
        let err = prompt_for_path("\n".as_bytes(), Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_recommend_flags() {
        let cli = Cli::try_parse_from([
            "cinematch",
            "recommend",
            "--ratings",
            "mine.csv",
            "--top-users",
            "25",
            "--no-save",
        ])
        .unwrap();

        let Command::Recommend(args) = cli.command else {
            panic!("expected recommend subcommand");
        };
        assert_eq!(args.ratings, Some(PathBuf::from("mine.csv")));
        assert_eq!(args.top_users, Some(25));
        assert!(args.no_save);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        let args = RecommendArgs {
            top_items: Some(3),
            output: Some(PathBuf::from("out.csv")),
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.top_items, 3);
        assert_eq!(config.top_users, 5);
        assert_eq!(config.output_file, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_serve_flags_override_config() {
        let mut config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
        }
        .apply(&mut config);

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
