use std::path::PathBuf;

use serde::Deserialize;

use crate::{ingest::IngestConfig, services::EngineDefaults};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the MovieLens tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Movie catalog file, relative to `data_dir` unless absolute
    #[serde(default = "default_movies_file")]
    pub movies_file: PathBuf,

    /// Community ratings file, relative to `data_dir` unless absolute
    #[serde(default = "default_ratings_file")]
    pub ratings_file: PathBuf,

    /// Number of ratings rows to read; 0 reads the whole table
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,

    /// Size of the neighborhood used for scoring
    #[serde(default = "default_top_users")]
    pub top_users: usize,

    /// Number of recommendations returned
    #[serde(default = "default_top_items")]
    pub top_items: usize,

    /// Where the recommendations CSV is written
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("ml-32m")
}

fn default_movies_file() -> PathBuf {
    PathBuf::from("movies.csv")
}

fn default_ratings_file() -> PathBuf {
    PathBuf::from("ratings.csv")
}

fn default_sample_limit() -> usize {
    2_000_000
}

fn default_top_users() -> usize {
    5
}

fn default_top_items() -> usize {
    10
}

fn default_output_file() -> PathBuf {
    PathBuf::from("recommendations.csv")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Paths and sampling handed to the ingestion layer
    pub fn ingest(&self) -> IngestConfig {
        IngestConfig {
            movies_path: self.data_dir.join(&self.movies_file),
            ratings_path: self.data_dir.join(&self.ratings_file),
            sample_limit: (self.sample_limit > 0).then_some(self.sample_limit),
        }
    }

    pub fn engine_defaults(&self) -> EngineDefaults {
        EngineDefaults {
            top_users: self.top_users,
            top_items: self.top_items,
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
