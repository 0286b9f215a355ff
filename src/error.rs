use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{ingest::ColumnResolutionError, models::ItemId};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing input file {}; set DATA_DIR or the file paths if necessary", .0.display())]
    MissingInput(PathBuf),

    #[error("Missing required column `{column}` in the {table} table")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error(transparent)]
    ColumnResolution(#[from] ColumnResolutionError),

    #[error("Movie {0} is not in the catalog")]
    UnknownItem(ItemId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ColumnResolution(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Io(_)
            | AppError::Csv(_)
            | AppError::MissingInput(_)
            | AppError::MissingColumn { .. }
            | AppError::UnknownItem(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = AppError::InvalidInput("rating must be finite".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_item_is_internal_error() {
        let response = AppError::UnknownItem(ItemId::from("42")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_column_message() {
        let err = AppError::MissingColumn {
            table: "ratings",
            column: "userId",
        };
        assert_eq!(
            err.to_string(),
            "Missing required column `userId` in the ratings table"
        );
    }
}
