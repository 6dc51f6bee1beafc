use crate::model::StudentId;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Student not found")]
    NotFound,

    #[error("duplicate student id {0}")]
    DuplicateId(StudentId),

    #[error("student {0} has a zero id")]
    ZeroId(String),

    #[error("cannot load dataset {}: {reason}", .path.display())]
    Dataset { path: PathBuf, reason: String },
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match self {
            DirectoryError::NotFound => StatusCode::NOT_FOUND,
            DirectoryError::DuplicateId(_)
            | DirectoryError::ZeroId(_)
            | DirectoryError::Dataset { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Failure to obtain data from the directory service. The browser always
/// recovers from it with local data.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}
