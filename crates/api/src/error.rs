use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{analysis::DateError, db};

/// Failure of an API request, rendered as a JSON body with a matching status.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to read climate data: {0}")]
    DataSource(#[from] db::Error),
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    /// Machine readable kind: `bad_request`, `not_found` or `data_source`
    pub error: String,
    pub message: String,
}

impl From<DateError> for Error {
    fn from(value: DateError) -> Self {
        Error::BadRequest(value.to_string())
    }
}

impl From<PathRejection> for Error {
    fn from(value: PathRejection) -> Self {
        Error::BadRequest(value.body_text())
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DataSource(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "bad_request",
            Error::NotFound(_) => "not_found",
            Error::DataSource(_) => "data_source",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::DataSource(err) => {
                error!("error reading climate data: {}", err);
                String::from("Failed to read climate data")
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.kind().to_owned(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
