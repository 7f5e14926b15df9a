use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use climate_core::model::date_range::{self, DateField};
use serde::Serialize;

use crate::db;

const INTERNAL_ERROR_MESSAGE: &str = "an unexpected error occurred";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{message}")]
    Validation {
        field: Option<DateField>,
        message: String,
    },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    StoreUnavailable { message: String },
    #[error("{message}")]
    Timeout { message: String },
    #[error("{message}")]
    Internal { message: String },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ErrorKind {
    ValidationError,
    NotFound,
    StoreUnavailable,
    Timeout,
    InternalError,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorKind,
    message: &'a str,
}

impl Error {
    pub(super) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    fn kind(&self) -> ErrorKind {
        use Error::*;

        match self {
            Validation { .. } => ErrorKind::ValidationError,
            NotFound { .. } => ErrorKind::NotFound,
            StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            Timeout { .. } => ErrorKind::Timeout,
            Internal { .. } => ErrorKind::InternalError,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        use db::error::Error::{RecordNotFound, Timeout, Unavailable};

        let message = err.to_string();

        match err {
            RecordNotFound => Self::NotFound { message },
            Unavailable { .. } => Self::StoreUnavailable { message },
            Timeout { .. } => Self::Timeout { message },
        }
    }
}

impl From<date_range::Error> for Error {
    fn from(err: date_range::Error) -> Self {
        use date_range::Error::{Inverted, Malformed};

        let field = match &err {
            Malformed { field, .. } => Some(*field),
            Inverted { .. } => None,
        };

        Self::Validation {
            field,
            message: err.to_string(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(err: PathRejection) -> Self {
        if err.status().is_server_error() {
            return Self::Internal {
                message: err.body_text(),
            };
        }

        Self::Validation {
            field: None,
            message: err.body_text(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        let field = match &self {
            Self::Validation { field, .. } => *field,
            _ => None,
        };
        tracing::error!(error = %self, ?kind, ?field, status = status.as_u16());

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_ERROR_MESSAGE
        } else {
            match &self {
                Self::Validation { message, .. }
                | Self::NotFound { message }
                | Self::StoreUnavailable { message }
                | Self::Timeout { message }
                | Self::Internal { message } => message.as_str(),
            }
        };

        (
            status,
            axum::Json(ErrorBody {
                error: kind,
                message,
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
