use serde::Serialize;

#[derive(thiserror::Error, Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("record not found")]
    RecordNotFound,
    #[error("climate database unavailable: {message}")]
    Unavailable { message: String },
    #[error("query did not complete within {seconds}s")]
    Timeout { seconds: u64 },
}

impl Error {
    fn from_other_error(err: impl std::error::Error) -> Self {
        Self::Unavailable {
            message: format!("{err}"),
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error::NotFound;

        match err {
            NotFound => Self::RecordNotFound,
            _ => Self::from_other_error(err),
        }
    }
}

impl From<diesel::ConnectionError> for Error {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::from_other_error(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
