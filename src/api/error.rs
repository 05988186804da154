use crate::api::views::Pages;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Please try again.";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email address is already registered.";

/// Failures a form handler can end with.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing form field")]
    MissingField,
    #[error("invalid credentials")]
    InvalidCredentials(Pages),
    #[error("email already registered")]
    DuplicateEmail(Pages),
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::MissingField => {
                (StatusCode::BAD_REQUEST, "Missing email or password").into_response()
            }
            // user-facing failures re-render the originating form with a 200
            Self::InvalidCredentials(pages) => {
                (StatusCode::OK, pages.signin(Some(INVALID_CREDENTIALS_MESSAGE))).into_response()
            }
            Self::DuplicateEmail(pages) => {
                (StatusCode::OK, pages.register(Some(DUPLICATE_EMAIL_MESSAGE))).into_response()
            }
            Self::Storage(err) => {
                error!("Storage error: {:?}", err);

                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            Error::MissingField.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidCredentials(Pages::default())
                .into_response()
                .status(),
            StatusCode::OK
        );
        assert_eq!(
            Error::DuplicateEmail(Pages::default())
                .into_response()
                .status(),
            StatusCode::OK
        );
        assert_eq!(
            Error::Storage(sqlx::Error::PoolTimedOut)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_error_converts_with_question_mark() {
        fn fails() -> Result<(), Error> {
            Err(sqlx::Error::RowNotFound)?;
            Ok(())
        }

        assert!(matches!(fails(), Err(Error::Storage(_))));
    }
}
