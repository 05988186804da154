//! Route handlers for the HTML front door and the health check.

pub mod health;
pub mod register;
pub mod root;
pub mod signin;

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use utoipa::ToSchema;

/// Fields posted by both the sign-in and the registration form.
#[derive(ToSchema, Deserialize)]
pub struct Credentials {
    email: String,
    #[schema(format = Password)]
    password: String,
}

impl Credentials {
    /// Split into the email and the password, the latter wrapped so it cannot be logged.
    #[must_use]
    pub fn into_parts(self) -> (String, SecretString) {
        (self.email, SecretString::from(self.password))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// `302 Found` to `location`.
pub(crate) fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}
