use crate::{
    api::{handlers::found, views::Pages, Error},
    credentials::digest,
    storage::{
        users::{self, InsertOutcome},
        RequestDb,
    },
};
use axum::{
    response::{Html, Response},
    Extension, Form,
};
use tracing::{debug, instrument};

use super::Credentials;

#[utoipa::path(
    get,
    path = "/register",
    operation_id = "register_form",
    responses (
        (status = 200, description = "Empty registration form", content_type = "text/html", body = String),
    ),
    tag = "register"
)]
pub async fn form(Extension(pages): Extension<Pages>) -> Html<String> {
    pages.register(None)
}

#[utoipa::path(
    post,
    path = "/register",
    operation_id = "register",
    request_body(content = Credentials, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 302, description = "Registration successful, redirects to /signin"),
        (status = 200, description = "Email already registered, registration form rendered again", content_type = "text/html", body = String),
        (status = 400, description = "Missing email or password"),
        (status = 500, description = "Storage failure"),
    ),
    tag = "register"
)]
// axum handler for registration
#[instrument(skip(pages, db, payload))]
pub async fn submit(
    Extension(pages): Extension<Pages>,
    mut db: RequestDb,
    payload: Option<Form<Credentials>>,
) -> Result<Response, Error> {
    let Some(Form(credentials)) = payload else {
        return Err(Error::MissingField);
    };

    debug!("credentials: {:?}", credentials);

    let (email, password) = credentials.into_parts();
    let password_hash = digest(&password);

    let conn = db.conn().await?;
    match users::insert(conn, &email, &password_hash).await? {
        InsertOutcome::Created => {
            debug!("User created");

            Ok(found("/signin"))
        }
        InsertOutcome::Conflict => {
            debug!("User already exists");

            Err(Error::DuplicateEmail(pages))
        }
    }
}
