use crate::{
    api::{handlers::found, views::Pages, Error},
    credentials::digest,
    storage::{users, RequestDb},
};
use axum::{
    response::{Html, Response},
    Extension, Form,
};
use tracing::{debug, instrument};

use super::Credentials;

#[utoipa::path(
    get,
    path = "/signin",
    operation_id = "signin_form",
    responses (
        (status = 200, description = "Empty sign-in form", content_type = "text/html", body = String),
    ),
    tag = "signin"
)]
pub async fn form(Extension(pages): Extension<Pages>) -> Html<String> {
    pages.signin(None)
}

#[utoipa::path(
    post,
    path = "/signin",
    operation_id = "signin",
    request_body(content = Credentials, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 302, description = "Signed in, redirects to /"),
        (status = 200, description = "Invalid credentials, sign-in form rendered again", content_type = "text/html", body = String),
        (status = 400, description = "Missing email or password"),
    ),
    tag = "signin"
)]
// axum handler for sign-in
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
    match users::find_by_credentials(conn, &email, &password_hash).await? {
        Some(_) => {
            // no session is established; the redirect is the whole success path
            debug!("Sign-in successful");

            Ok(found("/"))
        }
        None => {
            debug!("Invalid credentials");

            Err(Error::InvalidCredentials(pages))
        }
    }
}
