#![allow(clippy::needless_for_each)]

use crate::api::handlers::{self, health, register, root, signin};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::home,
        signin::form,
        signin::submit,
        register::form,
        register::submit,
        health::health,
    ),
    components(schemas(handlers::Credentials, health::Health)),
    tags(
        (name = "minduwc", description = "Registration and sign-in")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
