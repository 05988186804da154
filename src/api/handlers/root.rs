use crate::api::views::Pages;
use axum::{response::Html, Extension};

#[utoipa::path(
    get,
    path = "/",
    operation_id = "home",
    responses (
        (status = 200, description = "Home page", content_type = "text/html", body = String),
    ),
    tag = "minduwc"
)]
// axum handler for the home page
pub async fn home(Extension(pages): Extension<Pages>) -> Html<String> {
    pages.home()
}
