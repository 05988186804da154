//! Router tests driving the full middleware stack with `oneshot`.

use super::{router, DUPLICATE_EMAIL_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
use crate::storage::Database;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, LOCATION},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

struct TestApp {
    _dir: TempDir,
    database: Arc<Database>,
    router: Router,
}

impl TestApp {
    async fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let database = Arc::new(Database::new(dir.path().join("minduwc.db")));
        database.init().await.context("failed to apply schema")?;
        let router = router(database.clone(), None);

        Ok(Self {
            _dir: dir,
            database,
            router,
        })
    }

    async fn get(&self, uri: &str) -> Result<Response> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())?;
        Ok(self.router.clone().oneshot(request).await?)
    }

    async fn post_form(&self, uri: &str, body: &str) -> Result<Response> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, FORM)
            .body(Body::from(body.to_string()))?;
        Ok(self.router.clone().oneshot(request).await?)
    }

    async fn register(&self, email: &str, password: &str) -> Result<Response> {
        self.post_form("/register", &form_body(email, password))
            .await
    }

    async fn signin(&self, email: &str, password: &str) -> Result<Response> {
        self.post_form("/signin", &form_body(email, password)).await
    }
}

fn form_body(email: &str, password: &str) -> String {
    format!(
        "email={}&password={}",
        email.replace('@', "%40"),
        password.replace(' ', "+")
    )
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
}

async fn body_text(response: Response) -> Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

#[tokio::test]
async fn get_pages_render() -> Result<()> {
    let app = TestApp::new().await?;

    for (uri, marker) in [
        ("/", r#"href="/signin""#),
        ("/signin", r#"action="/signin""#),
        ("/register", r#"action="/register""#),
    ] {
        let response = app.get(uri).await?;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        let body = body_text(response).await?;
        assert!(body.contains(marker), "GET {uri} missing {marker}");
        assert!(!body.contains(r#"class="error""#));
    }

    Ok(())
}

#[tokio::test]
async fn register_redirects_to_signin() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.register("alice@example.com", "hunter2").await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/signin"));

    Ok(())
}

#[tokio::test]
async fn register_then_signin_redirects_home() -> Result<()> {
    let app = TestApp::new().await?;

    app.register("alice@example.com", "hunter2").await?;

    let response = app.signin("alice@example.com", "hunter2").await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));

    Ok(())
}

#[tokio::test]
async fn wrong_password_rerenders_signin() -> Result<()> {
    let app = TestApp::new().await?;

    app.register("alice@example.com", "hunter2").await?;

    let response = app.signin("alice@example.com", "wrong").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(location(&response).is_none());
    let body = body_text(response).await?;
    assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
    assert!(body.contains(r#"action="/signin""#));

    Ok(())
}

#[tokio::test]
async fn unknown_email_looks_like_wrong_password() -> Result<()> {
    let app = TestApp::new().await?;

    app.register("alice@example.com", "hunter2").await?;

    let wrong_password = body_text(app.signin("alice@example.com", "wrong").await?).await?;
    let unknown_email = body_text(app.signin("bob@example.com", "hunter2").await?).await?;
    assert_eq!(wrong_password, unknown_email);

    Ok(())
}

#[tokio::test]
async fn duplicate_registration_keeps_first_password() -> Result<()> {
    let app = TestApp::new().await?;

    app.register("alice@example.com", "hunter2").await?;

    let response = app.register("alice@example.com", "anything").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await?;
    assert!(body.contains(DUPLICATE_EMAIL_MESSAGE));
    assert!(body.contains(r#"action="/register""#));

    let response = app.signin("alice@example.com", "hunter2").await?;
    assert_eq!(location(&response), Some("/"));

    let response = app.signin("alice@example.com", "anything").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await?
        .contains(INVALID_CREDENTIALS_MESSAGE));

    Ok(())
}

#[tokio::test]
async fn connections_released_when_requests_end() -> Result<()> {
    let app = TestApp::new().await?;

    for round in 0..10 {
        let email = format!("user{round}@example.com");

        let response = app.register(&email, "hunter2").await?;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(app.database.held_connections(), 0, "register");

        let response = app.register(&email, "hunter2").await?;
        assert!(body_text(response).await?.contains(DUPLICATE_EMAIL_MESSAGE));
        assert_eq!(app.database.held_connections(), 0, "duplicate");

        let response = app.signin(&email, "hunter2").await?;
        assert_eq!(location(&response), Some("/"));
        assert_eq!(app.database.held_connections(), 0, "signin");

        let response = app.signin(&email, "wrong").await?;
        assert!(body_text(response)
            .await?
            .contains(INVALID_CREDENTIALS_MESSAGE));
        assert_eq!(app.database.held_connections(), 0, "invalid credentials");

        let response = app.post_form("/signin", "password=hunter2").await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.database.held_connections(), 0, "missing field");

        let response = app.get("/health").await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(app.database.held_connections(), 0, "health");
    }

    Ok(())
}

#[tokio::test]
async fn connection_released_after_storage_failure() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let database = Arc::new(Database::new(dir.path().join("uninitialized.db")));
    let app = router(database.clone(), None);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/signin")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(form_body("alice@example.com", "hunter2")))?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(database.held_connections(), 0);

    Ok(())
}

#[tokio::test]
async fn stored_hash_is_sha256_hex() -> Result<()> {
    let app = TestApp::new().await?;

    app.register("alice@example.com", "hunter2").await?;

    let mut conn = app.database.acquire().await?;
    let hash: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE email = 'alice@example.com'")
            .fetch_one(&mut conn)
            .await?;
    assert_eq!(
        hash,
        "f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7"
    );

    Ok(())
}

#[tokio::test]
async fn missing_fields_are_bad_requests() -> Result<()> {
    let app = TestApp::new().await?;

    for uri in ["/signin", "/register"] {
        let response = app.post_form(uri, "email=alice%40example.com").await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "POST {uri}");

        let response = app.post_form(uri, "password=hunter2").await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "POST {uri}");
    }

    // not a form at all
    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"a@b.c","password":"x"}"#))?;
    let response = app.router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn empty_values_are_accepted() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.post_form("/register", "email=&password=").await?;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app.post_form("/signin", "email=&password=").await?;
    assert_eq!(location(&response), Some("/"));

    Ok(())
}

#[tokio::test]
async fn storage_failure_is_a_server_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // schema never applied, so the users table is missing
    let database = Arc::new(Database::new(dir.path().join("uninitialized.db")));
    let app = router(database, None);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(form_body("alice@example.com", "hunter2")))?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn health_reports_database() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.get("/health").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
    let health: serde_json::Value = serde_json::from_str(&body_text(response).await?)?;
    assert_eq!(health["database"], "ok");
    assert_eq!(health["name"], env!("CARGO_PKG_NAME"));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/health")
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn health_unavailable_when_database_cannot_open() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let database = Arc::new(Database::new(dir.path().join("missing").join("minduwc.db")));
    let app = router(database, None);

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn request_id_is_generated_and_propagated() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.get("/").await?;
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .context("missing x-request-id")?;
    assert!(ulid::Ulid::from_string(generated).is_ok());

    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "caller-supplied")
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("caller-supplied")
    );

    Ok(())
}

#[tokio::test]
async fn static_files_served_when_configured() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let assets = dir.path().join("static");
    std::fs::create_dir(&assets)?;
    std::fs::write(assets.join("main.js"), "console.log('hi');")?;

    let database = Arc::new(Database::new(dir.path().join("minduwc.db")));
    let with_assets = router(database.clone(), Some(&assets));
    let request = Request::builder()
        .uri("/static/main.js")
        .body(Body::empty())?;
    let response = with_assets.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await?, "console.log('hi');");

    let request = Request::builder().uri("/").body(Body::empty())?;
    let home = body_text(with_assets.oneshot(request).await?).await?;
    assert!(home.contains(r#"src="/static/main.js""#));

    let without_assets = router(database, None);
    let request = Request::builder()
        .uri("/static/main.js")
        .body(Body::empty())?;
    let response = without_assets.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn pages_do_not_reference_unserved_assets() -> Result<()> {
    let app = TestApp::new().await?;

    for uri in ["/", "/signin", "/register"] {
        let body = body_text(app.get(uri).await?).await?;
        assert!(!body.contains("/static/"), "GET {uri} references /static");
    }

    let body = body_text(app.signin("nobody@example.com", "x").await?).await?;
    assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
    assert!(!body.contains("/static/"));

    Ok(())
}
