use crate::{storage::RequestDb, GIT_COMMIT_HASH};
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::Connection;
use tracing::{error, info_span, Instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

/// First seven characters of the commit, empty when the hash is shorter.
fn short_hash(commit: &str) -> &str {
    commit.get(..7).unwrap_or("")
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Database is healthy", body = [Health]),
        (status = 503, description = "Database is unhealthy", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, mut db: RequestDb) -> impl IntoResponse {
    let reachable = ping(&mut db).await;

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if reachable { "ok" } else { "error" }.to_string(),
    };

    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let mut headers = HeaderMap::new();
    let x_app = format!("{}:{}:{}", health.name, health.version, short_hash(&health.commit));
    match HeaderValue::from_str(&x_app) {
        Ok(value) => {
            headers.insert("X-App", value);
        }
        Err(err) => error!("Failed to build X-App header: {}", err),
    }

    // OPTIONS only reports through the status and headers
    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    (status, headers, body)
}

async fn ping(db: &mut RequestDb) -> bool {
    let conn = match db.conn().await {
        Ok(conn) => conn,
        Err(err) => {
            error!("Failed to open database connection: {}", err);
            return false;
        }
    };

    let span = info_span!("db.ping", db.system = "sqlite", db.operation = "PING");
    match conn.ping().instrument(span).await {
        Ok(()) => true,
        Err(err) => {
            error!("Failed to ping database: {}", err);
            false
        }
    }
}
