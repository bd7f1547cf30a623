//! HTTP handlers for the SIA endpoints.

use axum::{
    extract::{RawQuery, State},
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};
use url::form_urlencoded;

use super::dto::HealthResponse;
use super::error::AppError;
use super::state::AppState;
use crate::models::{ResponseFormat, SiaQuery};
use crate::services::{perform_sia_query, write_votable, VOTABLE_MEDIA_TYPE};

/// Decode a raw query string into ordered name/value pairs.
pub fn query_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            "error".to_string()
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

/// GET /sia
///
/// Parameter names arrive uppercased by the middleware. Answers with a
/// VOTable unless `RESPONSEFORMAT` asks for JSON.
pub async fn sia_query(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let pairs = query_pairs(raw.as_deref());
    let query = SiaQuery::from_pairs(&pairs)?;
    tracing::debug!(params = pairs.len(), maxrec = query.maxrec, "sia query");

    let result = perform_sia_query(state.repository.as_ref(), &query).await?;

    Ok(match query.response_format {
        ResponseFormat::VoTable => (
            [(header::CONTENT_TYPE, VOTABLE_MEDIA_TYPE)],
            write_votable(&result),
        )
            .into_response(),
        ResponseFormat::Json => Json(result).into_response(),
    })
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(%uri, "no route");
    AppError::NotFound("Not Found".to_string())
}
