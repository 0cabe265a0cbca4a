//! Lookup endpoints: the full pipeline and the raw-HTML debug passthrough

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::extract::{extract_first_row, map_row, Record};
use crate::fetch::PageRenderer;
use crate::rut::normalize;
use crate::util::truncate_chars;

use super::{ApiError, AppState};

/// Max chars of HTML returned by the diagnostic payload
const INSPECT_SNIPPET_CHARS: usize = 1200;
/// Max chars of HTML returned by the raw endpoint
const RAW_HTML_CHARS: usize = 20_000;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub inspect: bool,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub source: String,
    pub rut_consultado: String,
    pub columnas: usize,
    pub data: Record,
    pub raw: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InspectResponse {
    pub source: String,
    pub rut_consultado: String,
    pub message: String,
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct RawResponse {
    pub status: u16,
    pub source: String,
    pub html: String,
}

/// GET /rut/{rut}?inspect=bool
///
/// Normalize, fetch (escalating), extract the first row, map it. Total
/// extraction failure is a 400 unless `inspect=true`, which instead returns
/// a diagnostic snippet of the final HTML.
pub async fn lookup<R: PageRenderer>(
    State(state): State<AppState<R>>,
    Path(rut): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, ApiError> {
    let canonical = normalize(&rut)?.formatted();
    let url = state.config.lookup_url(&canonical);
    info!("consultando RUT {} vía {}", canonical, url);

    let outcome = state.resolver.resolve_detached(&url).await?;
    let values = extract_first_row(&outcome.body);

    if values.is_empty() {
        if query.inspect {
            return Ok(Json(InspectResponse {
                source: url,
                rut_consultado: canonical,
                message: format!(
                    "No se detectaron columnas <td> utilizables (tier: {})",
                    outcome.tier
                ),
                snippet: truncate_chars(&outcome.body, INSPECT_SNIPPET_CHARS).to_string(),
            })
            .into_response());
        }
        return Err(AppError::ExtractionEmpty.into());
    }

    info!("✓ {} columnas extraídas (tier: {})", values.len(), outcome.tier);
    Ok(Json(LookupResponse {
        source: url,
        rut_consultado: canonical,
        columnas: values.len(),
        data: map_row(&values),
        raw: values,
    })
    .into_response())
}

/// GET /rut/{rut}/raw
///
/// Same normalization and two-tier fetch, but returns the (truncated) HTML
/// without extraction. Meant for debugging what the upstream actually serves.
pub async fn raw<R: PageRenderer>(
    State(state): State<AppState<R>>,
    Path(rut): Path<String>,
) -> Result<Json<RawResponse>, ApiError> {
    let canonical = normalize(&rut)?.formatted();
    let url = state.config.lookup_url(&canonical);

    let outcome = state.resolver.resolve_detached(&url).await?;
    Ok(Json(RawResponse {
        // The browser tier carries no status code; report it as a plain 200
        status: outcome.status.unwrap_or(200),
        source: url,
        html: truncate_chars(&outcome.body, RAW_HTML_CHARS).to_string(),
    }))
}
