//! Handlers for site provisioning and contents.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mes_core::error::CoreError;
use mes_core::site::SiteKey;
use mes_db::models::site::{BindSite, CreateSite, Site};
use mes_db::repositories::SiteRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::operator::Operator;
use crate::response::DataResponse;
use crate::state::AppState;

fn site_key((station, name, index): (String, String, i16)) -> SiteKey {
    SiteKey {
        station,
        name,
        index,
    }
}

/// POST /api/v1/sites
pub async fn create_site(
    operator: Operator,
    State(state): State<AppState>,
    Json(input): Json<CreateSite>,
) -> AppResult<(StatusCode, Json<DataResponse<Site>>)> {
    input.validate()?;
    let site = SiteRepo::create(&state.pool, &input).await?;

    tracing::debug!(site = %site.key(), operator = %operator.0, "Site created by operator");

    Ok((StatusCode::CREATED, Json(DataResponse { data: site })))
}

/// GET /api/v1/sites/{station}/{name}/{index}
pub async fn get_site(
    State(state): State<AppState>,
    Path(path): Path<(String, String, i16)>,
) -> AppResult<Json<DataResponse<Site>>> {
    let key = site_key(path);
    let site = SiteRepo::find(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Site", &key)))?;
    Ok(Json(DataResponse { data: site }))
}

/// POST /api/v1/sites/{station}/{name}/{index}/bind
///
/// Load ledger resources into the site.
pub async fn bind_site(
    operator: Operator,
    State(state): State<AppState>,
    Path(path): Path<(String, String, i16)>,
    Json(input): Json<BindSite>,
) -> AppResult<Json<DataResponse<Site>>> {
    input.validate()?;
    let key = site_key(path);
    let site = SiteRepo::bind(&state.pool, &key, &input).await?;

    tracing::debug!(site = %key, operator = %operator.0, "Site bound by operator");

    Ok(Json(DataResponse { data: site }))
}

/// POST /api/v1/sites/{station}/{name}/{index}/clear
///
/// Empty the site without recording consumption.
pub async fn clear_site(
    operator: Operator,
    State(state): State<AppState>,
    Path(path): Path<(String, String, i16)>,
) -> AppResult<Json<DataResponse<Site>>> {
    let key = site_key(path);
    let site = SiteRepo::clear(&state.pool, &key).await?;

    tracing::debug!(site = %key, operator = %operator.0, "Site cleared by operator");

    Ok(Json(DataResponse { data: site }))
}
