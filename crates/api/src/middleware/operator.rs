//! Operator identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mes_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the identity of the operator performing a mutation.
pub const OPERATOR_HEADER: &str = "x-operator-id";

/// Operator taken from the `X-Operator-Id` header.
///
/// Use it as an extractor parameter on every mutating handler:
///
/// ```ignore
/// async fn my_handler(operator: Operator) -> AppResult<Json<()>> {
///     tracing::info!(operator = %operator.0, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Operator(pub String);

impl Operator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for Operator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let operator = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing X-Operator-Id header".into(),
                ))
            })?;

        Ok(Operator(operator.to_string()))
    }
}
