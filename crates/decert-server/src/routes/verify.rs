//! Read-only verification endpoints.
//!
//! These go through the verification facade, which has no write
//! capability, so a verification request can never alter a record.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::certificates::CertificateResponse;
use crate::AppState;

/// Query parameters for recipient lookup.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Recipient chain address to look up.
    pub recipient: Option<String>,
}

/// Creates the verification router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(verify_by_recipient))
        .route("/{id}", get(verify_by_id))
        .with_state(state)
}

/// GET /api/v1/verify/{id}
async fn verify_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CertificateResponse>, AppError> {
    let certificate = state.verification.verify_by_id(id).await?;
    Ok(Json(certificate.into()))
}

/// GET /api/v1/verify?recipient=<address>
///
/// Returns every certificate held by the recipient; an empty array is a
/// successful answer, not an error.
async fn verify_by_recipient(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<Vec<CertificateResponse>>, AppError> {
    let recipient = query
        .recipient
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Missing certificate id or recipient address".to_string())
        })?;

    let certificates = state.verification.verify_by_recipient(&recipient).await?;
    Ok(Json(certificates.into_iter().map(Into::into).collect()))
}
