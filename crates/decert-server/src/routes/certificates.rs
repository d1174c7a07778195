//! Certificate issuance and lookup endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;
use decert_core::{Certificate, CertificateDraft, CertificateStore, MintStatus};

/// Certificate payload on the wire, with the derived mint status made
/// explicit so clients never re-derive it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub status: MintStatus,
    #[serde(flatten)]
    pub certificate: Certificate,
}

impl From<Certificate> for CertificateResponse {
    fn from(certificate: Certificate) -> Self {
        Self {
            status: certificate.status(),
            certificate,
        }
    }
}

/// Creates the certificates router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(issue_certificate).get(list_certificates))
        .route("/{id}", get(get_certificate))
        .with_state(state)
}

/// POST /api/v1/certificates
///
/// Issues a new certificate. Issuance is store-only: minting is a
/// separate, explicit step, so this succeeds regardless of chain health.
async fn issue_certificate(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<CertificateDraft>,
) -> Result<Json<CertificateResponse>, AppError> {
    let certificate = state.coordinator.issue(draft).await?;
    Ok(Json(certificate.into()))
}

/// GET /api/v1/certificates
///
/// Lists all certificates, newest first.
async fn list_certificates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CertificateResponse>>, AppError> {
    let certificates = state.store.list_all().await?;
    Ok(Json(certificates.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/certificates/{id}
async fn get_certificate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CertificateResponse>, AppError> {
    let certificate = state.store.get_by_id(id).await?;
    Ok(Json(certificate.into()))
}
