//! Mint endpoints: the two-phase prepare/complete flow and the
//! single-phase variant.
//!
//! Every handler leaves retry policy to the caller; a chain failure is
//! surfaced as 502 and the certificate keeps its previous state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::certificates::CertificateResponse;
use crate::AppState;

/// Request body for completing a prepared mint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMintRequest {
    /// Countersigned payload produced by the recipient's wallet.
    pub signed_payload: String,
}

/// Response for a successfully prepared mint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareMintResponse {
    /// Mint reference now attached to the certificate.
    pub mint_reference: Option<String>,
    /// Opaque payload the recipient must countersign and send back via
    /// the complete endpoint.
    pub payload: String,
    pub certificate: CertificateResponse,
}

/// Creates the mint router, mounted alongside the certificates routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{id}/mint/prepare", post(prepare_mint))
        .route("/{id}/mint/complete", post(complete_mint))
        .route("/{id}/mint", post(mint_direct))
        .with_state(state)
}

/// POST /api/v1/certificates/{id}/mint/prepare
///
/// First phase of the two-phase mint. Requires an unminted certificate
/// with a recipient address; transitions it to partially minted.
async fn prepare_mint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PrepareMintResponse>, AppError> {
    let prepared = state.coordinator.prepare_mint(id).await?;
    Ok(Json(PrepareMintResponse {
        mint_reference: prepared.certificate.mint_reference.clone(),
        payload: prepared.payload,
        certificate: prepared.certificate.into(),
    }))
}

/// POST /api/v1/certificates/{id}/mint/complete
///
/// Second phase: submits the countersigned payload and attaches the
/// transaction signature.
async fn complete_mint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteMintRequest>,
) -> Result<Json<CertificateResponse>, AppError> {
    let certificate = state
        .coordinator
        .complete_mint(id, &request.signed_payload)
        .await?;
    Ok(Json(certificate.into()))
}

/// POST /api/v1/certificates/{id}/mint
///
/// Single-phase mint: prepares, submits and confirms in one gateway call.
async fn mint_direct(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CertificateResponse>, AppError> {
    let certificate = state.coordinator.mint_direct(id).await?;
    Ok(Json(certificate.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_request_deserializes_camel_case() {
        let json = r#"{"signedPayload": "AQIDBA=="}"#;
        let request: CompleteMintRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.signed_payload, "AQIDBA==");
    }

    #[test]
    fn test_complete_request_rejects_missing_payload() {
        let result = serde_json::from_str::<CompleteMintRequest>("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_prepare_response_shape() {
        use chrono::NaiveDate;
        use decert_core::CertificateDraft;

        let mut certificate = CertificateDraft {
            holder_name: Some("Ada".to_string()),
            holder_email: Some("a@example.com".to_string()),
            title: Some("Completion".to_string()),
            description: None,
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            recipient_address: Some("wallet-a".to_string()),
            issuer_address: None,
        }
        .validate()
        .expect("valid draft")
        .into_certificate();
        certificate.mint_reference = Some("mint123".to_string());

        let response = PrepareMintResponse {
            mint_reference: certificate.mint_reference.clone(),
            payload: "AQID".to_string(),
            certificate: certificate.into(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"mintReference\":\"mint123\""));
        assert!(json.contains("\"payload\":\"AQID\""));
        assert!(json.contains("\"status\":\"partiallyMinted\""));
    }
}
