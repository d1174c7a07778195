//! HTTP client for the DeCert server API.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use decert_core::{Certificate, CertificateDraft, MintStatus};

/// Certificate as returned by the server: the record plus its derived
/// mint status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub status: MintStatus,
    #[serde(flatten)]
    pub certificate: Certificate,
}

/// Server response for a prepared mint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedMintRecord {
    pub mint_reference: Option<String>,
    pub payload: String,
    pub certificate: CertificateRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteMintRequest<'a> {
    signed_payload: &'a str,
}

/// Blocking client for the DeCert REST API.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            agent: ureq::Agent::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a JSON response, turning HTTP error statuses into readable
    /// errors carrying the server's message.
    fn check<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> Result<T> {
        match result {
            Ok(response) => response.into_json::<T>().context("invalid server response"),
            Err(ureq::Error::Status(code, response)) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "<no body>".to_string());
                Err(anyhow!("server returned {}: {}", code, message))
            }
            Err(e) => Err(anyhow!("request failed: {}", e)),
        }
    }

    pub fn issue(&self, draft: &CertificateDraft) -> Result<CertificateRecord> {
        Self::check(
            self.agent
                .post(&self.url("/api/v1/certificates"))
                .send_json(draft),
        )
    }

    pub fn list(&self) -> Result<Vec<CertificateRecord>> {
        Self::check(self.agent.get(&self.url("/api/v1/certificates")).call())
    }

    pub fn verify_by_id(&self, id: Uuid) -> Result<CertificateRecord> {
        Self::check(
            self.agent
                .get(&self.url(&format!("/api/v1/verify/{}", id)))
                .call(),
        )
    }

    pub fn verify_by_recipient(&self, recipient: &str) -> Result<Vec<CertificateRecord>> {
        Self::check(
            self.agent
                .get(&self.url("/api/v1/verify"))
                .query("recipient", recipient)
                .call(),
        )
    }

    pub fn prepare_mint(&self, id: Uuid) -> Result<PreparedMintRecord> {
        Self::check(
            self.agent
                .post(&self.url(&format!("/api/v1/certificates/{}/mint/prepare", id)))
                .call(),
        )
    }

    pub fn complete_mint(&self, id: Uuid, signed_payload: &str) -> Result<CertificateRecord> {
        Self::check(
            self.agent
                .post(&self.url(&format!("/api/v1/certificates/{}/mint/complete", id)))
                .send_json(CompleteMintRequest { signed_payload }),
        )
    }

    pub fn mint_direct(&self, id: Uuid) -> Result<CertificateRecord> {
        Self::check(
            self.agent
                .post(&self.url(&format!("/api/v1/certificates/{}/mint", id)))
                .call(),
        )
    }
}
