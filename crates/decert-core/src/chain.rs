//! Chain service seam.
//!
//! The chain is an external collaborator reached through a narrow async
//! interface. Implementations own keys, fee policy and RPC configuration;
//! this crate only sees opaque references, payloads and signatures, and a
//! failure here never mutates the certificate store.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical;
use crate::certificate::Certificate;
use crate::error::Error;

/// Errors from the chain service.
///
/// Transport- and consensus-level failures only; lifecycle violations are
/// caught by the coordinator before any chain call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The chain service could not be reached.
    #[error("chain service unavailable: {0}")]
    Unavailable(String),

    /// The chain service refused to prepare or confirm the transaction.
    #[error("chain transaction rejected: {0}")]
    Rejected(String),

    /// A countersigned payload was rejected on submission.
    #[error("chain submission failed: {0}")]
    Submission(String),
}

/// An issuer-prepared transfer awaiting the recipient's countersignature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTransfer {
    /// Stable chain object identifier, usable as a mint reference.
    pub reference: String,
    /// Opaque partially-signed payload for the recipient's wallet.
    pub payload: String,
}

/// Result of submitting a countersigned payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedTransfer {
    /// Chain transaction reference proving the mint.
    pub proof_signature: String,
}

/// Result of a single-phase mint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedMint {
    pub reference: String,
    pub proof_signature: String,
}

/// Certificate projection recorded on chain.
///
/// `digest` commits the chain record to the certificate content: it is the
/// SHA-256 over the JCS-canonical JSON of this structure with `digest` set
/// to the empty string during hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    pub certificate_id: Uuid,
    pub title: String,
    pub holder_name: String,
    pub issue_date: NaiveDate,
    /// Hex-encoded SHA-256 content digest (empty during hashing).
    pub digest: String,
}

impl ChainMetadata {
    /// Builds the chain metadata for a certificate and fills in its
    /// content digest.
    pub fn for_certificate(certificate: &Certificate) -> Result<Self, Error> {
        let mut metadata = Self {
            certificate_id: certificate.id,
            title: certificate.title.clone(),
            holder_name: certificate.holder_name.clone(),
            issue_date: certificate.issue_date,
            digest: String::new(),
        };
        let bytes = canonical::canonical_bytes(&metadata)?;
        metadata.digest = canonical::sha256_hex(&bytes);
        Ok(metadata)
    }
}

/// Black-box chain capability.
///
/// A concrete implementation should pick one mint shape (two-phase or
/// single-phase) and implement it genuinely; both entry points are part of
/// the contract so the coordinator can drive either flow.
#[async_trait]
pub trait ChainService: Send + Sync {
    /// Prepares an issuer-signed transfer to `recipient` and returns the
    /// mint reference together with the payload the recipient must
    /// countersign.
    async fn prepare_transfer(
        &self,
        issuer: &str,
        recipient: &str,
        metadata: &ChainMetadata,
    ) -> Result<PreparedTransfer, ChainError>;

    /// Submits a countersigned payload and returns the transaction
    /// signature once the chain accepts it.
    async fn submit_signed(&self, payload: &str) -> Result<SubmittedTransfer, ChainError>;

    /// Single-phase variant: mints and confirms in one call.
    async fn mint_and_confirm(
        &self,
        issuer: &str,
        recipient: &str,
        metadata: &ChainMetadata,
    ) -> Result<ConfirmedMint, ChainError>;
}

#[async_trait]
impl<C: ChainService + ?Sized> ChainService for std::sync::Arc<C> {
    async fn prepare_transfer(
        &self,
        issuer: &str,
        recipient: &str,
        metadata: &ChainMetadata,
    ) -> Result<PreparedTransfer, ChainError> {
        (**self).prepare_transfer(issuer, recipient, metadata).await
    }

    async fn submit_signed(&self, payload: &str) -> Result<SubmittedTransfer, ChainError> {
        (**self).submit_signed(payload).await
    }

    async fn mint_and_confirm(
        &self,
        issuer: &str,
        recipient: &str,
        metadata: &ChainMetadata,
    ) -> Result<ConfirmedMint, ChainError> {
        (**self).mint_and_confirm(issuer, recipient, metadata).await
    }
}
