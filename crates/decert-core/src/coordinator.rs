//! Mint coordinator: drives the two-phase issuance/minting protocol.
//!
//! The coordinator is the only writer besides certificate creation. The
//! store is only mutated after a chain call has returned, so an abandoned
//! call either had no effect or already completed; there is no in-between
//! state visible to readers. Chain failures are reported to the caller and
//! never fatal to the record.

use tracing::{info, warn};
use uuid::Uuid;

use crate::certificate::{Certificate, CertificateDraft, MintStatus};
use crate::chain::{ChainError, ChainMetadata, ChainService};
use crate::error::{Error, MintPhase};
use crate::store::{CertificateStore, ChainProof};

/// Chain identity used to issue when a certificate names none.
#[derive(Debug, Clone)]
pub struct IssuerIdentity {
    pub address: String,
}

impl IssuerIdentity {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// A prepared mint awaiting the recipient's countersignature.
#[derive(Debug, Clone)]
pub struct PreparedMint {
    /// The certificate, now `PartiallyMinted`.
    pub certificate: Certificate,
    /// Opaque payload the recipient's wallet must countersign.
    pub payload: String,
}

/// Orchestrates certificate issuance and the attach-chain-proof flow.
///
/// Issuance never blocks on, nor fails because of, chain availability:
/// the record in the store is authoritative and minting is a separate,
/// explicit step.
pub struct MintCoordinator<S, C> {
    store: S,
    chain: C,
    issuer: IssuerIdentity,
}

impl<S, C> MintCoordinator<S, C>
where
    S: CertificateStore,
    C: ChainService,
{
    pub fn new(store: S, chain: C, issuer: IssuerIdentity) -> Self {
        Self {
            store,
            chain,
            issuer,
        }
    }

    /// Validates and persists a new certificate. No chain interaction.
    pub async fn issue(&self, draft: CertificateDraft) -> Result<Certificate, Error> {
        let certificate = self.store.create(draft).await?;
        info!(certificate_id = %certificate.id, title = %certificate.title, "certificate issued");
        Ok(certificate)
    }

    /// First phase of the two-phase mint.
    ///
    /// Requires an `Unminted` certificate with a recipient address. On
    /// success the mint reference is attached and the record becomes
    /// `PartiallyMinted`. On chain failure the record stays `Unminted`
    /// and the call may be retried.
    pub async fn prepare_mint(&self, id: Uuid) -> Result<PreparedMint, Error> {
        let certificate = self.store.get_by_id(id).await?;
        require_status(&certificate, MintStatus::Unminted)?;
        let recipient = require_recipient(&certificate)?.to_string();
        let metadata = ChainMetadata::for_certificate(&certificate)?;

        let prepared = self
            .chain
            .prepare_transfer(self.issuer_for(&certificate), &recipient, &metadata)
            .await
            .map_err(|source| chain_failure(id, MintPhase::Prepare, source))?;

        // Concurrent prepares race here; the write-once store picks one
        // winner and the loser surfaces ImmutableField.
        let certificate = self
            .store
            .attach_chain_proof(id, ChainProof::mint_reference(prepared.reference))
            .await?;
        info!(certificate_id = %id, "mint prepared");
        Ok(PreparedMint {
            certificate,
            payload: prepared.payload,
        })
    }

    /// Second phase of the two-phase mint: submit the countersigned
    /// payload.
    ///
    /// Requires a `PartiallyMinted` certificate; an already-minted record
    /// is rejected because the proof signature is write-once. On chain
    /// failure the record stays `PartiallyMinted` and the call may be
    /// retried with the same payload.
    pub async fn complete_mint(&self, id: Uuid, signed_payload: &str) -> Result<Certificate, Error> {
        let certificate = self.store.get_by_id(id).await?;
        require_status(&certificate, MintStatus::PartiallyMinted)?;

        let submitted = self
            .chain
            .submit_signed(signed_payload)
            .await
            .map_err(|source| chain_failure(id, MintPhase::Complete, source))?;

        let certificate = self
            .store
            .attach_chain_proof(id, ChainProof::proof_signature(submitted.proof_signature))
            .await?;
        info!(certificate_id = %id, "mint completed");
        Ok(certificate)
    }

    /// Single-phase mint: one chain call, one store mutation, straight to
    /// `Minted`.
    pub async fn mint_direct(&self, id: Uuid) -> Result<Certificate, Error> {
        let certificate = self.store.get_by_id(id).await?;
        require_status(&certificate, MintStatus::Unminted)?;
        let recipient = require_recipient(&certificate)?.to_string();
        let metadata = ChainMetadata::for_certificate(&certificate)?;

        let confirmed = self
            .chain
            .mint_and_confirm(self.issuer_for(&certificate), &recipient, &metadata)
            .await
            .map_err(|source| chain_failure(id, MintPhase::Direct, source))?;

        let certificate = self
            .store
            .attach_chain_proof(
                id,
                ChainProof::confirmed(confirmed.reference, confirmed.proof_signature),
            )
            .await?;
        info!(certificate_id = %id, "certificate minted");
        Ok(certificate)
    }

    /// The issuing chain identity for a certificate: the one named at
    /// creation, or the coordinator's configured identity.
    fn issuer_for<'a>(&'a self, certificate: &'a Certificate) -> &'a str {
        certificate
            .issuer_address
            .as_deref()
            .unwrap_or(&self.issuer.address)
    }
}

fn require_status(certificate: &Certificate, expected: MintStatus) -> Result<(), Error> {
    let actual = certificate.status();
    if actual != expected {
        return Err(Error::InvalidState {
            id: certificate.id,
            expected,
            actual,
        });
    }
    Ok(())
}

fn require_recipient(certificate: &Certificate) -> Result<&str, Error> {
    certificate
        .recipient_address
        .as_deref()
        .filter(|address| !address.trim().is_empty())
        .ok_or_else(|| Error::Validation("recipientAddress".to_string()))
}

fn chain_failure(id: Uuid, phase: MintPhase, source: ChainError) -> Error {
    warn!(certificate_id = %id, %phase, error = %source, "chain service call failed");
    Error::Chain { id, phase, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::CertificateDraft;
    use chrono::NaiveDate;

    fn certificate(recipient: Option<&str>, issuer: Option<&str>) -> Certificate {
        CertificateDraft {
            holder_name: Some("Ada".to_string()),
            holder_email: Some("a@example.com".to_string()),
            title: Some("Completion".to_string()),
            description: None,
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            recipient_address: recipient.map(str::to_string),
            issuer_address: issuer.map(str::to_string),
        }
        .validate()
        .expect("valid draft")
        .into_certificate()
    }

    #[test]
    fn test_require_status_accepts_match() {
        let cert = certificate(None, None);
        assert!(require_status(&cert, MintStatus::Unminted).is_ok());
    }

    #[test]
    fn test_require_status_reports_actual_state() {
        let mut cert = certificate(None, None);
        cert.mint_reference = Some("mint123".to_string());

        let err = require_status(&cert, MintStatus::Unminted).unwrap_err();
        match err {
            Error::InvalidState {
                expected, actual, ..
            } => {
                assert_eq!(expected, MintStatus::Unminted);
                assert_eq!(actual, MintStatus::PartiallyMinted);
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_require_recipient() {
        let with = certificate(Some("wallet-a"), None);
        assert_eq!(require_recipient(&with).unwrap(), "wallet-a");

        let without = certificate(None, None);
        let err = require_recipient(&without).unwrap_err();
        assert!(matches!(err, Error::Validation(field) if field == "recipientAddress"));
    }
}
