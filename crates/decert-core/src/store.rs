//! Certificate store seam.

use async_trait::async_trait;
use uuid::Uuid;

use crate::certificate::{Certificate, CertificateDraft};
use crate::error::Error;

/// Chain proof fields to merge into a stored certificate.
///
/// Both fields are write-once: attaching a field that is already set fails
/// with [`Error::ImmutableField`] and changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainProof {
    pub mint_reference: Option<String>,
    pub proof_signature: Option<String>,
}

impl ChainProof {
    /// Proof patch carrying only a mint reference (two-phase prepare).
    pub fn mint_reference(reference: impl Into<String>) -> Self {
        Self {
            mint_reference: Some(reference.into()),
            proof_signature: None,
        }
    }

    /// Proof patch carrying only a transaction signature (two-phase
    /// completion).
    pub fn proof_signature(signature: impl Into<String>) -> Self {
        Self {
            mint_reference: None,
            proof_signature: Some(signature.into()),
        }
    }

    /// Proof patch carrying both fields (single-phase mint).
    pub fn confirmed(reference: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            mint_reference: Some(reference.into()),
            proof_signature: Some(signature.into()),
        }
    }

    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.mint_reference.is_none() && self.proof_signature.is_none()
    }
}

/// Durable, keyed persistence for certificates.
///
/// Mutations are durable before the call returns. For a single certificate
/// id, `attach_chain_proof` calls are linearized: two concurrent attaches
/// of the same field must resolve to exactly one winner, with the loser
/// observing [`Error::ImmutableField`]. Operations on different ids are
/// independent.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Validates the draft and persists a new certificate in the
    /// `Unminted` state.
    async fn create(&self, draft: CertificateDraft) -> Result<Certificate, Error>;

    /// Point lookup by id.
    async fn get_by_id(&self, id: Uuid) -> Result<Certificate, Error>;

    /// All certificates held by `recipient`. Empty when none match.
    async fn list_by_recipient(&self, recipient: &str) -> Result<Vec<Certificate>, Error>;

    /// All certificates, newest first.
    async fn list_all(&self) -> Result<Vec<Certificate>, Error>;

    /// Merges chain proof fields into the record in one mutation,
    /// enforcing write-once semantics, and bumps `updated_at`.
    ///
    /// An empty patch is a caller bug and fails with [`Error::Validation`].
    async fn attach_chain_proof(&self, id: Uuid, proof: ChainProof) -> Result<Certificate, Error>;
}

#[async_trait]
impl<S: CertificateStore + ?Sized> CertificateStore for std::sync::Arc<S> {
    async fn create(&self, draft: CertificateDraft) -> Result<Certificate, Error> {
        (**self).create(draft).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Certificate, Error> {
        (**self).get_by_id(id).await
    }

    async fn list_by_recipient(&self, recipient: &str) -> Result<Vec<Certificate>, Error> {
        (**self).list_by_recipient(recipient).await
    }

    async fn list_all(&self) -> Result<Vec<Certificate>, Error> {
        (**self).list_all().await
    }

    async fn attach_chain_proof(&self, id: Uuid, proof: ChainProof) -> Result<Certificate, Error> {
        (**self).attach_chain_proof(id, proof).await
    }
}
