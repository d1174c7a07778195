//! In-memory certificate store.
//!
//! Reference implementation of [`CertificateStore`] with the same
//! semantics as the durable store: write-once proof fields, linearized
//! attaches per id, `updated_at` bumped on every mutation. Used by the
//! core test suite and by embedders that do not need durability.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::certificate::{Certificate, CertificateDraft};
use crate::error::Error;
use crate::store::{CertificateStore, ChainProof};

/// Non-durable certificate store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, Certificate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Certificate>>, Error> {
        self.records
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn create(&self, draft: CertificateDraft) -> Result<Certificate, Error> {
        let certificate = draft.validate()?.into_certificate();
        let mut records = self.lock()?;
        records.insert(certificate.id, certificate.clone());
        Ok(certificate)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Certificate, Error> {
        let records = self.lock()?;
        records.get(&id).cloned().ok_or(Error::NotFound(id))
    }

    async fn list_by_recipient(&self, recipient: &str) -> Result<Vec<Certificate>, Error> {
        let records = self.lock()?;
        let mut matches: Vec<Certificate> = records
            .values()
            .filter(|c| c.recipient_address.as_deref() == Some(recipient))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn list_all(&self) -> Result<Vec<Certificate>, Error> {
        let records = self.lock()?;
        let mut all: Vec<Certificate> = records.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn attach_chain_proof(&self, id: Uuid, proof: ChainProof) -> Result<Certificate, Error> {
        if proof.is_empty() {
            return Err(Error::Validation("chainProof".to_string()));
        }

        // Lock held across check and write: attaches for an id are
        // linearized, so a concurrent attach of the same field loses with
        // ImmutableField instead of silently overwriting.
        let mut records = self.lock()?;
        let record = records.get_mut(&id).ok_or(Error::NotFound(id))?;

        if proof.mint_reference.is_some() && record.mint_reference.is_some() {
            return Err(Error::ImmutableField("mintReference"));
        }
        if proof.proof_signature.is_some() && record.proof_signature.is_some() {
            return Err(Error::ImmutableField("proofSignature"));
        }

        if let Some(reference) = proof.mint_reference {
            record.mint_reference = Some(reference);
        }
        if let Some(signature) = proof.proof_signature {
            record.proof_signature = Some(signature);
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}
