//! Read-only verification over the certificate store.

use uuid::Uuid;

use crate::certificate::Certificate;
use crate::error::Error;
use crate::store::CertificateStore;

/// Read-only projection over a [`CertificateStore`].
///
/// Holds the store privately and exposes only lookups, so verification
/// cannot be used to tamper with records.
pub struct VerificationService<S> {
    store: S,
}

impl<S: CertificateStore> VerificationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Looks up a certificate by id.
    pub async fn verify_by_id(&self, id: Uuid) -> Result<Certificate, Error> {
        self.store.get_by_id(id).await
    }

    /// Returns every certificate held by `recipient`; empty when none
    /// match.
    pub async fn verify_by_recipient(&self, recipient: &str) -> Result<Vec<Certificate>, Error> {
        self.store.list_by_recipient(recipient).await
    }
}
