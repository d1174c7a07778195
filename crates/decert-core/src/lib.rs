//! DeCert Core - certificate lifecycle and chain reconciliation
//!
//! This crate contains the storage-agnostic core of DeCert: the certificate
//! model and its mint state machine, the store and chain-service seams, the
//! mint coordinator, and the read-only verification facade.

pub mod canonical;
pub mod certificate;
pub mod chain;
pub mod coordinator;
pub mod error;
pub mod memory;
pub mod store;
pub mod verify;

pub use certificate::{Certificate, CertificateDraft, MintStatus, ValidatedDraft};
pub use chain::{
    ChainError, ChainMetadata, ChainService, ConfirmedMint, PreparedTransfer, SubmittedTransfer,
};
pub use coordinator::{IssuerIdentity, MintCoordinator, PreparedMint};
pub use error::{Error, MintPhase};
pub use memory::MemoryStore;
pub use store::{CertificateStore, ChainProof};
pub use verify::VerificationService;
