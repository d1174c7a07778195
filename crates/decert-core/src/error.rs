//! Error taxonomy for the certificate core.

use uuid::Uuid;

use crate::certificate::MintStatus;
use crate::chain::ChainError;

/// Phase of the mint protocol during which a chain call failed.
///
/// Carried on [`Error::Chain`] so that failed mints can be reconciled
/// manually; no compensating transaction exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintPhase {
    /// Preparing the issuer-side transfer.
    Prepare,
    /// Submitting the countersigned payload.
    Complete,
    /// Single-phase mint.
    Direct,
}

impl std::fmt::Display for MintPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MintPhase::Prepare => "prepare",
            MintPhase::Complete => "complete",
            MintPhase::Direct => "direct",
        };
        write!(f, "{}", name)
    }
}

/// Application error type for the certificate core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input field is missing or empty. Carries the wire-format
    /// field name.
    #[error("Missing required field: {0}")]
    Validation(String),

    /// No certificate exists with the given id.
    #[error("Certificate not found: {0}")]
    NotFound(Uuid),

    /// The operation is not valid in the certificate's current lifecycle
    /// state.
    #[error("Certificate {id} is {actual}, expected {expected}")]
    InvalidState {
        id: Uuid,
        expected: MintStatus,
        actual: MintStatus,
    },

    /// Attempted overwrite of a write-once proof field.
    #[error("Field {0} is already set and cannot be overwritten")]
    ImmutableField(&'static str),

    /// A chain service call failed. The certificate record is unchanged.
    #[error("Chain service failed during {phase} for certificate {id}: {source}")]
    Chain {
        id: Uuid,
        phase: MintPhase,
        #[source]
        source: ChainError,
    },

    /// Serializing chain metadata failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store failed before any write took effect.
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = Error::Validation("title".to_string());
        assert_eq!(err.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_invalid_state_message() {
        let id = Uuid::nil();
        let err = Error::InvalidState {
            id,
            expected: MintStatus::Unminted,
            actual: MintStatus::Minted,
        };
        assert_eq!(
            err.to_string(),
            format!("Certificate {} is Minted, expected Unminted", id)
        );
    }

    #[test]
    fn test_chain_error_carries_id_and_phase() {
        let id = Uuid::nil();
        let err = Error::Chain {
            id,
            phase: MintPhase::Prepare,
            source: ChainError::Unavailable("connection refused".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("prepare"));
        assert!(message.contains(&id.to_string()));
    }

    #[test]
    fn test_mint_phase_display() {
        assert_eq!(MintPhase::Prepare.to_string(), "prepare");
        assert_eq!(MintPhase::Complete.to_string(), "complete");
        assert_eq!(MintPhase::Direct.to_string(), "direct");
    }
}
