//! Certificate model and mint lifecycle state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Required draft fields, in the order they are validated.
///
/// The order is fixed so that validation errors are deterministic: when
/// several fields are missing, the first one in this list is reported.
const REQUIRED_TEXT_FIELDS: [&str; 3] = ["holderName", "holderEmail", "title"];

/// Derived mint lifecycle state of a certificate.
///
/// The state is never stored; it is computed from the two write-once proof
/// fields. Transitions only move forward: `Unminted` -> `PartiallyMinted`
/// -> `Minted` in the two-phase flow, or `Unminted` -> `Minted` directly
/// in the single-phase flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MintStatus {
    /// No chain proof attached yet.
    Unminted,
    /// An issuer-side transaction was prepared but not yet completed.
    PartiallyMinted,
    /// Chain proof is complete.
    Minted,
}

impl std::fmt::Display for MintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MintStatus::Unminted => "Unminted",
            MintStatus::PartiallyMinted => "PartiallyMinted",
            MintStatus::Minted => "Minted",
        };
        write!(f, "{}", name)
    }
}

/// A certificate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Unique identifier, assigned at creation and never reused.
    pub id: Uuid,
    /// Full name of the certificate holder.
    pub holder_name: String,
    /// Contact email of the holder.
    pub holder_email: String,
    /// Certificate title (course, award, credential).
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Date the certificate was issued for.
    pub issue_date: NaiveDate,
    /// Chain identity expected to hold the proof. Required before minting.
    pub recipient_address: Option<String>,
    /// Chain identity of the issuing party, when one was named at creation.
    pub issuer_address: Option<String>,
    /// Chain object identifier. Write-once; set when a mint is prepared
    /// or confirmed.
    pub mint_reference: Option<String>,
    /// Chain transaction reference. Write-once; set when the mint is
    /// confirmed.
    pub proof_signature: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    /// Derives the mint lifecycle state from the proof fields.
    ///
    /// A present proof signature is terminal: the status never moves
    /// backward even if a store was populated out of band.
    pub fn status(&self) -> MintStatus {
        match (&self.mint_reference, &self.proof_signature) {
            (_, Some(_)) => MintStatus::Minted,
            (Some(_), None) => MintStatus::PartiallyMinted,
            (None, None) => MintStatus::Unminted,
        }
    }

    /// Returns true once chain proof is complete.
    pub fn is_minted(&self) -> bool {
        self.status() == MintStatus::Minted
    }
}

/// Creation input for a certificate.
///
/// All fields are optional at the type level so that validation, not
/// deserialization, reports what is missing. Field names in validation
/// errors match the wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDraft {
    pub holder_name: Option<String>,
    pub holder_email: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub recipient_address: Option<String>,
    pub issuer_address: Option<String>,
}

impl CertificateDraft {
    /// Checks required fields in a fixed order and returns the draft with
    /// the required fields proven present.
    ///
    /// A whitespace-only value counts as missing. An empty description is
    /// normalized to `None`.
    pub fn validate(self) -> Result<ValidatedDraft, Error> {
        let values = [&self.holder_name, &self.holder_email, &self.title];
        for (name, value) in REQUIRED_TEXT_FIELDS.iter().zip(values) {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                return Err(Error::Validation(name.to_string()));
            }
        }
        let issue_date = self
            .issue_date
            .ok_or_else(|| Error::Validation("issueDate".to_string()))?;

        Ok(ValidatedDraft {
            // Present and non-empty per the checks above.
            holder_name: self.holder_name.unwrap_or_default(),
            holder_email: self.holder_email.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            issue_date,
            recipient_address: self.recipient_address.filter(|a| !a.trim().is_empty()),
            issuer_address: self.issuer_address.filter(|a| !a.trim().is_empty()),
        })
    }
}

/// A draft whose required fields are known to be present.
#[derive(Debug, Clone)]
pub struct ValidatedDraft {
    pub holder_name: String,
    pub holder_email: String,
    pub title: String,
    pub description: Option<String>,
    pub issue_date: NaiveDate,
    pub recipient_address: Option<String>,
    pub issuer_address: Option<String>,
}

impl ValidatedDraft {
    /// Materializes a new `Unminted` certificate with a fresh id and
    /// matching creation timestamps.
    pub fn into_certificate(self) -> Certificate {
        let now = Utc::now();
        Certificate {
            id: Uuid::new_v4(),
            holder_name: self.holder_name,
            holder_email: self.holder_email,
            title: self.title,
            description: self.description,
            issue_date: self.issue_date,
            recipient_address: self.recipient_address,
            issuer_address: self.issuer_address,
            mint_reference: None,
            proof_signature: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> CertificateDraft {
        CertificateDraft {
            holder_name: Some("Ada Lovelace".to_string()),
            holder_email: Some("ada@example.com".to_string()),
            title: Some("Completion".to_string()),
            description: Some("Finished the course".to_string()),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            recipient_address: Some("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string()),
            issuer_address: None,
        }
    }

    #[test]
    fn test_validate_accepts_full_draft() {
        let validated = full_draft().validate().expect("draft should be valid");
        assert_eq!(validated.holder_name, "Ada Lovelace");
        assert_eq!(validated.title, "Completion");
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        // Everything missing: holderName is checked first.
        let err = CertificateDraft::default().validate().unwrap_err();
        assert!(matches!(err, Error::Validation(field) if field == "holderName"));
    }

    #[test]
    fn test_validate_field_order_is_deterministic() {
        // Email and title both missing: email wins, regardless of which
        // other fields are present.
        let mut draft = full_draft();
        draft.holder_email = None;
        draft.title = None;
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(field) if field == "holderEmail"));
    }

    #[test]
    fn test_validate_missing_title() {
        let mut draft = full_draft();
        draft.title = None;
        let err = draft.validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_validate_whitespace_counts_as_missing() {
        let mut draft = full_draft();
        draft.title = Some("   ".to_string());
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(field) if field == "title"));
    }

    #[test]
    fn test_validate_missing_issue_date() {
        let mut draft = full_draft();
        draft.issue_date = None;
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(field) if field == "issueDate"));
    }

    #[test]
    fn test_validate_normalizes_empty_description() {
        let mut draft = full_draft();
        draft.description = Some(String::new());
        let validated = draft.validate().unwrap();
        assert_eq!(validated.description, None);
    }

    #[test]
    fn test_into_certificate_starts_unminted() {
        let certificate = full_draft().validate().unwrap().into_certificate();
        assert_eq!(certificate.status(), MintStatus::Unminted);
        assert_eq!(certificate.mint_reference, None);
        assert_eq!(certificate.proof_signature, None);
        assert_eq!(certificate.created_at, certificate.updated_at);
    }

    #[test]
    fn test_status_derivation() {
        let mut certificate = full_draft().validate().unwrap().into_certificate();
        assert_eq!(certificate.status(), MintStatus::Unminted);

        certificate.mint_reference = Some("mint123".to_string());
        assert_eq!(certificate.status(), MintStatus::PartiallyMinted);

        certificate.proof_signature = Some("sig456".to_string());
        assert_eq!(certificate.status(), MintStatus::Minted);
        assert!(certificate.is_minted());
    }

    #[test]
    fn test_draft_deserializes_camel_case() {
        let json = r#"{
            "holderName": "Ada",
            "holderEmail": "a@example.com",
            "title": "Completion",
            "issueDate": "2024-01-01"
        }"#;

        let draft: CertificateDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.holder_name.as_deref(), Some("Ada"));
        assert_eq!(draft.issue_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(draft.recipient_address, None);
    }

    #[test]
    fn test_certificate_serializes_camel_case() {
        let certificate = full_draft().validate().unwrap().into_certificate();
        let json = serde_json::to_string(&certificate).unwrap();
        assert!(json.contains("\"holderName\":"));
        assert!(json.contains("\"issueDate\":\"2024-01-01\""));
        assert!(json.contains("\"mintReference\":null"));
        assert!(json.contains("\"proofSignature\":null"));
    }

    #[test]
    fn test_mint_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&MintStatus::PartiallyMinted).unwrap(),
            "\"partiallyMinted\""
        );
        assert_eq!(
            serde_json::to_string(&MintStatus::Unminted).unwrap(),
            "\"unminted\""
        );
    }
}
