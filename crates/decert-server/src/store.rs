//! PostgreSQL-backed certificate store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use decert_core::{Certificate, CertificateDraft, CertificateStore, ChainProof, Error};

/// Column list shared by every query so row decoding stays consistent.
const COLUMNS: &str = "id, holder_name, holder_email, title, description, issue_date, \
     recipient_address, issuer_address, mint_reference, proof_signature, created_at, updated_at";

/// Row shape of the `certificates` table.
#[derive(Debug, Clone, FromRow)]
struct CertificateRow {
    id: Uuid,
    holder_name: String,
    holder_email: String,
    title: String,
    description: Option<String>,
    issue_date: NaiveDate,
    recipient_address: Option<String>,
    issuer_address: Option<String>,
    mint_reference: Option<String>,
    proof_signature: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CertificateRow> for Certificate {
    fn from(row: CertificateRow) -> Self {
        Certificate {
            id: row.id,
            holder_name: row.holder_name,
            holder_email: row.holder_email,
            title: row.title,
            description: row.description,
            issue_date: row.issue_date,
            recipient_address: row.recipient_address,
            issuer_address: row.issuer_address,
            mint_reference: row.mint_reference,
            proof_signature: row.proof_signature,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Durable [`CertificateStore`] over a Postgres pool.
///
/// Write-once enforcement for the proof fields happens in the database:
/// `attach_chain_proof` is a single conditional `UPDATE`, so concurrent
/// attaches for one id are linearized by the row lock and at most one
/// writer per field wins.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(error: sqlx::Error) -> Error {
    Error::Storage(error.to_string())
}

/// Names the write-once field that caused a conditional update to match
/// zero rows.
fn immutable_field(existing: &Certificate, proof: &ChainProof) -> Error {
    if proof.mint_reference.is_some() && existing.mint_reference.is_some() {
        Error::ImmutableField("mintReference")
    } else {
        Error::ImmutableField("proofSignature")
    }
}

#[async_trait]
impl CertificateStore for PgStore {
    async fn create(&self, draft: CertificateDraft) -> Result<Certificate, Error> {
        let certificate = draft.validate()?.into_certificate();

        let row = sqlx::query_as::<_, CertificateRow>(&format!(
            r#"
            INSERT INTO certificates
                (id, holder_name, holder_email, title, description, issue_date,
                 recipient_address, issuer_address, mint_reference, proof_signature,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(certificate.id)
        .bind(&certificate.holder_name)
        .bind(&certificate.holder_email)
        .bind(&certificate.title)
        .bind(&certificate.description)
        .bind(certificate.issue_date)
        .bind(&certificate.recipient_address)
        .bind(&certificate.issuer_address)
        .bind(&certificate.mint_reference)
        .bind(&certificate.proof_signature)
        .bind(certificate.created_at)
        .bind(certificate.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Certificate, Error> {
        let row = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {COLUMNS} FROM certificates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(Into::into).ok_or(Error::NotFound(id))
    }

    async fn list_by_recipient(&self, recipient: &str) -> Result<Vec<Certificate>, Error> {
        let rows = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {COLUMNS} FROM certificates WHERE recipient_address = $1 ORDER BY created_at DESC"
        ))
        .bind(recipient)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Certificate>, Error> {
        let rows = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {COLUMNS} FROM certificates ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn attach_chain_proof(&self, id: Uuid, proof: ChainProof) -> Result<Certificate, Error> {
        if proof.is_empty() {
            return Err(Error::Validation("chainProof".to_string()));
        }

        // The guards make this a no-op instead of an overwrite when a
        // supplied field is already set; zero rows is then disambiguated
        // into NotFound vs ImmutableField below.
        let updated = sqlx::query_as::<_, CertificateRow>(&format!(
            r#"
            UPDATE certificates
            SET mint_reference = COALESCE(mint_reference, $2),
                proof_signature = COALESCE(proof_signature, $3),
                updated_at = $4
            WHERE id = $1
              AND ($2::text IS NULL OR mint_reference IS NULL)
              AND ($3::text IS NULL OR proof_signature IS NULL)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&proof.mint_reference)
        .bind(&proof.proof_signature)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match updated {
            Some(row) => Ok(row.into()),
            None => {
                let existing = self.get_by_id(id).await?;
                Err(immutable_field(&existing, &proof))
            }
        }
    }
}
