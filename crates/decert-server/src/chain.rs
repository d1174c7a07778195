//! HTTP client for the external chain gateway.
//!
//! The gateway is the black box that owns keys, fee policy and the token
//! program. This client only moves JSON across the wire and translates
//! transport failures into [`ChainError`]; it never touches the store.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use decert_core::{
    ChainError, ChainMetadata, ChainService, ConfirmedMint, PreparedTransfer, SubmittedTransfer,
};

/// Chain gateway client configuration, injected at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway, e.g. `http://127.0.0.1:9040`.
    pub base_url: String,
}

/// JSON client for the chain gateway.
pub struct GatewayChainService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest<'a> {
    issuer: &'a str,
    recipient: &'a str,
    metadata: &'a ChainMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    payload: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrepareResponse {
    reference: String,
    payload: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    proof_signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintResponse {
    reference: String,
    proof_signature: String,
}

impl GatewayChainService {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POSTs a JSON body and decodes a JSON response. Transport failures
    /// become `Unavailable`; non-2xx responses are passed through
    /// `reject` so each call site keeps its own error flavor.
    async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        reject: fn(String) -> ChainError,
    ) -> Result<R, ChainError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ChainError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(reject(message));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ChainError::Rejected(format!("invalid gateway response: {}", e)))
    }
}

#[async_trait]
impl ChainService for GatewayChainService {
    async fn prepare_transfer(
        &self,
        issuer: &str,
        recipient: &str,
        metadata: &ChainMetadata,
    ) -> Result<PreparedTransfer, ChainError> {
        let request = TransferRequest {
            issuer,
            recipient,
            metadata,
        };
        let response: PrepareResponse = self
            .post_json("/v1/transfers/prepare", &request, ChainError::Rejected)
            .await?;
        Ok(PreparedTransfer {
            reference: response.reference,
            payload: response.payload,
        })
    }

    async fn submit_signed(&self, payload: &str) -> Result<SubmittedTransfer, ChainError> {
        // The gateway expects a base64-serialized signed transaction;
        // catch garbage here instead of burning a gateway round trip.
        if BASE64_STANDARD.decode(payload).is_err() {
            return Err(ChainError::Submission(
                "signed payload is not valid base64".to_string(),
            ));
        }

        let request = SubmitRequest { payload };
        let response: SubmitResponse = self
            .post_json("/v1/transfers/submit", &request, ChainError::Submission)
            .await?;
        Ok(SubmittedTransfer {
            proof_signature: response.proof_signature,
        })
    }

    async fn mint_and_confirm(
        &self,
        issuer: &str,
        recipient: &str,
        metadata: &ChainMetadata,
    ) -> Result<ConfirmedMint, ChainError> {
        let request = TransferRequest {
            issuer,
            recipient,
            metadata,
        };
        let response: MintResponse = self
            .post_json("/v1/mints", &request, ChainError::Rejected)
            .await?;
        Ok(ConfirmedMint {
            reference: response.reference,
            proof_signature: response.proof_signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: &str) -> GatewayChainService {
        GatewayChainService::new(GatewayConfig {
            base_url: base_url.to_string(),
        })
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let gateway = service("http://gateway:9040/");
        assert_eq!(
            gateway.url("/v1/transfers/prepare"),
            "http://gateway:9040/v1/transfers/prepare"
        );
    }

    #[test]
    fn test_transfer_request_serializes_camel_case() {
        let metadata = ChainMetadata {
            certificate_id: uuid::Uuid::nil(),
            title: "Completion".to_string(),
            holder_name: "Ada".to_string(),
            issue_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            digest: "d".repeat(64),
        };
        let request = TransferRequest {
            issuer: "issuer-system",
            recipient: "wallet-a",
            metadata: &metadata,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"issuer\":\"issuer-system\""));
        assert!(json.contains("\"certificateId\":"));
        assert!(json.contains("\"holderName\":\"Ada\""));
    }

    #[test]
    fn test_prepare_response_deserializes() {
        let json = r#"{"reference": "mint123", "payload": "AQID"}"#;
        let response: PrepareResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.reference, "mint123");
        assert_eq!(response.payload, "AQID");
    }

    #[test]
    fn test_submit_response_deserializes_camel_case() {
        let json = r#"{"proofSignature": "sig456"}"#;
        let response: SubmitResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.proof_signature, "sig456");
    }

    #[tokio::test]
    async fn test_submit_rejects_non_base64_payload_without_network() {
        let gateway = service("http://gateway.invalid");
        let err = gateway.submit_signed("not base64!!!").await.unwrap_err();
        assert!(matches!(err, ChainError::Submission(_)));
    }
}
