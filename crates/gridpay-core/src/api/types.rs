//! Grid API request and response types.
//!
//! Responses are normalized here: the API wraps most payloads in a
//! `{success, data, error}` envelope and has used several names for the same
//! fields over time. Code outside this module only sees the normalized types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;
use crate::models::balance::{first_present, first_str};

/// Minimal user context supplied when completing authentication.
///
/// `signers` is left unset so the Grid API populates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<String>>,
}

impl UserContext {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            signers: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InitAuthRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateAccountRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct KmsProviderConfig {
    pub encryption_public_key: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    #[serde(flatten)]
    pub user: &'a UserContext,
    pub otp_code: &'a str,
    pub kms_provider_config: KmsProviderConfig,
}

/// Settlement mechanism for one side of a payment intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRail {
    SmartAccount,
    Solana,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentEndpoint {
    pub address: String,
    pub currency: String,
    pub payment_rail: PaymentRail,
}

/// Request body for creating a payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentRequest {
    /// Amount in base units, as a decimal string
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_user_id: Option<String>,
    pub source: PaymentEndpoint,
    pub destination: PaymentEndpoint,
}

impl PaymentIntentRequest {
    /// USDC transfer between smart accounts, settled on the smart-account rail on both sides.
    pub fn usdc_transfer(
        source: &str,
        destination: &str,
        base_units: u64,
        grid_user_id: Option<String>,
    ) -> Self {
        let endpoint = |address: &str| PaymentEndpoint {
            address: address.to_string(),
            currency: "usdc".to_string(),
            payment_rail: PaymentRail::SmartAccount,
        };
        Self {
            amount: base_units.to_string(),
            grid_user_id,
            source: endpoint(source),
            destination: endpoint(destination),
        }
    }
}

/// Request body for preparing an arbitrary transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbitraryTransactionRequest {
    /// Base64 serialized, unsigned transaction
    pub transaction: String,
}

/// A signable transaction payload. Opaque beyond its base64 transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub transaction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_payloads: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transaction_signers: Vec<String>,
}

impl TransactionPayload {
    /// Find the transaction payload in a response, under any of its known names.
    pub fn extract(data: &Value) -> Option<Self> {
        let candidate = first_present(
            data,
            &["transaction_payload", "transactionPayload", "payload", "prepared_transaction"],
        )
        .unwrap_or(data);
        match candidate {
            Value::Object(_) if candidate.get("transaction").and_then(Value::as_str).is_some() => {
                serde_json::from_value(candidate.clone()).ok()
            }
            // A bare base64 string
            Value::String(s) if !s.is_empty() && !std::ptr::eq(candidate, data) => Some(Self {
                transaction: s.clone(),
                kms_payloads: None,
                transaction_signers: Vec::new(),
            }),
            _ => None,
        }
    }
}

/// A created payment intent
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: Option<String>,
    pub payload: Option<TransactionPayload>,
    pub raw: Value,
}

impl PaymentIntent {
    pub fn from_value(data: Value) -> Self {
        Self {
            id: first_str(&data, &["id", "payment_intent_id", "paymentIntentId"]).map(String::from),
            payload: TransactionPayload::extract(&data),
            raw: data,
        }
    }
}

/// Result of submitting a signed transaction
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    pub signature: Option<String>,
    pub raw: Value,
}

impl SubmitResult {
    pub fn from_value(raw: Value) -> Self {
        Self {
            signature: extract_signature(&raw),
            raw,
        }
    }
}

/// Find the transaction signature in a submission response:
/// `transaction_signature`, `signature`, or the same under `data`.
pub fn extract_signature(raw: &Value) -> Option<String> {
    const KEYS: &[&str] = &["transaction_signature", "signature"];
    first_str(raw, KEYS)
        .or_else(|| raw.get("data").and_then(|data| first_str(data, KEYS)))
        .map(String::from)
}

/// Unwrap the `{success, data, error}` envelope.
///
/// `success: false` becomes `ApiError::Remote`. Bodies without an envelope
/// pass through unchanged.
pub(crate) fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = ApiError::message_from_value(&body)
            .unwrap_or_else(|| "request was not successful".to_string());
        return Err(ApiError::Remote(message));
    }
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            Ok(map.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}
