//! Grid API boundary.
//!
//! `GridApi` is the set of account-API operations the flows rely on.
//! `GridClient` implements it over HTTPS; session-key generation and
//! signing happen locally and are provided as default methods.
//!
//! Every response is normalized in `types` before it leaves this module.

pub mod client;
pub mod error;
pub mod types;

use std::future::Future;

use serde_json::Value;

use crate::auth::{Session, SessionSecrets, SigningError};
use crate::models::AccountBalances;

pub use client::GridClient;
pub use error::ApiError;
pub use types::{
    extract_signature, ArbitraryTransactionRequest, PaymentEndpoint, PaymentIntent,
    PaymentIntentRequest, PaymentRail, SubmitResult, TransactionPayload, UserContext,
};

pub trait GridApi: Send + Sync {
    /// Start email/OTP authentication for an existing account
    fn init_auth(&self, email: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Register a new account; sends an OTP like `init_auth`
    fn create_account(&self, email: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Complete authentication of an existing account
    fn complete_auth(
        &self,
        user: &UserContext,
        otp_code: &str,
        secrets: &SessionSecrets,
    ) -> impl Future<Output = Result<Session, ApiError>> + Send;

    /// Complete authentication of an account registered with `create_account`
    fn complete_auth_and_create_account(
        &self,
        user: &UserContext,
        otp_code: &str,
        secrets: &SessionSecrets,
    ) -> impl Future<Output = Result<Session, ApiError>> + Send;

    fn generate_session_secrets(&self) -> SessionSecrets {
        SessionSecrets::generate()
    }

    fn get_account_balances(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<AccountBalances, ApiError>> + Send;

    fn create_payment_intent(
        &self,
        address: &str,
        request: &PaymentIntentRequest,
    ) -> impl Future<Output = Result<PaymentIntent, ApiError>> + Send;

    /// Sign a transaction payload with the session key.
    fn sign(
        &self,
        secrets: &SessionSecrets,
        signing_context: &Value,
        payload: &TransactionPayload,
    ) -> Result<TransactionPayload, ApiError> {
        if signing_context.is_null() {
            return Err(SigningError::MissingContext.into());
        }
        Ok(secrets.sign_payload(payload)?)
    }

    /// Submit a signed payload on behalf of `address`
    fn send(
        &self,
        address: &str,
        payload: &TransactionPayload,
    ) -> impl Future<Output = Result<SubmitResult, ApiError>> + Send;

    /// Turn a caller-built transaction into a payload Grid can execute for
    /// the smart account. `None` when no payload came back.
    fn prepare_arbitrary_transaction(
        &self,
        address: &str,
        request: &ArbitraryTransactionRequest,
    ) -> impl Future<Output = Result<Option<TransactionPayload>, ApiError>> + Send;

    fn sign_and_send(
        &self,
        secrets: &SessionSecrets,
        signing_context: &Value,
        payload: &TransactionPayload,
        address: &str,
    ) -> impl Future<Output = Result<SubmitResult, ApiError>> + Send {
        async move {
            let signed = self.sign(secrets, signing_context, payload)?;
            self.send(address, &signed).await
        }
    }
}
