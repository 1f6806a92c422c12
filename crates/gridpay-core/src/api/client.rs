//! HTTP client for the Grid account API.
//!
//! Every request is authenticated with the environment's API key as a
//! bearer token and tagged with the `x-grid-environment` header.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::types::{
    unwrap_envelope, ArbitraryTransactionRequest, CreateAccountRequest, InitAuthRequest,
    KmsProviderConfig, PaymentIntent, PaymentIntentRequest, SubmitResult, TransactionPayload,
    UserContext, VerifyRequest,
};
use super::{ApiError, GridApi};
use crate::auth::{Session, SessionSecrets};
use crate::config::{Config, Environment};
use crate::models::AccountBalances;
use crate::utils::truncate_string;

// ============================================================================
// Constants
// ============================================================================

/// Path prefix of the v1 API on the Grid host
const API_PATH: &str = "/api/grid/v1";

/// Header selecting sandbox or production on the Grid side
const ENVIRONMENT_HEADER: &str = "x-grid-environment";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Longest response body echoed into debug logs
const MAX_LOGGED_BODY_LENGTH: usize = 400;

/// Grid API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct GridClient {
    client: Client,
    base_url: String,
    environment: Environment,
}

impl GridClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|e| ApiError::InvalidApiKey(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            ENVIRONMENT_HEADER,
            header::HeaderValue::from_static(config.environment.as_str()),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", config.base_url, API_PATH),
            environment: config.environment,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %truncate_string(&body, MAX_LOGGED_BODY_LENGTH), "Grid API request failed");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let text = response.text().await?;
        debug!(body = %truncate_string(&text, MAX_LOGGED_BODY_LENGTH), "Grid API response");
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("{}: {}", e, truncate_string(&text, 200)))
        })
    }

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }

    async fn verify(
        &self,
        path: &str,
        user: &UserContext,
        otp_code: &str,
        secrets: &SessionSecrets,
    ) -> Result<Session, ApiError> {
        let body = VerifyRequest {
            user,
            otp_code,
            kms_provider_config: KmsProviderConfig {
                encryption_public_key: secrets.public_key().to_string(),
            },
        };
        let data = unwrap_envelope(self.post(path, &body).await?)?;
        Ok(Session::from_response(data))
    }
}

impl GridApi for GridClient {
    async fn init_auth(&self, email: &str) -> Result<(), ApiError> {
        unwrap_envelope(self.post("/auth", &InitAuthRequest { email }).await?)?;
        Ok(())
    }

    async fn create_account(&self, email: &str) -> Result<(), ApiError> {
        let body = CreateAccountRequest {
            kind: "email",
            email,
        };
        unwrap_envelope(self.post("/accounts", &body).await?)?;
        Ok(())
    }

    async fn complete_auth(
        &self,
        user: &UserContext,
        otp_code: &str,
        secrets: &SessionSecrets,
    ) -> Result<Session, ApiError> {
        self.verify("/auth/verify", user, otp_code, secrets).await
    }

    async fn complete_auth_and_create_account(
        &self,
        user: &UserContext,
        otp_code: &str,
        secrets: &SessionSecrets,
    ) -> Result<Session, ApiError> {
        self.verify("/accounts/verify", user, otp_code, secrets).await
    }

    async fn get_account_balances(&self, address: &str) -> Result<AccountBalances, ApiError> {
        let data = unwrap_envelope(self.get(&format!("/accounts/{}/balances", address)).await?)?;
        Ok(AccountBalances::from_value(&data))
    }

    async fn create_payment_intent(
        &self,
        address: &str,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ApiError> {
        let path = format!("/accounts/{}/payment-intents", address);
        let data = unwrap_envelope(self.post(&path, request).await?)?;
        Ok(PaymentIntent::from_value(data))
    }

    async fn send(
        &self,
        address: &str,
        payload: &TransactionPayload,
    ) -> Result<SubmitResult, ApiError> {
        let path = format!("/accounts/{}/submit", address);
        let raw = self.post(&path, payload).await?;
        // Only checked for failure: the signature may sit at the top level or under `data`
        unwrap_envelope(raw.clone())?;
        Ok(SubmitResult::from_value(raw))
    }

    async fn prepare_arbitrary_transaction(
        &self,
        address: &str,
        request: &ArbitraryTransactionRequest,
    ) -> Result<Option<TransactionPayload>, ApiError> {
        let path = format!("/accounts/{}/transactions/prepare", address);
        let data = unwrap_envelope(self.post(&path, request).await?)?;
        Ok(TransactionPayload::extract(&data))
    }
}
