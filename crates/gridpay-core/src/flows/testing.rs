//! In-memory fakes of the Grid API and the Solana RPC for flow tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::{json, Value};
use solana_sdk::hash::Hash;

use crate::api::{
    ApiError, ArbitraryTransactionRequest, GridApi, PaymentIntent, PaymentIntentRequest,
    SubmitResult, TransactionPayload, UserContext,
};
use crate::auth::{Session, SessionContext, SessionSecrets};
use crate::chain::{ChainError, ChainRpc};
use crate::models::AccountBalances;

pub const ADDR1: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
pub const ADDR2: &str = "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU";

#[derive(Default)]
pub struct FakeGrid {
    calls: Mutex<Vec<String>>,
    pub init_auth_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub create_account_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub complete_result: Mutex<Option<Result<Value, ApiError>>>,
    pub users: Mutex<Vec<UserContext>>,
    pub balances_result: Mutex<Option<Result<AccountBalances, ApiError>>>,
    pub intent: Mutex<Option<PaymentIntent>>,
    pub payment_requests: Mutex<Vec<(String, PaymentIntentRequest)>>,
    pub prepared: Mutex<Option<TransactionPayload>>,
    pub prepare_requests: Mutex<Vec<(String, ArbitraryTransactionRequest)>>,
    pub signing_contexts: Mutex<Vec<Value>>,
    pub submit_response: Mutex<Value>,
    pub sent: Mutex<Vec<(String, TransactionPayload)>>,
}

impl FakeGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn payload(transaction: &str) -> TransactionPayload {
        TransactionPayload {
            transaction: transaction.to_string(),
            kms_payloads: None,
            transaction_signers: Vec::new(),
        }
    }

    fn complete(&self, call: &str, user: &UserContext) -> Result<Session, ApiError> {
        self.record(call);
        self.users.lock().unwrap().push(user.clone());
        let result = self
            .complete_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(json!({ "address": ADDR1 })));
        result.map(Session::from_response)
    }
}

impl GridApi for FakeGrid {
    async fn init_auth(&self, _email: &str) -> Result<(), ApiError> {
        self.record("init_auth");
        self.init_auth_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn create_account(&self, _email: &str) -> Result<(), ApiError> {
        self.record("create_account");
        self.create_account_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn complete_auth(
        &self,
        user: &UserContext,
        _otp_code: &str,
        _secrets: &SessionSecrets,
    ) -> Result<Session, ApiError> {
        self.complete("complete_auth", user)
    }

    async fn complete_auth_and_create_account(
        &self,
        user: &UserContext,
        _otp_code: &str,
        _secrets: &SessionSecrets,
    ) -> Result<Session, ApiError> {
        self.complete("complete_auth_and_create_account", user)
    }

    fn generate_session_secrets(&self) -> SessionSecrets {
        self.record("generate_session_secrets");
        SessionSecrets::generate()
    }

    async fn get_account_balances(&self, _address: &str) -> Result<AccountBalances, ApiError> {
        self.record("get_account_balances");
        self.balances_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(AccountBalances::default()))
    }

    async fn create_payment_intent(
        &self,
        address: &str,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ApiError> {
        self.record("create_payment_intent");
        self.payment_requests
            .lock()
            .unwrap()
            .push((address.to_string(), request.clone()));
        Ok(self.intent.lock().unwrap().take().unwrap_or(PaymentIntent {
            id: None,
            payload: None,
            raw: Value::Null,
        }))
    }

    fn sign(
        &self,
        _secrets: &SessionSecrets,
        signing_context: &Value,
        payload: &TransactionPayload,
    ) -> Result<TransactionPayload, ApiError> {
        self.record("sign");
        self.signing_contexts.lock().unwrap().push(signing_context.clone());
        Ok(TransactionPayload {
            transaction: format!("signed:{}", payload.transaction),
            ..payload.clone()
        })
    }

    async fn send(
        &self,
        address: &str,
        payload: &TransactionPayload,
    ) -> Result<SubmitResult, ApiError> {
        self.record("send");
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), payload.clone()));
        Ok(SubmitResult::from_value(self.submit_response.lock().unwrap().clone()))
    }

    async fn prepare_arbitrary_transaction(
        &self,
        address: &str,
        request: &ArbitraryTransactionRequest,
    ) -> Result<Option<TransactionPayload>, ApiError> {
        self.record("prepare_arbitrary_transaction");
        self.prepare_requests
            .lock()
            .unwrap()
            .push((address.to_string(), request.clone()));
        Ok(self.prepared.lock().unwrap().take())
    }
}

pub struct FakeRpc {
    pub blockhash: Hash,
    calls: Mutex<usize>,
}

impl FakeRpc {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl ChainRpc for FakeRpc {
    async fn latest_blockhash(&self) -> Result<Hash, ChainError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.blockhash)
    }
}

/// A logged-in context for `address` with both signing contexts present
pub fn logged_in(address: &str) -> SessionContext {
    logged_in_as(json!({
        "address": address,
        "grid_user_id": "user-1",
        "session": { "provider": "privy", "token": "s" },
        "authentication": { "provider": "privy", "token": "a" }
    }))
}

/// A logged-in context built from a raw completion response
pub fn logged_in_as(raw: Value) -> SessionContext {
    let mut ctx = SessionContext::new();
    ctx.login(Session::from_response(raw), SessionSecrets::generate());
    ctx
}
