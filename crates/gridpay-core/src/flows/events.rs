//! Flow events.
//!
//! Each flow step emits exactly one `FlowEvent`; a front-end `EventSink`
//! decides how (and whether) to show it.

use std::sync::Mutex;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    // Authentication
    AuthStarted { email: String },
    RegisteringAccount { email: String },
    RetryingLogin { email: String },
    OtpSent { email: String, new_user: bool },
    AuthUncertain { reason: String },
    SessionKeyGenerated { public_key: String },
    Authenticated { address: Option<String>, user_id: Option<String> },

    // Balances
    FetchingBalances { address: String },
    BalancesUnavailable { reason: String },
    NoBalances,
    TokenBalance { label: String, amount: Option<Decimal> },
    UsdcBalance { amount: Option<Decimal> },
    NativeBalance { sol: Decimal },

    // Transfers
    TransferRequested {
        token: Token,
        recipient: String,
        amount: Decimal,
        base_units: u64,
    },
    PaymentIntentCreated { id: Option<String> },
    TransactionBuilt { fee_payer: String, blockhash: String },
    TransactionPrepared,
    Signing,
    Submitting,
    TransferSubmitted {
        token: Token,
        signature: String,
        explorer_url: String,
    },
    UnexpectedResponse { raw: Value },
}

impl FlowEvent {
    /// Detail events are only shown in verbose mode
    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            FlowEvent::SessionKeyGenerated { .. }
                | FlowEvent::FetchingBalances { .. }
                | FlowEvent::PaymentIntentCreated { .. }
                | FlowEvent::TransactionBuilt { .. }
                | FlowEvent::TransactionPrepared
        )
    }
}

pub trait EventSink {
    fn emit(&self, event: FlowEvent);
}

/// Sink that keeps every event, in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<FlowEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FlowEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: FlowEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
