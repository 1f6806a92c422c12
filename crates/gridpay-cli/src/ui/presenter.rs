//! Console rendering of flow events.
//!
//! Quiet mode prints what the user needs to follow a flow. Verbose mode
//! adds detail events, base-unit amounts, raw responses and error chains.

use gridpay_core::utils::{format_amount, short_address};
use gridpay_core::{EventSink, FlowEvent};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy)]
pub struct ConsolePresenter {
    verbose: bool,
}

impl ConsolePresenter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Text for an event, or `None` when it is not shown at this verbosity
    pub fn render(&self, event: &FlowEvent) -> Option<String> {
        if event.is_detail() && !self.verbose {
            return None;
        }
        let text = match event {
            FlowEvent::AuthStarted { email } => format!("Starting login for {}...", email),
            FlowEvent::RegisteringAccount { email } => {
                format!("No account found for {}, creating one...", email)
            }
            FlowEvent::RetryingLogin { .. } => "Account already exists, retrying login...".to_string(),
            FlowEvent::OtpSent { email, new_user } => {
                if *new_user {
                    format!("Account created. Verification code sent to {}", email)
                } else {
                    format!("Verification code sent to {}", email)
                }
            }
            FlowEvent::AuthUncertain { reason } => format!("Could not start login: {}", reason),
            FlowEvent::SessionKeyGenerated { public_key } => format!("Session key: {}", public_key),
            FlowEvent::Authenticated { address, user_id } => {
                let mut text = format!(
                    "Logged in. Account: {}",
                    address.as_deref().unwrap_or("unknown")
                );
                if self.verbose {
                    if let Some(id) = user_id {
                        text.push_str(&format!("\n  User ID: {}", id));
                    }
                }
                text
            }

            FlowEvent::FetchingBalances { address } => {
                format!("Fetching balances for {}", short_address(address))
            }
            FlowEvent::BalancesUnavailable { reason } => {
                format!("Could not fetch balances: {}", reason)
            }
            FlowEvent::NoBalances => "No balances found".to_string(),
            FlowEvent::TokenBalance { label, amount } => {
                format!("  {}: {}", label, amount_or_dash(*amount))
            }
            FlowEvent::UsdcBalance { amount } => format!("USDC balance: {}", amount_or_dash(*amount)),
            FlowEvent::NativeBalance { sol } => format!("SOL balance: {}", format_amount(*sol)),

            FlowEvent::TransferRequested {
                token,
                recipient,
                amount,
                base_units,
            } => {
                let mut text = format!("Sending {} {} to {}", format_amount(*amount), token, recipient);
                if self.verbose {
                    text.push_str(&format!(" ({} base units)", base_units));
                }
                text
            }
            FlowEvent::PaymentIntentCreated { id } => format!(
                "Payment intent created: {}",
                id.as_deref().unwrap_or("(no id)")
            ),
            FlowEvent::TransactionBuilt {
                fee_payer,
                blockhash,
            } => format!(
                "Transaction built (fee payer {}, blockhash {})",
                short_address(fee_payer),
                blockhash
            ),
            FlowEvent::TransactionPrepared => "Transaction prepared".to_string(),
            FlowEvent::Signing => "Signing...".to_string(),
            FlowEvent::Submitting => "Submitting...".to_string(),
            FlowEvent::TransferSubmitted {
                token,
                signature,
                explorer_url,
            } => format!(
                "{} transfer submitted\n  Signature: {}\n  Explorer:  {}",
                token, signature, explorer_url
            ),
            FlowEvent::UnexpectedResponse { raw } => {
                let mut text = "Transfer sent, but the response format was unexpected".to_string();
                if self.verbose {
                    let body = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
                    text.push_str(&format!("\n{}", body));
                }
                text
            }
        };
        Some(text)
    }

    /// Text for a failed flow.
    ///
    /// The root cause is always appended to a context message; verbose mode
    /// also lists every cause.
    pub fn render_error(&self, err: &anyhow::Error) -> String {
        let mut text = format!("Error: {}", err);
        let root = err.root_cause().to_string();
        if err.chain().count() > 1 && root != err.to_string() {
            text.push_str(&format!(": {}", root));
        }
        if self.verbose {
            for cause in err.chain().skip(1) {
                text.push_str(&format!("\n  caused by: {}", cause));
            }
        }
        text
    }

    pub fn error(&self, err: &anyhow::Error) {
        eprintln!("{}", self.render_error(err));
    }
}

impl EventSink for ConsolePresenter {
    fn emit(&self, event: FlowEvent) {
        if let Some(text) = self.render(&event) {
            println!("{}", text);
        }
    }
}

fn amount_or_dash(amount: Option<Decimal>) -> String {
    amount.map(format_amount).unwrap_or_else(|| "-".to_string())
}
