//! User-facing procedures.
//!
//! Each flow checks its preconditions and validates input before the first
//! network call, talks to the Grid API (and the Solana RPC for SOL), and
//! reports progress as `FlowEvent`s. Prompting is the caller's job.

pub mod auth;
pub mod balance;
pub mod events;
pub mod sol;
pub mod usdc;

#[cfg(test)]
pub(crate) mod testing;

use serde_json::Value;
use tracing::{debug, info};

use crate::api::SubmitResult;
use crate::config::Environment;
use crate::models::Token;
use crate::utils::explorer_url;

pub use auth::{start_auth, verify_otp, AuthPath, AuthStart, PendingAuth};
pub use balance::{check_balance, BalanceOutcome};
pub use events::{EventLog, EventSink, FlowEvent};
pub use sol::transfer_sol;
pub use usdc::transfer_usdc;

/// How a submitted transfer ended
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Submitted {
        signature: String,
        explorer_url: String,
    },
    /// The submission returned, but without a recognizable signature
    UnexpectedResponse(Value),
}

fn submission_outcome(
    token: Token,
    result: SubmitResult,
    environment: Environment,
    events: &dyn EventSink,
) -> TransferOutcome {
    match result.signature {
        Some(signature) => {
            let explorer_url = explorer_url(&signature, environment.cluster());
            info!(%token, %signature, "Transfer submitted");
            events.emit(FlowEvent::TransferSubmitted {
                token,
                signature: signature.clone(),
                explorer_url: explorer_url.clone(),
            });
            TransferOutcome::Submitted {
                signature,
                explorer_url,
            }
        }
        None => {
            debug!(%token, "Submission response carried no signature");
            events.emit(FlowEvent::UnexpectedResponse {
                raw: result.raw.clone(),
            });
            TransferOutcome::UnexpectedResponse(result.raw)
        }
    }
}
