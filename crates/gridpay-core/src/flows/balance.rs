use tracing::debug;

use super::{EventSink, FlowEvent};
use crate::api::{ApiError, GridApi};
use crate::auth::SessionContext;
use crate::config::Environment;
use crate::error::FlowError;
use crate::models::AccountBalances;
use crate::utils::validate_address;

#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    Balances(AccountBalances),
    /// Grid answered but reported a failure
    Unavailable(String),
}

/// Fetch and report the balances of the logged-in account.
///
/// A failure reported by Grid in its response is an `Unavailable` outcome,
/// not an error. Empty balances are reported as such.
pub async fn check_balance<A: GridApi>(
    api: &A,
    ctx: &SessionContext,
    environment: Environment,
    events: &dyn EventSink,
) -> Result<BalanceOutcome, FlowError> {
    let session = ctx.require_session()?;
    let address = session.address().ok_or(FlowError::MissingAccountAddress)?;
    // The address is interpolated into the request path
    let address = validate_address(address)?.to_string();

    events.emit(FlowEvent::FetchingBalances {
        address: address.clone(),
    });
    let balances = match api.get_account_balances(&address).await {
        Ok(balances) => balances,
        Err(ApiError::Remote(reason)) => {
            debug!(%reason, "Balances unavailable");
            events.emit(FlowEvent::BalancesUnavailable {
                reason: reason.clone(),
            });
            return Ok(BalanceOutcome::Unavailable(reason));
        }
        Err(e) => return Err(e.into()),
    };
    debug!(tokens = balances.tokens.len(), native = ?balances.native_sol, "Balances fetched");

    if balances.is_empty() {
        events.emit(FlowEvent::NoBalances);
        return Ok(BalanceOutcome::Balances(balances));
    }

    for token in &balances.tokens {
        events.emit(FlowEvent::TokenBalance {
            label: token.label().to_string(),
            amount: token.display_amount(),
        });
    }
    if let Some(usdc) = balances.usdc(environment.usdc_mint()) {
        events.emit(FlowEvent::UsdcBalance {
            amount: usdc.display_amount(),
        });
    }
    if let Some(sol) = balances.native_sol {
        events.emit(FlowEvent::NativeBalance { sol });
    }

    Ok(BalanceOutcome::Balances(balances))
}
