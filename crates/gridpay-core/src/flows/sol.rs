//! Native SOL transfer.
//!
//! The transfer instruction is built locally with the smart account as fee
//! payer and a finalized blockhash, then handed to Grid to be prepared for
//! execution by the smart account. The prepared payload is signed with the
//! session key and submitted in one step.

use tracing::{debug, info};

use super::{submission_outcome, EventSink, FlowEvent, TransferOutcome};
use crate::api::{ArbitraryTransactionRequest, GridApi};
use crate::auth::SessionContext;
use crate::chain::{build_native_transfer, encode_unsigned, ChainRpc};
use crate::config::Environment;
use crate::error::FlowError;
use crate::models::{Token, TransferRequest};
use crate::utils::validate_address;

pub async fn transfer_sol<A: GridApi, R: ChainRpc>(
    api: &A,
    rpc: &R,
    ctx: &SessionContext,
    environment: Environment,
    recipient: &str,
    amount: &str,
    events: &dyn EventSink,
) -> Result<TransferOutcome, FlowError> {
    let (session, secrets) = ctx.require_signer()?;
    let address = session.address().ok_or(FlowError::MissingAccountAddress)?;
    let fee_payer = validate_address(address)?;
    let context = session
        .authentication_context()
        .ok_or(FlowError::MissingSigningContext)?;

    let request = TransferRequest::new(Token::Sol, recipient, amount)?;
    let lamports = request.base_units()?;
    events.emit(FlowEvent::TransferRequested {
        token: Token::Sol,
        recipient: request.recipient.to_string(),
        amount: request.amount,
        base_units: lamports,
    });

    let blockhash = rpc.latest_blockhash().await?;
    let tx = build_native_transfer(&fee_payer, &request.recipient, lamports, blockhash);
    debug!(%blockhash, lamports, "Built native transfer");
    events.emit(FlowEvent::TransactionBuilt {
        fee_payer: fee_payer.to_string(),
        blockhash: blockhash.to_string(),
    });

    let prepare = ArbitraryTransactionRequest {
        transaction: encode_unsigned(&tx)?,
    };
    let payload = api
        .prepare_arbitrary_transaction(address, &prepare)
        .await?
        .ok_or(FlowError::MissingPayload("transaction preparation"))?;
    events.emit(FlowEvent::TransactionPrepared);

    events.emit(FlowEvent::Signing);
    let result = api.sign_and_send(secrets, context, &payload, address).await?;
    info!(amount = %request.amount, recipient = %request.recipient, "SOL transfer sent");

    Ok(submission_outcome(Token::Sol, result, environment, events))
}
