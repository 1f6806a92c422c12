//! USDC transfer through a Grid payment intent.

use tracing::{debug, info};

use super::{submission_outcome, EventSink, FlowEvent, TransferOutcome};
use crate::api::{GridApi, PaymentIntentRequest};
use crate::auth::SessionContext;
use crate::config::Environment;
use crate::error::FlowError;
use crate::models::{Token, TransferRequest};
use crate::utils::validate_address;

/// Send `amount` USDC from the logged-in smart account to `recipient`.
///
/// Input is validated before any network call. Grid builds the transaction
/// from the payment intent; it is signed locally with the session key and
/// submitted back to Grid.
pub async fn transfer_usdc<A: GridApi>(
    api: &A,
    ctx: &SessionContext,
    environment: Environment,
    recipient: &str,
    amount: &str,
    events: &dyn EventSink,
) -> Result<TransferOutcome, FlowError> {
    let (session, secrets) = ctx.require_signer()?;
    let source = session.address().ok_or(FlowError::MissingAccountAddress)?;
    validate_address(source)?;
    let signing_context = session
        .signing_context()
        .ok_or(FlowError::MissingSigningContext)?;

    let request = TransferRequest::new(Token::Usdc, recipient, amount)?;
    let base_units = request.base_units()?;
    let recipient = request.recipient.to_string();
    events.emit(FlowEvent::TransferRequested {
        token: Token::Usdc,
        recipient: recipient.clone(),
        amount: request.amount,
        base_units,
    });

    let intent_request =
        PaymentIntentRequest::usdc_transfer(source, &recipient, base_units, session.user_id.clone());
    let intent = api.create_payment_intent(source, &intent_request).await?;
    debug!(id = ?intent.id, "Payment intent created");
    events.emit(FlowEvent::PaymentIntentCreated {
        id: intent.id.clone(),
    });
    let payload = intent
        .payload
        .ok_or(FlowError::MissingPayload("payment intent"))?;

    events.emit(FlowEvent::Signing);
    let signed = api.sign(secrets, signing_context, &payload)?;

    events.emit(FlowEvent::Submitting);
    let result = api.send(source, &signed).await?;
    info!(amount = %request.amount, %recipient, "USDC transfer sent");

    Ok(submission_outcome(Token::Usdc, result, environment, events))
}
