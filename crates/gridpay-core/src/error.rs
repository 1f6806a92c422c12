use thiserror::Error;

use crate::api::ApiError;
use crate::chain::ChainError;
use crate::utils::ValidationError;

/// Errors surfaced at the boundary of a flow.
///
/// Every variant is recoverable from the menu's point of view: the flow is
/// abandoned, the error is shown, and the user is back at the menu.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Please log in first")]
    NotAuthenticated,

    #[error("No account address found in session")]
    MissingAccountAddress,

    #[error("No transaction payload returned from {0}")]
    MissingPayload(&'static str),

    #[error("Session has no signing context - please log in again")]
    MissingSigningContext,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
