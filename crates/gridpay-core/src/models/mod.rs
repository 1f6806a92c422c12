//! Domain models.
//!
//! - `Token`, `TransferRequest`: validated transfer input and base-unit conversion
//! - `AccountBalances`, `TokenBalance`: balances normalized from the Grid API

pub mod balance;
pub mod transfer;

pub use balance::{AccountBalances, TokenBalance};
pub use transfer::{to_base_units, Token, TransferRequest};
