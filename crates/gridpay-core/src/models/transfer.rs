use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

use crate::utils::{parse_amount, validate_address, ValidationError};

/// Largest USDC amount accepted for a single transfer
const MAX_USDC_AMOUNT: i64 = 1_000_000;

/// Largest SOL amount accepted for a single transfer
const MAX_SOL_AMOUNT: i64 = 10_000;

/// Tokens that can be transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Usdc,
    Sol,
}

impl Token {
    pub fn symbol(self) -> &'static str {
        match self {
            Token::Usdc => "USDC",
            Token::Sol => "SOL",
        }
    }

    /// Decimal exponent between display units and base units
    pub fn decimals(self) -> u32 {
        match self {
            Token::Usdc => 6,
            Token::Sol => 9,
        }
    }

    pub fn max_amount(self) -> Decimal {
        match self {
            Token::Usdc => Decimal::from(MAX_USDC_AMOUNT),
            Token::Sol => Decimal::from(MAX_SOL_AMOUNT),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Convert a display amount to integer base units, truncating any excess
/// precision: `floor(amount * 10^decimals)`.
///
/// Returns `None` for negative amounts or when the result does not fit in a `u64`.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Option<u64> {
    let scale = Decimal::from(10u64.checked_pow(decimals)?);
    amount.checked_mul(scale)?.floor().to_u64()
}

/// A validated transfer: recipient parsed, amount positive and within the token's limit.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub token: Token,
    pub recipient: Pubkey,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(token: Token, recipient: &str, amount: &str) -> Result<Self, ValidationError> {
        let recipient = validate_address(recipient)?;
        let amount = parse_amount(amount, token.max_amount())?;
        let request = Self {
            token,
            recipient,
            amount,
        };
        // Reject amounts that truncate to nothing
        request.base_units()?;
        Ok(request)
    }

    /// Amount in the token's base units (micro-USDC or lamports)
    pub fn base_units(&self) -> Result<u64, ValidationError> {
        match to_base_units(self.amount, self.token.decimals()) {
            Some(0) | None => Err(ValidationError::BelowSmallestUnit),
            Some(units) => Ok(units),
        }
    }
}
