//! Client-side input validation.
//!
//! Everything here runs before a request is built, so invalid input never
//! reaches the network.

use std::str::FromStr;

use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid Solana address")]
    InvalidAddress,

    #[error("Amount must be a number")]
    NotANumber,

    #[error("Amount must be greater than 0")]
    NotPositive,

    #[error("Amount must not exceed {0}")]
    TooLarge(Decimal),

    #[error("Amount is smaller than the token's smallest unit")]
    BelowSmallestUnit,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Verification code must be digits only")]
    InvalidOtp,
}

/// Parse a base58 Solana address
pub fn validate_address(input: &str) -> Result<Pubkey, ValidationError> {
    Pubkey::from_str(input.trim()).map_err(|_| ValidationError::InvalidAddress)
}

/// Significant digits a `Decimal` always holds exactly
const MAX_EXACT_DIGITS: usize = 28;

/// Parse a positive decimal amount no larger than `max`.
///
/// Only plain `[+-]digits[.digits]` is accepted. Fraction digits beyond what
/// a `Decimal` holds exactly are dropped rather than rounded, so the result
/// is the input truncated toward zero and `floor(amount * 10^d)` is unchanged
/// for any token precision.
pub fn parse_amount(input: &str, max: Decimal) -> Result<Decimal, ValidationError> {
    let input = input.trim();
    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let well_formed = !(int_part.is_empty() && frac_part.is_empty())
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(ValidationError::NotANumber);
    }

    let is_nonzero = |digits: &str| digits.chars().any(|c| c != '0');
    if negative || !(is_nonzero(int_part) || is_nonzero(frac_part)) {
        return Err(ValidationError::NotPositive);
    }

    let int_digits = int_part.trim_start_matches('0');
    if int_digits.len() > MAX_EXACT_DIGITS {
        return Err(ValidationError::TooLarge(max));
    }
    let keep = frac_part.len().min(MAX_EXACT_DIGITS - int_digits.len());
    let (kept, dropped) = frac_part.split_at(keep);
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
    let exact = if kept.is_empty() {
        int_digits.to_string()
    } else {
        format!("{}.{}", int_digits, kept)
    };
    let amount = Decimal::from_str(&exact).map_err(|_| ValidationError::NotANumber)?;

    // Truncation only lowers the value, so an input equal to `max` after
    // truncation was above it
    if amount > max || (amount == max && is_nonzero(dropped)) {
        return Err(ValidationError::TooLarge(max));
    }
    Ok(amount)
}

/// Loose email shape check: `local@domain.tld`
pub fn validate_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim();
    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    let valid = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    if valid {
        Ok(email.to_string())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_otp(input: &str) -> Result<String, ValidationError> {
    let code = input.trim();
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(code.to_string())
    } else {
        Err(ValidationError::InvalidOtp)
    }
}
