use std::fmt;

use inquire::validator::{ErrorMessage, Validation};
use inquire::{Confirm, InquireError, Select, Text};

use gridpay_core::api::ApiError;
use gridpay_core::models::to_base_units;
use gridpay_core::utils::{parse_amount, validate_address, validate_email, validate_otp, ValidationError};
use gridpay_core::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Login,
    Balance,
    TransferUsdc,
    TransferSol,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::Login,
        MenuChoice::Balance,
        MenuChoice::TransferUsdc,
        MenuChoice::TransferSol,
        MenuChoice::Exit,
    ];
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuChoice::Login => "Login / Register",
            MenuChoice::Balance => "Check balance",
            MenuChoice::TransferUsdc => "Transfer USDC",
            MenuChoice::TransferSol => "Transfer SOL",
            MenuChoice::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Esc or Ctrl-C inside a prompt
pub fn is_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Turn a core validation result into an inquire verdict
fn verdict<T>(result: Result<T, ValidationError>) -> Validation {
    match result {
        Ok(_) => Validation::Valid,
        Err(e) => Validation::Invalid(ErrorMessage::Custom(e.to_string())),
    }
}

/// Amount accepted for `token`: positive, within its limit, at least one base unit
pub fn check_amount(token: Token, input: &str) -> Result<(), ValidationError> {
    let amount = parse_amount(input, token.max_amount())?;
    match to_base_units(amount, token.decimals()) {
        Some(0) | None => Err(ValidationError::BelowSmallestUnit),
        Some(_) => Ok(()),
    }
}

pub fn menu() -> Result<MenuChoice, InquireError> {
    Select::new("What would you like to do?", MenuChoice::ALL.to_vec())
        .with_page_size(MenuChoice::ALL.len())
        .prompt()
}

pub fn email() -> Result<String, InquireError> {
    Text::new("Email:")
        .with_validator(|input: &str| Ok(verdict(validate_email(input))))
        .prompt()
        .map(|s| s.trim().to_string())
}

pub fn otp(email: &str) -> Result<String, InquireError> {
    Text::new("Verification code:")
        .with_help_message(&format!("Sent to {}", email))
        .with_validator(|input: &str| Ok(verdict(validate_otp(input))))
        .prompt()
        .map(|s| s.trim().to_string())
}

pub fn recipient() -> Result<String, InquireError> {
    Text::new("Recipient address:")
        .with_validator(|input: &str| Ok(verdict(validate_address(input))))
        .prompt()
        .map(|s| s.trim().to_string())
}

pub fn amount(token: Token) -> Result<String, InquireError> {
    let message = format!("Amount ({}):", token);
    let help = format!("Up to {}", token.max_amount());
    Text::new(&message)
        .with_help_message(&help)
        .with_validator(move |input: &str| Ok(verdict(check_amount(token, input))))
        .prompt()
        .map(|s| s.trim().to_string())
}

/// Ask whether to continue with a code after an inconclusive login start
pub fn continue_uncertain(error: &ApiError) -> Result<bool, InquireError> {
    let message = format!(
        "Could not confirm the login request ({}). Enter a code you already received?",
        error
    );
    Confirm::new(&message).with_default(false).prompt()
}
