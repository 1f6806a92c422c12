//! Account balances, normalized from the several shapes the Grid API has used.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Decimals assumed for a token that does not report any
const DEFAULT_TOKEN_DECIMALS: u32 = 6;

/// Lamports per SOL, as a decimal exponent
const SOL_DECIMALS: u32 = 9;

/// Look up the first present, non-null key of a JSON object
pub(crate) fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

/// Like `first_present`, but only for string values
pub(crate) fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Interpret a JSON string or number as a decimal
pub(crate) fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .ok(),
        Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        _ => None,
    }
}

/// A single token balance
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub symbol: Option<String>,
    pub mint: Option<String>,
    /// Raw amount in base units
    pub amount: Option<Decimal>,
    pub decimals: Option<u32>,
    /// Pre-computed human-readable amount, when the API supplies one
    pub amount_decimal: Option<Decimal>,
}

impl TokenBalance {
    pub fn from_value(value: &Value) -> Self {
        Self {
            symbol: first_str(value, &["symbol", "token_symbol", "tokenSymbol"]).map(String::from),
            mint: first_str(value, &["mint", "token_address", "tokenAddress", "address"])
                .map(String::from),
            amount: first_present(value, &["amount", "balance", "raw_amount"]).and_then(as_decimal),
            decimals: first_present(value, &["decimals"])
                .and_then(Value::as_u64)
                .and_then(|d| u32::try_from(d).ok()),
            amount_decimal: first_present(
                value,
                &["amount_decimal", "amountDecimal", "ui_amount", "uiAmount", "ui_amount_string"],
            )
            .and_then(as_decimal),
        }
    }

    /// Human-readable balance: the pre-computed decimal if present, else
    /// `amount / 10^decimals` with 6 decimals assumed when unspecified.
    pub fn display_amount(&self) -> Option<Decimal> {
        if let Some(amount) = self.amount_decimal {
            return Some(amount);
        }
        let raw = self.amount?;
        let decimals = self.decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS);
        let divisor = Decimal::from(10u64.checked_pow(decimals)?);
        raw.checked_div(divisor)
    }

    /// Label for display: symbol, else mint, else "Unknown"
    pub fn label(&self) -> &str {
        self.symbol
            .as_deref()
            .or(self.mint.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn is_usdc(&self, usdc_mint: &str) -> bool {
        self.symbol
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("USDC"))
            .unwrap_or(false)
            || self.mint.as_deref() == Some(usdc_mint)
    }
}

/// Balances of one account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountBalances {
    pub tokens: Vec<TokenBalance>,
    /// Native SOL balance in SOL (not lamports)
    pub native_sol: Option<Decimal>,
}

impl AccountBalances {
    /// Normalize a balances payload (already unwrapped from its envelope).
    pub fn from_value(value: &Value) -> Self {
        let tokens = first_present(value, &["tokens", "balances", "token_balances"])
            .and_then(Value::as_array)
            .map(|list| list.iter().map(TokenBalance::from_value).collect())
            .unwrap_or_default();

        let native_sol = first_present(value, &["sol", "sol_balance", "native_balance"])
            .and_then(as_decimal)
            .or_else(|| {
                first_present(value, &["lamports"])
                    .and_then(as_decimal)
                    .and_then(|l| l.checked_div(Decimal::from(10u64.pow(SOL_DECIMALS))))
            });

        Self { tokens, native_sol }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.native_sol.is_none()
    }

    pub fn usdc(&self, usdc_mint: &str) -> Option<&TokenBalance> {
        self.tokens.iter().find(|t| t.is_usdc(usdc_mint))
    }
}
