use rust_decimal::Decimal;

/// Solana explorer base URL for transaction pages
const EXPLORER_TX_URL: &str = "https://explorer.solana.com/tx";

/// Build an explorer link for a transaction signature on the given cluster
pub fn explorer_url(signature: &str, cluster: &str) -> String {
    format!("{}/{}?cluster={}", EXPLORER_TX_URL, signature, cluster)
}

/// Format a token amount for display, dropping trailing zeros
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Shorten an address to `abcd...wxyz` for compact display
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_explorer_url() {
        assert_eq!(
            explorer_url("5sig", "devnet"),
            "https://explorer.solana.com/tx/5sig?cluster=devnet"
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from_str("12.500000").unwrap()), "12.5");
        assert_eq!(format_amount(Decimal::from_str("3.000").unwrap()), "3");
        assert_eq!(format_amount(Decimal::ZERO), "0");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU"),
            "4zMM...ncDU"
        );
        assert_eq!(short_address("short"), "short");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
