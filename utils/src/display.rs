//! Display helpers for terminal output.

use ballot_types::{Address, U256};

/// Abbreviate an address to `0x1234…abcd`.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Format a tally with thousands separators.
pub fn format_votes(votes: &U256) -> String {
    let digits = votes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        let addr: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
            .parse()
            .unwrap();
        assert_eq!(short_address(&addr), "0x5aAe…eAed");
    }

    #[test]
    fn test_format_votes() {
        assert_eq!(format_votes(&U256::ZERO), "0");
        assert_eq!(format_votes(&U256::from(999u64)), "999");
        assert_eq!(format_votes(&U256::from(1000u64)), "1,000");
        assert_eq!(format_votes(&U256::from(1234567u64)), "1,234,567");
    }
}
