//! Account address parsing and comparison.
//!
//! Addresses are 20-byte values written as `0x`-prefixed hex. Wallets and
//! explorers disagree on letter case (EIP-55 checksums vs. lowercase), so all
//! comparisons go through the parsed bytes and never through the text.

use alloy_primitives::Address;

use crate::error::TypesError;

/// Parse a user- or node-supplied address string.
///
/// Surrounding whitespace is ignored. Letter case is not validated against a
/// checksum, so `0xABC...` and `0xabc...` parse to the same address.
pub fn parse_address(raw: &str) -> Result<Address, TypesError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TypesError::EmptyAddress);
    }
    trimmed
        .parse::<Address>()
        .map_err(|e| TypesError::InvalidAddress(format!("{trimmed}: {e}")))
}
