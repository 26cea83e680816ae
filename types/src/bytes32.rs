//! Fixed-length byte-string names.
//!
//! Proposal and winner names are stored on chain as `bytes32`: UTF-8 text
//! right-padded with zero bytes.

use alloy_primitives::B256;

use crate::error::TypesError;

/// Decode a zero-padded byte string.
///
/// Trailing zero bytes are trimmed, the remainder must be valid UTF-8.
/// All-zero input decodes to the empty string.
pub fn decode_bytes32(raw: &[u8]) -> Result<String, TypesError> {
    let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    std::str::from_utf8(&raw[..end])
        .map(str::to_owned)
        .map_err(|e| TypesError::InvalidUtf8(e.to_string()))
}

/// Encode a name into a zero-padded `bytes32`.
pub fn encode_bytes32(name: &str) -> Result<B256, TypesError> {
    let bytes = name.as_bytes();
    if bytes.len() > 32 {
        return Err(TypesError::NameTooLong(bytes.len()));
    }
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_trims_trailing_zeros() {
        let encoded = encode_bytes32("Build Bridge").unwrap();
        assert_eq!(decode_bytes32(encoded.as_slice()).unwrap(), "Build Bridge");
    }

    #[test]
    fn test_decode_all_zero_is_empty() {
        assert_eq!(decode_bytes32(&[0u8; 32]).unwrap(), "");
        assert_eq!(decode_bytes32(&[]).unwrap(), "");
    }

    #[test]
    fn test_decode_keeps_interior_zeros() {
        let mut raw = [0u8; 32];
        raw[0] = b'a';
        raw[2] = b'b';
        assert_eq!(decode_bytes32(&raw).unwrap(), "a\0b");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut raw = [0u8; 32];
        raw[0] = 0xFF;
        raw[1] = 0xFE;
        assert!(matches!(
            decode_bytes32(&raw),
            Err(TypesError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_decode_multibyte_name() {
        let encoded = encode_bytes32("Parc Municipal é").unwrap();
        assert_eq!(
            decode_bytes32(encoded.as_slice()).unwrap(),
            "Parc Municipal é"
        );
    }

    #[test]
    fn test_encode_rejects_long_names() {
        let long = "x".repeat(33);
        assert_eq!(encode_bytes32(&long), Err(TypesError::NameTooLong(33)));
        assert!(encode_bytes32(&"x".repeat(32)).is_ok());
    }
}
