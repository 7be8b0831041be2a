//! Minimal ABI encoding/decoding for the two contract reads the scan needs.
//!
//! The contract surface is fixed (`totalSupply()` and `tokenURI(uint256)`),
//! so the call data is built by hand rather than pulling in a full ABI
//! library: a 4-byte selector plus one optional left-padded uint256 argument,
//! and on the way back a uint256 or a dynamic string.

use pinsave_core::error::{PinSaveError, Result};

/// Encodes a no-argument call as 0x-prefixed hex call data.
pub fn encode_call(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Encodes a single-uint256-argument call as 0x-prefixed hex call data.
pub fn encode_call_uint(selector: [u8; 4], value: u64) -> String {
    let mut data = [0u8; 36];
    data[..4].copy_from_slice(&selector);
    data[28..36].copy_from_slice(&value.to_be_bytes());
    format!("0x{}", hex::encode(data))
}

/// Decodes a uint256 return value into a u64.
///
/// Token counts above `u64::MAX` are rejected rather than truncated.
pub fn decode_uint(hex_data: &str) -> Result<u64> {
    let bytes = decode_hex_payload(hex_data)?;

    if bytes.len() != 32 {
        return Err(PinSaveError::ChainReadError(format!(
            "Expected 32-byte uint256 return, got {} bytes",
            bytes.len()
        )));
    }

    if bytes[..24].iter().any(|b| *b != 0) {
        return Err(PinSaveError::ChainReadError(
            "uint256 return exceeds u64 range".into(),
        ));
    }

    let mut tail = [0u8; 8];
    tail.copy_from_slice(&bytes[24..32]);
    Ok(u64::from_be_bytes(tail))
}

/// Decodes an ABI-encoded dynamic string return value.
///
/// Layout: 32-byte offset, 32-byte length, then UTF-8 data padded to a
/// 32-byte boundary.
pub fn decode_string(hex_data: &str) -> Result<String> {
    let bytes = decode_hex_payload(hex_data)?;

    if bytes.len() < 64 {
        return Err(PinSaveError::ChainReadError(format!(
            "String return too short: {} bytes",
            bytes.len()
        )));
    }

    let offset = read_usize_word(&bytes[..32])?;
    let length_start = offset
        .checked_add(32)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| PinSaveError::ChainReadError("String offset out of bounds".into()))?;

    let length = read_usize_word(&bytes[offset..length_start])?;
    let data_end = length_start
        .checked_add(length)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| PinSaveError::ChainReadError("String length out of bounds".into()))?;

    String::from_utf8(bytes[length_start..data_end].to_vec())
        .map_err(|e| PinSaveError::ChainReadError(format!("String return not UTF-8: {e}")))
}

fn decode_hex_payload(hex_data: &str) -> Result<Vec<u8>> {
    let trimmed = hex_data.strip_prefix("0x").unwrap_or(hex_data);
    if trimmed.is_empty() {
        return Err(PinSaveError::ChainReadError(
            "Empty return data (wrong contract address?)".into(),
        ));
    }
    hex::decode(trimmed)
        .map_err(|e| PinSaveError::ChainReadError(format!("Invalid hex return data: {e}")))
}

fn read_usize_word(word: &[u8]) -> Result<usize> {
    if word.len() != 32 || word[..24].iter().any(|b| *b != 0) {
        return Err(PinSaveError::ChainReadError(
            "Malformed ABI word".into(),
        ));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[24..32]);
    usize::try_from(u64::from_be_bytes(tail))
        .map_err(|_| PinSaveError::ChainReadError("ABI word exceeds usize".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinsave_core::constants::{SELECTOR_TOKEN_URI, SELECTOR_TOTAL_SUPPLY};
    use sha3::{Digest, Keccak256};

    fn selector_of(signature: &str) -> [u8; 4] {
        let digest = Keccak256::digest(signature.as_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }

    #[test]
    fn test_selectors_match_keccak() {
        assert_eq!(SELECTOR_TOTAL_SUPPLY, selector_of("totalSupply()"));
        assert_eq!(SELECTOR_TOKEN_URI, selector_of("tokenURI(uint256)"));
    }

    #[test]
    fn test_encode_call_no_args() {
        assert_eq!(encode_call(SELECTOR_TOTAL_SUPPLY), "0x18160ddd");
    }

    #[test]
    fn test_encode_call_uint_pads_left() {
        let data = encode_call_uint(SELECTOR_TOKEN_URI, 3);
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0xc87b56dd"));
        assert!(data.ends_with("0000000000000000000000000000000000000000000000000000000000000003"));
    }

    #[test]
    fn test_decode_uint_roundtrip() {
        let mut word = [0u8; 32];
        word[24..32].copy_from_slice(&42u64.to_be_bytes());
        let encoded = format!("0x{}", hex::encode(word));
        assert_eq!(decode_uint(&encoded).unwrap(), 42);
    }

    #[test]
    fn test_decode_uint_rejects_overflow() {
        let mut word = [0u8; 32];
        word[0] = 1;
        let encoded = format!("0x{}", hex::encode(word));
        assert!(decode_uint(&encoded).is_err());
    }

    #[test]
    fn test_decode_string() {
        let uri = "ipfs://bafybeic0ffee/metadata.json";
        let mut payload = vec![0u8; 64];
        payload[31] = 0x20;
        payload[63] = uri.len() as u8;
        payload.extend_from_slice(uri.as_bytes());
        payload.resize(64 + ((uri.len() + 31) / 32) * 32, 0);

        let encoded = format!("0x{}", hex::encode(&payload));
        assert_eq!(decode_string(&encoded).unwrap(), uri);
    }

    #[test]
    fn test_decode_string_rejects_truncated() {
        assert!(decode_string("0x0000").is_err());
        assert!(decode_string("0x").is_err());
    }
}
