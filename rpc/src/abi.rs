//! ABI encoding for the ballot contract's fixed interface.
//!
//! Only static types appear in the interface (`uint256`, `address`, `bool`,
//! `bytes32`), so every argument and return value is one 32-byte word. The
//! single dynamic case is the `Error(string)` revert payload.

use alloy_primitives::keccak256;
use ballot_core::Revert;
use ballot_types::{Address, RawProposal, RawVoterRecord, B256, U256};

use crate::error::RpcError;

pub const PROPOSALS: &str = "proposals(uint256)";
pub const VOTERS: &str = "voters(address)";
pub const WINNER_NAME: &str = "winnerName()";
pub const CHAIRPERSON: &str = "chairperson()";
pub const VOTE: &str = "vote(uint256)";
pub const DELEGATE: &str = "delegate(address)";
pub const GIVE_RIGHT_TO_VOTE: &str = "giveRightToVote(address)";

/// `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Custom errors the contract declares.
const CUSTOM_ERRORS: &[(&str, &str)] = &[("AlreadyVoted()", "AlreadyVoted")];

const WORD: usize = 32;

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn uint_word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

pub fn address_word(address: Address) -> B256 {
    address.into_word()
}

/// Calldata for `signature` with the given static arguments.
pub fn encode_call(signature: &str, args: &[B256]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(arg.as_slice());
    }
    data
}

fn word(data: &[u8], index: usize) -> Result<B256, RpcError> {
    let start = index * WORD;
    data.get(start..start + WORD)
        .map(B256::from_slice)
        .ok_or_else(|| {
            RpcError::Abi(format!(
                "expected at least {} bytes, got {}",
                start + WORD,
                data.len()
            ))
        })
}

fn uint_at(data: &[u8], index: usize) -> Result<U256, RpcError> {
    Ok(U256::from_be_bytes(word(data, index)?.0))
}

/// `proposals(i)` return. Empty data means the slot does not exist.
pub fn decode_proposal(data: &[u8]) -> Result<Option<RawProposal>, RpcError> {
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(RawProposal {
        name: word(data, 0)?,
        vote_count: uint_at(data, 1)?,
    }))
}

/// `voters(address)` return.
pub fn decode_voter(data: &[u8]) -> Result<Option<RawVoterRecord>, RpcError> {
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(RawVoterRecord {
        weight: uint_at(data, 0)?,
        voted: !uint_at(data, 1)?.is_zero(),
        delegate: Address::from_word(word(data, 2)?),
        vote: uint_at(data, 3)?,
    }))
}

pub fn decode_bytes32(data: &[u8]) -> Result<Option<B256>, RpcError> {
    if data.is_empty() {
        return Ok(None);
    }
    word(data, 0).map(Some)
}

pub fn decode_address(data: &[u8]) -> Result<Option<Address>, RpcError> {
    if data.is_empty() {
        return Ok(None);
    }
    word(data, 0).map(|w| Some(Address::from_word(w)))
}

/// Decode revert data. `None` for an empty payload.
pub fn decode_revert(data: &[u8]) -> Option<Revert> {
    let (head, body) = (data.get(..4)?, &data[4..]);
    if head == ERROR_STRING_SELECTOR {
        return Some(match decode_string(body) {
            Some(reason) => Revert::Reason(reason),
            None => Revert::Opaque,
        });
    }
    let named = CUSTOM_ERRORS
        .iter()
        .find(|(signature, _)| selector(signature) == head)
        .map(|(_, name)| Revert::Named(name.to_string()));
    Some(named.unwrap_or(Revert::Opaque))
}

fn decode_string(body: &[u8]) -> Option<String> {
    let offset = usize::try_from(uint_at(body, 0).ok()?).ok()?;
    let len_word = body.get(offset..offset.checked_add(WORD)?)?;
    let len = usize::try_from(U256::from_be_slice(len_word)).ok()?;
    let start = offset + WORD;
    let bytes = body.get(start..start.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// `Error(string)` revert data, as a node would attach it.
#[cfg(test)]
pub(crate) fn error_string(reason: &str) -> Vec<u8> {
    let mut data = ERROR_STRING_SELECTOR.to_vec();
    data.extend_from_slice(uint_word(U256::from(32u64)).as_slice());
    data.extend_from_slice(uint_word(U256::from(reason.len())).as_slice());
    let mut padded = reason.as_bytes().to_vec();
    padded.resize(reason.len().div_ceil(WORD) * WORD, 0);
    data.extend_from_slice(&padded);
    data
}
