//! EIP-712 signature-based approval
//!
//! The pool-share token accepts `Permit` messages signed by the owner. The
//! digest is `keccak256(0x1901 ‖ domainSeparator ‖ structHash)` with the
//! domain bound to the pair's share-token name, version `"1"`, the configured
//! chain id and the pair address. Recovery is delegated to `ethers-core`.

use crate::error::{PairError, Result};
use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, RecoveryMessage, Signature, H256, U256};
use ethers_core::utils::keccak256;
use pair_config::protocol::permit::{DOMAIN_TYPE, DOMAIN_VERSION, PERMIT_TYPE};

/// Signed approval submitted by anyone on behalf of `owner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitMessage {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    pub deadline: U256,
    pub signature: Signature,
}

pub fn domain_separator(name: &str, chain_id: u64, verifying_contract: Address) -> H256 {
    let encoded = encode(&[
        Token::FixedBytes(keccak256(DOMAIN_TYPE.as_bytes()).to_vec()),
        Token::FixedBytes(keccak256(name.as_bytes()).to_vec()),
        Token::FixedBytes(keccak256(DOMAIN_VERSION.as_bytes()).to_vec()),
        Token::Uint(U256::from(chain_id)),
        Token::Address(verifying_contract),
    ]);
    H256::from(keccak256(encoded))
}

/// Digest the owner signs for the given approval and nonce
pub fn permit_digest(
    domain_separator: H256,
    owner: Address,
    spender: Address,
    value: U256,
    nonce: U256,
    deadline: U256,
) -> H256 {
    let struct_hash = keccak256(encode(&[
        Token::FixedBytes(keccak256(PERMIT_TYPE.as_bytes()).to_vec()),
        Token::Address(owner),
        Token::Address(spender),
        Token::Uint(value),
        Token::Uint(nonce),
        Token::Uint(deadline),
    ]));

    let mut preimage = Vec::with_capacity(66);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(domain_separator.as_bytes());
    preimage.extend_from_slice(&struct_hash);
    H256::from(keccak256(preimage))
}

/// Signer of `digest`, rejecting failed recovery and the zero address
pub fn recover_signer(signature: &Signature, digest: H256) -> Result<Address> {
    let signer = signature
        .recover(RecoveryMessage::Hash(digest))
        .map_err(|_| PairError::InvalidSignature)?;
    if signer.is_zero() {
        return Err(PairError::InvalidSignature);
    }
    Ok(signer)
}
