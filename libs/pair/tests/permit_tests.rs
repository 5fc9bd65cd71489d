//! Signature-based approvals signed with a local wallet

mod common;

use common::*;
use ethers::signers::{LocalWallet, Signer};
use ethers_core::types::{Address, U256};
use pair_engine::{permit_digest, Pair, PairError, PairEvent, PermitMessage};

const OWNER_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const OTHER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn wallet(key: &str) -> LocalWallet {
    key.parse::<LocalWallet>().unwrap()
}

fn signed_permit(
    pair: &Pair,
    signer: &LocalWallet,
    owner: Address,
    spender: Address,
    value: U256,
    deadline: U256,
) -> PermitMessage {
    let digest = permit_digest(
        pair.domain_separator(),
        owner,
        spender,
        value,
        pair.nonces(owner),
        deadline,
    );
    PermitMessage {
        owner,
        spender,
        value,
        deadline,
        signature: signer.sign_hash(digest).unwrap(),
    }
}

#[test]
fn test_valid_permit_sets_allowance() {
    let mut fixture = Fixture::seeded(false, e18(100), e18(100));
    let owner = wallet(OWNER_KEY);
    let deadline = U256::from(START + 60);

    let message = signed_permit(&fixture.pair, &owner, owner.address(), bob(), e18(5), deadline);
    fixture.pair.permit(&fixture.host, &message).unwrap();

    assert_eq!(fixture.pair.allowance(owner.address(), bob()), e18(5));
    assert_eq!(fixture.pair.nonces(owner.address()), U256::one());
    assert!(fixture.pair.take_events().contains(&PairEvent::Approval {
        owner: owner.address(),
        spender: bob(),
        amount: e18(5),
    }));

    // The nonce moved on, so the same message cannot be replayed
    assert_eq!(
        fixture.pair.permit(&fixture.host, &message).unwrap_err(),
        PairError::InvalidSignature
    );
}

#[test]
fn test_permit_deadline_is_inclusive() {
    let mut fixture = Fixture::seeded(false, e18(100), e18(100));
    let owner = wallet(OWNER_KEY);

    let message = signed_permit(
        &fixture.pair,
        &owner,
        owner.address(),
        bob(),
        e18(1),
        U256::from(START),
    );
    fixture.advance(1);
    assert_eq!(
        fixture.pair.permit(&fixture.host, &message).unwrap_err(),
        PairError::Expired {
            deadline: U256::from(START),
            now: START + 1,
        }
    );

    fixture.host.set_timestamp(START);
    fixture.pair.permit(&fixture.host, &message).unwrap();
}

#[test]
fn test_permit_signed_by_someone_else_rejected() {
    let mut fixture = Fixture::seeded(false, e18(100), e18(100));
    let owner = wallet(OWNER_KEY);
    let intruder = wallet(OTHER_KEY);

    let message = signed_permit(
        &fixture.pair,
        &intruder,
        owner.address(),
        intruder.address(),
        U256::MAX,
        U256::MAX,
    );
    assert_eq!(
        fixture.pair.permit(&fixture.host, &message).unwrap_err(),
        PairError::InvalidSignature
    );
    assert!(fixture
        .pair
        .allowance(owner.address(), intruder.address())
        .is_zero());
    assert!(fixture.pair.nonces(owner.address()).is_zero());
}

#[test]
fn test_permit_then_transfer_from() {
    let mut fixture = Fixture::seeded(false, e18(100), e18(100));
    let owner = wallet(OWNER_KEY);
    let shares = fixture.pair.balance_of(alice());
    fixture
        .pair
        .transfer(&mut fixture.host, alice(), owner.address(), shares)
        .unwrap();

    let message = signed_permit(
        &fixture.pair,
        &owner,
        owner.address(),
        bob(),
        U256::MAX,
        U256::MAX,
    );
    fixture.pair.permit(&fixture.host, &message).unwrap();
    fixture
        .pair
        .transfer_from(&mut fixture.host, bob(), owner.address(), bob(), shares)
        .unwrap();

    assert_eq!(fixture.pair.balance_of(bob()), shares);
    assert_eq!(fixture.pair.allowance(owner.address(), bob()), U256::MAX);
}
