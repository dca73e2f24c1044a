//! Mock guardian harness shared by the integration suites.

#![allow(dead_code)]

use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};

use relay_core::{vaa::Signature, Address, GuardianAddress, Vaa, VaaBody};
use relay_token::{Relay, RelayConfig};

pub const OWN_CHAIN: u16 = 1;
pub const FOREIGN_CHAIN: u16 = 2;

pub const GRACE_PERIOD: u64 = 86400;
pub const NOW: u64 = 1_656_354_705;

// 1%
pub const RELAYER_FEE: u32 = 1_000_000;
pub const RELAYER_FEE_PRECISION: u32 = 100_000_000;

pub const FINALITY: u8 = 1;

pub fn owner() -> Address {
    Address([0xaa; 32])
}

pub fn our_emitter() -> Address {
    Address([0x01; 32])
}

pub fn foreign_contract_address() -> Address {
    address_from_hex("deadbeef")
}

/// 32 bytes from a repeating hex pattern.
pub fn address_from_hex(pattern: &str) -> Address {
    let bytes = hex::decode(pattern.repeat(32 / (pattern.len() / 2))).unwrap();
    let mut address = [0u8; 32];
    address.copy_from_slice(&bytes);
    Address(address)
}

/// Deterministic guardian keys that sign for real.
pub struct MockGuardians {
    keys: Vec<SigningKey>,
    pub set_index: u32,
}

impl MockGuardians {
    pub fn new(n: u8) -> Self {
        MockGuardians {
            keys: (1..=n)
                .map(|i| SigningKey::from_slice(&[i; 32]).unwrap())
                .collect(),
            set_index: 0,
        }
    }

    pub fn addresses(&self) -> Vec<GuardianAddress> {
        self.keys
            .iter()
            .map(|key| {
                let point = key.verifying_key().to_encoded_point(false);
                let hash = Keccak256::digest(&point.as_bytes()[1..]);
                let mut address = [0u8; 20];
                address.copy_from_slice(&hash[12..]);
                GuardianAddress(address)
            })
            .collect()
    }

    /// Signs `body` with every guardian and returns the serialized VAA.
    pub fn sign(&self, body: VaaBody) -> Vec<u8> {
        let prehash = body.digest().secp256k_hash;
        let signatures = self
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let (sig, recovery_id) = key.sign_prehash_recoverable(&prehash).unwrap();
                let bytes = sig.to_bytes();
                let mut r = [0u8; 32];
                let mut s = [0u8; 32];
                r.copy_from_slice(&bytes[..32]);
                s.copy_from_slice(&bytes[32..]);
                Signature {
                    index: index as u8,
                    r,
                    s,
                    recovery_id: recovery_id.to_byte(),
                }
            })
            .collect();

        Vaa {
            version: 1,
            guardian_set_index: self.set_index,
            signatures,
            body,
        }
        .serialize()
    }
}

/// A freshly initialized relay endpoint trusting `guardians`.
pub fn relay(guardians: &MockGuardians) -> Relay {
    Relay::new(
        RelayConfig {
            owner: owner(),
            chain_id: OWN_CHAIN,
            emitter: our_emitter(),
            finality: FINALITY,
            guardian_grace_period: GRACE_PERIOD,
            relayer_fee: RELAYER_FEE,
            relayer_fee_precision: RELAYER_FEE_PRECISION,
        },
        guardians.addresses(),
        NOW,
    )
    .unwrap()
}

/// A body as the registered foreign contract would emit it.
pub fn foreign_body(payload: Vec<u8>, sequence: u64) -> VaaBody {
    VaaBody {
        timestamp: NOW as u32,
        nonce: 0,
        emitter_chain: FOREIGN_CHAIN,
        emitter_address: foreign_contract_address(),
        sequence,
        consistency_level: FINALITY,
        payload,
    }
}
