//! Chain-agnostic primitives for the guardian message relay.
//!
//! This crate provides the pieces a receiving program needs to consume
//! guardian-signed messages (VAAs) and a sending program needs to emit them:
//!
//! - Parsers and serializers for the VAA wire format.
//! - Data types for guardian sets and signatures, and the registry that
//!   tracks set rotation.
//! - Quorum-based signature verification against a guardian set.
//! - Per-emitter sequence counters for outbound numbering.
//! - The archive of consumed VAAs that enforces exactly-once redemption.
//!
//! Signature *production* is out of scope; a fully signed VAA is an opaque
//! input here.

use serde::{Deserialize, Serialize};

pub mod archive;
pub mod byte_utils;
pub mod error;
pub mod governance;
pub mod guardian_set;
pub mod sequence;
pub mod vaa;
pub mod verify;

pub use {
    archive::VaaArchive,
    guardian_set::{GuardianRegistry, GuardianSet},
    sequence::SequenceTracker,
    vaa::{Vaa, VaaBody},
    verify::{KeyRecovery, Secp256k1Recovery, SignatureVerifier},
};

/// A guardian is identified by the 20-byte Ethereum-style address of its
/// secp256k1 public key.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct GuardianAddress(pub [u8; 20]);

/// Addresses on the wire are 32 bytes. Shorter native addresses, for example
/// 20 byte Ethereum addresses, are left zero padded to 32.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
