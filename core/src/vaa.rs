//! VAA wire format.
//!
//! A VAA is a collection of guardian signatures over a message body plus the
//! body itself. By submitting one to a receiving program, the submitter
//! proves that the guardian quorum observed the corresponding event on the
//! emitting chain.
//!
//! The parsers here are strict: a buffer either decodes to a value that
//! re-serializes to the identical bytes, or decoding fails with a
//! [`CodecError`].

use serde::{Deserialize, Serialize};
use sha3::{Digest as Sha3Digest, Keccak256};

use crate::{byte_utils::ByteUtils, error::CodecError, Address};

/// Signatures are ECDSA signatures prefixed with the position of the signing
/// guardian inside its set.
///
/// ```markdown
/// 0       u8       guardian index
/// 1  .. 33         r
/// 33 .. 65         s
/// 65      u8       recovery id
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub index: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

/// Digest data for a VAA body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VaaDigest {
    /// Keccak256 of the serialized body. This is the identity of a VAA: the
    /// replay archive and all redemption bookkeeping key on it.
    pub hash: [u8; 32],

    /// Keccak256 of `hash`. Guardians sign the hash of the hash, so this is
    /// the prehash that `ecrecover`-style key recovery operates on.
    pub secp256k_hash: [u8; 32],
}

/// Calculates the digest for a serialized body.
pub fn digest(body: &[u8]) -> VaaDigest {
    let hash: [u8; 32] = {
        let mut hasher = Keccak256::new();
        hasher.update(body);
        hasher.finalize().into()
    };

    let secp256k_hash: [u8; 32] = {
        let mut hasher = Keccak256::new();
        hasher.update(hash);
        hasher.finalize().into()
    };

    VaaDigest {
        hash,
        secp256k_hash,
    }
}

/// The body of a VAA: everything the guardians sign.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct VaaBody {
    /// Seconds since UNIX epoch.
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: u16,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Vec<u8>,
}

impl VaaBody {
    /* Body layout:

    0   uint32      timestamp (unix in seconds)
    4   uint32      nonce
    8   uint16      emitter_chain
    10  [32]uint8   emitter_address
    42  uint64      sequence
    50  uint8       consistency_level
    51  []uint8     payload
    */

    pub const NONCE_POS: usize = 4;
    pub const EMITTER_CHAIN_POS: usize = 8;
    pub const EMITTER_ADDRESS_POS: usize = 10;
    pub const SEQUENCE_POS: usize = 42;
    pub const CONSISTENCY_LEVEL_POS: usize = 50;
    pub const PAYLOAD_POS: usize = 51;

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < Self::PAYLOAD_POS {
            return Err(CodecError::Malformed);
        }

        Ok(VaaBody {
            timestamp: data.get_u32(0),
            nonce: data.get_u32(Self::NONCE_POS),
            emitter_chain: data.get_u16(Self::EMITTER_CHAIN_POS),
            emitter_address: Address(data.get_const_bytes(Self::EMITTER_ADDRESS_POS)),
            sequence: data.get_u64(Self::SEQUENCE_POS),
            consistency_level: data.get_u8(Self::CONSISTENCY_LEVEL_POS),
            payload: data[Self::PAYLOAD_POS..].to_vec(),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        [
            self.timestamp.to_be_bytes().as_slice(),
            self.nonce.to_be_bytes().as_slice(),
            self.emitter_chain.to_be_bytes().as_slice(),
            self.emitter_address.0.as_slice(),
            self.sequence.to_be_bytes().as_slice(),
            &[self.consistency_level],
            self.payload.as_slice(),
        ]
        .concat()
    }

    pub fn digest(&self) -> VaaDigest {
        digest(&self.serialize())
    }
}

/// A full VAA: header (version, guardian set, signatures) plus body.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Vaa {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
    pub body: VaaBody,
}

impl Vaa {
    /* Header layout:

    0   uint8   version (0x01)
    1   uint32  guardian set index
    5   uint8   len signatures

    per signature (length 66):
    0   uint8       index of the signer (in guardian keys)
    1   [65]uint8   signature
    */

    pub const HEADER_LEN: usize = 6;
    pub const SIGNATURE_LEN: usize = 66;

    pub const GUARDIAN_SET_INDEX_POS: usize = 1;
    pub const LEN_SIGNERS_POS: usize = 5;

    pub const VERSION: u8 = 1;

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < Self::HEADER_LEN {
            return Err(CodecError::Malformed);
        }

        let version = data.get_u8(0);
        if version != Self::VERSION {
            return Err(CodecError::Malformed);
        }

        let guardian_set_index = data.get_u32(Self::GUARDIAN_SET_INDEX_POS);
        let len_signers = data.get_u8(Self::LEN_SIGNERS_POS) as usize;
        let body_offset = Self::HEADER_LEN + Self::SIGNATURE_LEN * len_signers;

        if data.len() < body_offset + VaaBody::PAYLOAD_POS {
            return Err(CodecError::Malformed);
        }

        let mut signatures = Vec::with_capacity(len_signers);
        for i in 0..len_signers {
            let pos = Self::HEADER_LEN + Self::SIGNATURE_LEN * i;
            signatures.push(Signature {
                index: data.get_u8(pos),
                r: data.get_const_bytes(pos + 1),
                s: data.get_const_bytes(pos + 33),
                recovery_id: data.get_u8(pos + 65),
            });
        }

        Ok(Vaa {
            version,
            guardian_set_index,
            signatures,
            body: VaaBody::deserialize(&data[body_offset..])?,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            Self::HEADER_LEN + Self::SIGNATURE_LEN * self.signatures.len() + VaaBody::PAYLOAD_POS,
        );
        out.push(self.version);
        out.extend_from_slice(&self.guardian_set_index.to_be_bytes());
        out.push(self.signatures.len() as u8);
        for sig in &self.signatures {
            out.push(sig.index);
            out.extend_from_slice(&sig.r);
            out.extend_from_slice(&sig.s);
            out.push(sig.recovery_id);
        }
        out.extend_from_slice(&self.body.serialize());
        out
    }

    /// Digest of the body, as signed by the guardians.
    pub fn digest(&self) -> VaaDigest {
        self.body.digest()
    }
}
