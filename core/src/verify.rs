//! Quorum verification of guardian signatures.
//!
//! Verification is stateless beyond the registry lookup: it mutates nothing
//! and can be retried freely. Key recovery sits behind [`KeyRecovery`] so the
//! cryptography can be swapped for a deterministic oracle in tests; the
//! default implementation recovers secp256k1 keys with `k256`.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use sha3::{Digest as Sha3Digest, Keccak256};

use crate::{
    error::VerifyError,
    guardian_set::GuardianRegistry,
    vaa::{Signature, Vaa},
    GuardianAddress,
};

/// Recovers the signer identity of a single guardian signature.
pub trait KeyRecovery {
    /// Returns the address that produced `sig` over `prehash`, or `None` if
    /// the signature does not recover to any key.
    fn recover(&self, prehash: &[u8; 32], sig: &Signature) -> Option<GuardianAddress>;
}

/// secp256k1 recovery with the recovered public key reduced to its 20-byte
/// Ethereum-style address.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Recovery;

impl KeyRecovery for Secp256k1Recovery {
    fn recover(&self, prehash: &[u8; 32], sig: &Signature) -> Option<GuardianAddress> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&sig.r);
        compact[32..].copy_from_slice(&sig.s);

        let signature = EcdsaSignature::from_slice(&compact).ok()?;
        let recovery_id = RecoveryId::from_byte(sig.recovery_id)?;
        let key = VerifyingKey::recover_from_prehash(prehash, &signature, recovery_id).ok()?;

        // uncompressed SEC1 point, tag byte stripped before hashing
        let point = key.to_encoded_point(false);
        let mut hasher = Keccak256::new();
        hasher.update(&point.as_bytes()[1..]);
        let hash = hasher.finalize();

        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Some(GuardianAddress(address))
    }
}

/// Checks a VAA's signatures against the guardian set it references.
#[derive(Debug, Default, Clone)]
pub struct SignatureVerifier<R = Secp256k1Recovery> {
    recovery: R,
}

impl SignatureVerifier<Secp256k1Recovery> {
    pub fn new() -> Self {
        SignatureVerifier {
            recovery: Secp256k1Recovery,
        }
    }
}

impl<R: KeyRecovery> SignatureVerifier<R> {
    pub fn with_recovery(recovery: R) -> Self {
        SignatureVerifier { recovery }
    }

    /// Verifies that `vaa` carries a quorum of valid signatures from the
    /// guardian set it names.
    ///
    /// A superseded set keeps verifying until its expiration time passes;
    /// the current set never expires.
    pub fn verify(
        &self,
        registry: &GuardianRegistry,
        vaa: &Vaa,
        now: u64,
    ) -> Result<(), VerifyError> {
        let guardian_set = registry
            .get(vaa.guardian_set_index)
            .map_err(|_| VerifyError::SetNotFound)?;

        if vaa.guardian_set_index != registry.current_index()
            && guardian_set.expiration_time != 0
            && guardian_set.expiration_time < now
        {
            return Err(VerifyError::SetExpired);
        }

        if vaa.signatures.len() < guardian_set.quorum() {
            return Err(VerifyError::QuorumNotMet);
        }

        let prehash = vaa.digest().secp256k_hash;

        let mut last_index: i32 = -1;
        for sig in &vaa.signatures {
            if i32::from(sig.index) <= last_index {
                return Err(VerifyError::InvalidSignatureOrder);
            }
            last_index = i32::from(sig.index);

            let guardian = guardian_set
                .keys
                .get(sig.index as usize)
                .ok_or(VerifyError::TooManySignatures)?;

            let recovered = self
                .recovery
                .recover(&prehash, sig)
                .ok_or(VerifyError::InvalidSignature)?;
            if &recovered != guardian {
                return Err(VerifyError::InvalidSignature);
            }
        }

        Ok(())
    }
}
