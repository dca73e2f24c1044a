//! Archive of consumed VAAs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;

/// Durable record of every VAA that has been redeemed, keyed by body digest.
///
/// `claim` is a single test-and-set: under concurrent submission of the same
/// VAA exactly one caller observes `Ok` and may settle; every other caller
/// observes `AlreadyRedeemed` with no side effect.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct VaaArchive {
    claimed: HashSet<[u8; 32]>,
}

impl VaaArchive {
    pub fn new() -> Self {
        VaaArchive::default()
    }

    /// Records `hash` as redeemed. Fails if it already was.
    pub fn claim(&mut self, hash: [u8; 32]) -> Result<(), ReplayError> {
        if self.claimed.insert(hash) {
            Ok(())
        } else {
            Err(ReplayError::AlreadyRedeemed)
        }
    }

    pub fn contains(&self, hash: &[u8; 32]) -> bool {
        self.claimed.contains(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exactly_once() {
        let mut archive = VaaArchive::new();
        let hash = [7u8; 32];

        assert!(!archive.contains(&hash));
        assert_eq!(archive.claim(hash), Ok(()));
        assert!(archive.contains(&hash));
        assert_eq!(archive.claim(hash), Err(ReplayError::AlreadyRedeemed));
    }

    #[test]
    fn claims_are_independent_per_hash() {
        let mut archive = VaaArchive::new();
        assert_eq!(archive.claim([1u8; 32]), Ok(()));
        assert_eq!(archive.claim([2u8; 32]), Ok(()));
    }
}
