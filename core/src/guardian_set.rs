//! Guardian sets and the registry that tracks their rotation.
//!
//! A guardian set is immutable once stored; superseding it only stamps its
//! expiration time so that VAAs signed by the outgoing set stay redeemable
//! for a grace window.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::GuardianSetError, Address, GuardianAddress};

/// A versioned set of guardian keys that can sign relay messages.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct GuardianSet {
    pub index: u32,

    /// Guardian addresses, in signing order. A signature's guardian index
    /// points into this list.
    pub keys: Vec<GuardianAddress>,

    /// Seconds since UNIX epoch at which the set was stored.
    pub creation_time: u64,

    /// Seconds since UNIX epoch after which the set no longer verifies.
    /// 0 means unexpired.
    pub expiration_time: u64,
}

impl GuardianSet {
    pub fn quorum(&self) -> usize {
        // allow quorum of 0 for testing purposes...
        if self.keys.is_empty() {
            return 0;
        }
        ((self.keys.len() * 10 / 3) * 2) / 10 + 1
    }
}

/// Keyed store of all guardian sets ever installed, plus the index of the
/// active one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GuardianRegistry {
    owner: Address,
    sets: BTreeMap<u32, GuardianSet>,
    current_index: u32,

    /// Period for which a guardian set stays valid after it has been
    /// superseded.
    grace_period: u64,
}

impl GuardianRegistry {
    pub fn new(owner: Address, grace_period: u64, keys: Vec<GuardianAddress>, now: u64) -> Self {
        let mut sets = BTreeMap::new();
        let _ = sets.insert(
            0,
            GuardianSet {
                index: 0,
                keys,
                creation_time: now,
                expiration_time: 0,
            },
        );
        GuardianRegistry {
            owner,
            sets,
            current_index: 0,
            grace_period,
        }
    }

    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    pub fn current(&self) -> &GuardianSet {
        // the registry is never without its current set
        &self.sets[&self.current_index]
    }

    pub fn get(&self, index: u32) -> Result<&GuardianSet, GuardianSetError> {
        self.sets.get(&index).ok_or(GuardianSetError::UnknownSet)
    }

    /// Installs `keys` as the new active set under `new_index` and freezes
    /// the outgoing set's expiration to `now + grace_period`.
    pub fn supersede(
        &mut self,
        caller: &Address,
        new_index: u32,
        keys: Vec<GuardianAddress>,
        now: u64,
    ) -> Result<(), GuardianSetError> {
        if caller != &self.owner {
            return Err(GuardianSetError::OwnerOnly);
        }
        if new_index != self.current_index + 1 {
            return Err(GuardianSetError::GuardianSetIndexIncrease);
        }

        let old_index = self.current_index;
        let _ = self.sets.insert(
            new_index,
            GuardianSet {
                index: new_index,
                keys,
                creation_time: now,
                expiration_time: 0,
            },
        );
        self.current_index = new_index;

        // outgoing set stays valid through the grace window
        if let Some(old) = self.sets.get_mut(&old_index) {
            old.expiration_time = now + self.grace_period;
        }

        info!(old = old_index, new = new_index, "guardian_set_change");
        Ok(())
    }
}
