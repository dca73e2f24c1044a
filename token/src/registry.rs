//! Owner-governed registry of trusted foreign contracts.
//!
//! Before any inbound VAA is acted on, its emitter must be the registered
//! contract for its chain. One entry per foreign chain id; re-registration
//! replaces the trust anchor, so callers must not assume immutability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use relay_core::Address;

use crate::error::RegistryError;

/// A trusted contract on a foreign chain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForeignContract {
    pub chain: u16,
    pub address: Address,

    /// The foreign chain's native token-bridge endpoint, for transfers that
    /// need the cross-reference.
    pub bridge_address: Option<Address>,
}

/// Keyed store of foreign contracts, one per chain id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForeignRegistry {
    owner: Address,
    own_chain: u16,
    contracts: BTreeMap<u16, ForeignContract>,
}

impl ForeignRegistry {
    pub fn new(owner: Address, own_chain: u16) -> Self {
        ForeignRegistry {
            owner,
            own_chain,
            contracts: BTreeMap::new(),
        }
    }

    /// Inserts or overwrites the trusted contract for `chain`.
    ///
    /// Chain id 0 is the unset sentinel and this program's own chain can
    /// never be foreign, so both are rejected, as is the zero address.
    pub fn register(
        &mut self,
        caller: &Address,
        chain: u16,
        address: Address,
        bridge_address: Option<Address>,
    ) -> Result<(), RegistryError> {
        if caller != &self.owner {
            return Err(RegistryError::OwnerOnly);
        }
        if chain == 0 || chain == self.own_chain || address.is_zero() {
            return Err(RegistryError::InvalidForeignContract);
        }

        let _ = self.contracts.insert(
            chain,
            ForeignContract {
                chain,
                address,
                bridge_address,
            },
        );
        info!(chain, address = ?address, "register_foreign_contract");
        Ok(())
    }

    pub fn resolve(&self, chain: u16) -> Result<&ForeignContract, RegistryError> {
        self.contracts
            .get(&chain)
            .ok_or(RegistryError::UnregisteredChain)
    }

    /// Checks that `emitter` is the registered contract for `chain`.
    pub fn verify_emitter(&self, chain: u16, emitter: &Address) -> Result<(), RegistryError> {
        if &self.resolve(chain)?.address != emitter {
            return Err(RegistryError::InvalidForeignEmitter);
        }
        Ok(())
    }
}
