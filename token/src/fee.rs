//! Relayer fee accounting.
//!
//! When someone other than the recipient submits a redemption, they earn a
//! fixed-point cut of the released amount. Self-relays pay no fee.

use serde::{Deserialize, Serialize};
use tracing::info;

use relay_core::Address;

use crate::error::{Error, FeeError, RegistryError};

/// Owner-governed fee as the fraction `fee / fee_precision`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayerConfig {
    owner: Address,
    fee: u32,
    fee_precision: u32,
}

impl RelayerConfig {
    pub fn new(owner: Address, fee: u32, fee_precision: u32) -> Result<Self, FeeError> {
        validate(fee, fee_precision)?;
        Ok(RelayerConfig {
            owner,
            fee,
            fee_precision,
        })
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn fee_precision(&self) -> u32 {
        self.fee_precision
    }

    pub fn update(&mut self, caller: &Address, fee: u32, fee_precision: u32) -> Result<(), Error> {
        if caller != &self.owner {
            return Err(RegistryError::OwnerOnly.into());
        }
        validate(fee, fee_precision)?;
        self.fee = fee;
        self.fee_precision = fee_precision;
        info!(fee, fee_precision, "update_relayer_fee");
        Ok(())
    }

    /// Splits `amount` into `(recipient_amount, relayer_amount)`.
    pub fn split(&self, amount: u128, is_self_relay: bool) -> (u128, u128) {
        if is_self_relay {
            return (amount, 0);
        }
        // split the multiplication so fee * amount cannot overflow
        let fee = u128::from(self.fee);
        let precision = u128::from(self.fee_precision);
        let relayer_amount = amount / precision * fee + amount % precision * fee / precision;
        (amount - relayer_amount, relayer_amount)
    }
}

fn validate(fee: u32, fee_precision: u32) -> Result<(), FeeError> {
    if fee_precision == 0 || fee > fee_precision {
        return Err(FeeError::InvalidRelayerFee);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address([0xaa; 32])
    }

    // 1%
    fn config() -> RelayerConfig {
        RelayerConfig::new(owner(), 1_000_000, 100_000_000).unwrap()
    }

    #[test]
    fn one_percent_split() {
        assert_eq!(config().split(31337, false), (31024, 313));
    }

    #[test]
    fn self_relay_pays_no_fee() {
        assert_eq!(config().split(31337, true), (31337, 0));
        assert_eq!(config().split(0, true), (0, 0));
        assert_eq!(config().split(u128::MAX, true), (u128::MAX, 0));
    }

    #[test]
    fn split_conserves_the_amount() {
        let config = config();
        for amount in [0u128, 1, 99, 100, 31337, 10u128.pow(30)] {
            let (recipient, relayer) = config.split(amount, false);
            assert_eq!(recipient + relayer, amount);
        }
    }

    #[test]
    fn full_fee_routes_everything_to_the_relayer() {
        let config = RelayerConfig::new(owner(), 10, 10).unwrap();
        assert_eq!(config.split(31337, false), (0, 31337));
    }

    #[test]
    fn zero_precision_is_invalid() {
        assert_eq!(
            RelayerConfig::new(owner(), 0, 0),
            Err(FeeError::InvalidRelayerFee)
        );
    }

    #[test]
    fn fee_above_precision_is_invalid() {
        assert_eq!(
            RelayerConfig::new(owner(), 100_000_000, 1_000_000),
            Err(FeeError::InvalidRelayerFee)
        );
    }

    #[test]
    fn update_requires_owner() {
        let mut config = config();
        assert_eq!(
            config.update(&Address([0xbb; 32]), 100_000, 100_000_000),
            Err(RegistryError::OwnerOnly.into())
        );

        config.update(&owner(), 100_000, 100_000_000).unwrap();
        assert_eq!(config.fee(), 100_000);
        assert_eq!(config.fee_precision(), 100_000_000);
    }

    #[test]
    fn update_validates_fee() {
        let mut config = config();
        assert_eq!(
            config.update(&owner(), 1, 0),
            Err(FeeError::InvalidRelayerFee.into())
        );
    }
}
