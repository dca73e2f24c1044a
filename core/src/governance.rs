//! Governance payloads.

use crate::{
    byte_utils::ByteUtils,
    error::{CodecError, GuardianSetError},
    guardian_set::GuardianRegistry,
    Address, GuardianAddress,
};

/// Guardian set rotation payload.
///
/// ```markdown
/// 0   uint32      new_index
/// 4   uint8       len(keys)
/// 5   [][20]uint8 guardian addresses
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianSetUpgrade {
    pub new_index: u32,
    pub keys: Vec<GuardianAddress>,
}

impl GuardianSetUpgrade {
    const ADDRESS_LEN: usize = 20;

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < 5 {
            return Err(CodecError::Malformed);
        }

        let new_index = data.get_u32(0);
        let len = data.get_u8(4) as usize;
        if data.len() != 5 + len * Self::ADDRESS_LEN {
            return Err(CodecError::Malformed);
        }

        let mut keys = Vec::with_capacity(len);
        for i in 0..len {
            let pos = 5 + i * Self::ADDRESS_LEN;
            keys.push(GuardianAddress(data.get_const_bytes(pos)));
        }

        Ok(GuardianSetUpgrade { new_index, keys })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + self.keys.len() * Self::ADDRESS_LEN);
        out.extend_from_slice(&self.new_index.to_be_bytes());
        out.push(self.keys.len() as u8);
        for key in &self.keys {
            out.extend_from_slice(&key.0);
        }
        out
    }

    /// Applies the rotation to `registry`.
    pub fn apply(
        self,
        registry: &mut GuardianRegistry,
        caller: &Address,
        now: u64,
    ) -> Result<(), GuardianSetError> {
        registry.supersede(caller, self.new_index, self.keys, now)
    }
}
