//! Send and redeem orchestration.
//!
//! [`Relay`] wires the components into the two end-to-end flows:
//!
//! - **send**: encode the application payload, draw the next sequence number
//!   and hand back the unsigned body for external guardian signing.
//! - **redeem**: verify guardian signatures, check the emitter against the
//!   foreign registry, validate the payload, claim the VAA in the archive
//!   and release the effect.
//!
//! The claim is the single durable mutation of a redemption: every attempt
//! either reaches it and settles in the same operation, or fails beforehand
//! leaving no trace. Resubmitting a settled or malformed VAA is a terminal
//! rejection, never a transient one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use relay_core::{
    governance::GuardianSetUpgrade, Address, GuardianAddress, GuardianRegistry, KeyRecovery,
    Secp256k1Recovery, SequenceTracker, SignatureVerifier, Vaa, VaaArchive, VaaBody,
};

use crate::{
    amount::{denormalize_amount, normalize_amount, truncate_amount},
    error::{Error, RegistryError, TransferError},
    fee::RelayerConfig,
    message::{HelloPayload, Transfer, TransferMessage, TransferWithPayload},
    registry::{ForeignContract, ForeignRegistry},
};

/// Static configuration fixed at initialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub owner: Address,

    /// This program's chain id.
    pub chain_id: u16,

    /// This program's emitter address on its own chain.
    pub emitter: Address,

    /// Consistency level stamped on outbound messages.
    pub finality: u8,

    /// How long a superseded guardian set keeps verifying.
    pub guardian_grace_period: u64,

    pub relayer_fee: u32,
    pub relayer_fee_precision: u32,
}

/// A token transfer to prepare for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundTransfer {
    pub token_chain: u16,
    pub token_address: Address,

    /// Native decimals of the token being sent.
    pub decimals: u8,

    /// Amount in native units.
    pub amount: u128,

    pub recipient_chain: u16,
    pub recipient: Address,

    /// Optional payload for the receiving contract.
    pub payload: Option<Vec<u8>>,
}

/// A delivered hello message, retained per `(emitter_chain, sequence)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub batch_id: u32,
    pub message: Vec<u8>,
}

/// The effect released by a settled token redemption.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub token_chain: u16,
    pub token_address: Address,

    pub recipient: Address,
    /// Amount released to the recipient, in native units.
    pub recipient_amount: u128,

    /// Who submitted the redemption. Equals `recipient` on self-relay.
    pub relayer: Address,
    pub relayer_amount: u128,

    /// Opaque payload carried alongside the transfer, if any.
    pub payload: Vec<u8>,
}

/// One deployed relay endpoint: configuration plus all persistent state,
/// with every mutation funneled through its methods.
///
/// Each method call is one isolated operation against that state; all
/// validation happens before the first durable change, so a failed call is
/// indistinguishable from one that never happened.
#[derive(Debug, Clone)]
pub struct Relay<R = Secp256k1Recovery> {
    config: RelayConfig,
    guardians: GuardianRegistry,
    verifier: SignatureVerifier<R>,
    sequences: SequenceTracker,
    archive: VaaArchive,
    contracts: ForeignRegistry,
    relayer_fee: RelayerConfig,
    received: BTreeMap<(u16, u64), ReceivedMessage>,
    settlements: Vec<Settlement>,
}

impl Relay<Secp256k1Recovery> {
    pub fn new(
        config: RelayConfig,
        guardian_keys: Vec<GuardianAddress>,
        now: u64,
    ) -> Result<Self, Error> {
        Self::with_verifier(config, guardian_keys, SignatureVerifier::new(), now)
    }
}

impl<R: KeyRecovery> Relay<R> {
    pub fn with_verifier(
        config: RelayConfig,
        guardian_keys: Vec<GuardianAddress>,
        verifier: SignatureVerifier<R>,
        now: u64,
    ) -> Result<Self, Error> {
        let relayer_fee = RelayerConfig::new(
            config.owner,
            config.relayer_fee,
            config.relayer_fee_precision,
        )?;
        Ok(Relay {
            guardians: GuardianRegistry::new(
                config.owner,
                config.guardian_grace_period,
                guardian_keys,
                now,
            ),
            verifier,
            sequences: SequenceTracker::new(),
            archive: VaaArchive::new(),
            contracts: ForeignRegistry::new(config.owner, config.chain_id),
            relayer_fee,
            received: BTreeMap::new(),
            settlements: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn guardians(&self) -> &GuardianRegistry {
        &self.guardians
    }

    pub fn relayer_fee(&self) -> &RelayerConfig {
        &self.relayer_fee
    }

    pub fn foreign_contract(&self, chain: u16) -> Result<&ForeignContract, RegistryError> {
        self.contracts.resolve(chain)
    }

    /// Sequence the next outbound message will carry.
    pub fn next_sequence(&self) -> u64 {
        self.sequences.value(&self.config.emitter)
    }

    pub fn received(&self, emitter_chain: u16, sequence: u64) -> Option<&ReceivedMessage> {
        self.received.get(&(emitter_chain, sequence))
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    // --- owner-gated administration ---

    pub fn register_foreign_contract(
        &mut self,
        caller: &Address,
        chain: u16,
        address: Address,
        bridge_address: Option<Address>,
    ) -> Result<(), Error> {
        Ok(self
            .contracts
            .register(caller, chain, address, bridge_address)?)
    }

    pub fn update_relayer_fee(
        &mut self,
        caller: &Address,
        fee: u32,
        fee_precision: u32,
    ) -> Result<(), Error> {
        self.relayer_fee.update(caller, fee, fee_precision)
    }

    pub fn rotate_guardian_set(
        &mut self,
        caller: &Address,
        new_index: u32,
        keys: Vec<GuardianAddress>,
        now: u64,
    ) -> Result<(), Error> {
        Ok(self.guardians.supersede(caller, new_index, keys, now)?)
    }

    /// Applies a guardian rotation from its governance wire payload.
    pub fn apply_guardian_upgrade(
        &mut self,
        caller: &Address,
        payload: &[u8],
        now: u64,
    ) -> Result<(), Error> {
        let upgrade = GuardianSetUpgrade::deserialize(payload)?;
        Ok(upgrade.apply(&mut self.guardians, caller, now)?)
    }

    // --- send path ---

    /// Prepares a hello message for sending and returns the unsigned body to
    /// hand off for guardian signing.
    pub fn send_message(
        &mut self,
        message: &[u8],
        nonce: u32,
        now: u64,
    ) -> Result<VaaBody, Error> {
        let payload = HelloPayload::Hello {
            message: message.to_vec(),
        }
        .serialize()?;

        let body = self.outbound_body(payload, nonce, now);
        debug!(sequence = body.sequence, len = message.len(), "send_message");
        Ok(body)
    }

    /// Prepares a token transfer for sending.
    ///
    /// The debited amount is `truncate_amount(transfer.amount)`: dust below
    /// wire precision never leaves the sender.
    pub fn send_tokens(
        &mut self,
        transfer: OutboundTransfer,
        nonce: u32,
        now: u64,
    ) -> Result<VaaBody, Error> {
        if transfer.recipient.is_zero() {
            return Err(TransferError::InvalidRecipient.into());
        }
        let _ = self.contracts.resolve(transfer.recipient_chain)?;

        let amount = normalize_amount(transfer.amount, transfer.decimals);
        if amount == 0 {
            return Err(TransferError::ZeroBridgeAmount.into());
        }

        let message = match transfer.payload {
            Some(payload) => TransferMessage::TransferWithPayload(TransferWithPayload {
                amount,
                token_address: transfer.token_address,
                token_chain: transfer.token_chain,
                recipient: transfer.recipient,
                recipient_chain: transfer.recipient_chain,
                sender: self.config.emitter,
                payload,
            }),
            None => TransferMessage::Transfer(Transfer {
                amount,
                token_address: transfer.token_address,
                token_chain: transfer.token_chain,
                recipient: transfer.recipient,
                recipient_chain: transfer.recipient_chain,
            }),
        };

        let body = self.outbound_body(message.serialize(), nonce, now);
        info!(
            sequence = body.sequence,
            amount = truncate_amount(transfer.amount, transfer.decimals),
            recipient_chain = transfer.recipient_chain,
            "send_tokens"
        );
        Ok(body)
    }

    fn outbound_body(&mut self, payload: Vec<u8>, nonce: u32, now: u64) -> VaaBody {
        VaaBody {
            timestamp: now as u32,
            nonce,
            emitter_chain: self.config.chain_id,
            emitter_address: self.config.emitter,
            sequence: self.sequences.next(&self.config.emitter),
            consistency_level: self.config.finality,
            payload,
        }
    }

    // --- redeem path ---

    /// Consumes a hello-message VAA and retains the delivered message.
    pub fn receive_message(&mut self, data: &[u8], now: u64) -> Result<ReceivedMessage, Error> {
        let vaa = self.verify(data, now)?;
        self.contracts
            .verify_emitter(vaa.body.emitter_chain, &vaa.body.emitter_address)?;

        let message = match HelloPayload::deserialize(&vaa.body.payload)? {
            // liveness pings are never deliverable
            HelloPayload::Alive { .. } => return Err(TransferError::InvalidMessage.into()),
            HelloPayload::Hello { message } => message,
        };

        self.archive.claim(vaa.digest().hash)?;

        let received = ReceivedMessage {
            batch_id: vaa.body.nonce,
            message,
        };
        let _ = self
            .received
            .insert((vaa.body.emitter_chain, vaa.body.sequence), received.clone());

        info!(
            emitter_chain = vaa.body.emitter_chain,
            sequence = vaa.body.sequence,
            "receive_message"
        );
        Ok(received)
    }

    /// Consumes a token-transfer VAA and releases the custody effect,
    /// splitting off the relayer fee when `submitter` is not the recipient.
    ///
    /// `decimals` are the native decimals of the transferred token on this
    /// chain; the wire amount is scaled back up by them.
    pub fn redeem_transfer(
        &mut self,
        data: &[u8],
        submitter: &Address,
        decimals: u8,
        now: u64,
    ) -> Result<Settlement, Error> {
        let vaa = self.verify(data, now)?;

        // the emitter must be the trusted relay contract for its chain
        let registered = self.contracts.resolve(vaa.body.emitter_chain)?;
        if registered.address != vaa.body.emitter_address {
            return Err(RegistryError::InvalidForeignContract.into());
        }

        let message = TransferMessage::deserialize(&vaa.body.payload)?;
        if message.recipient_chain() != self.config.chain_id {
            return Err(TransferError::WrongTargetChain.into());
        }

        let amount = denormalize_amount(message.amount(), decimals);
        let is_self_relay = submitter == message.recipient();
        let (recipient_amount, relayer_amount) = self.relayer_fee.split(amount, is_self_relay);

        self.archive.claim(vaa.digest().hash)?;

        let settlement = Settlement {
            token_chain: message.token_chain(),
            token_address: *message.token_address(),
            recipient: *message.recipient(),
            recipient_amount,
            relayer: *submitter,
            relayer_amount,
            payload: message.payload().to_vec(),
        };
        self.settlements.push(settlement.clone());

        info!(
            emitter_chain = vaa.body.emitter_chain,
            sequence = vaa.body.sequence,
            recipient_amount,
            relayer_amount,
            "redeem_transfer"
        );
        Ok(settlement)
    }

    fn verify(&self, data: &[u8], now: u64) -> Result<Vaa, Error> {
        let vaa = Vaa::deserialize(data)?;
        self.verifier.verify(&self.guardians, &vaa, now)?;
        Ok(vaa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_survives_serialization() {
        let settlement = Settlement {
            token_chain: 2,
            token_address: Address([0x11; 32]),
            recipient: Address([0x22; 32]),
            recipient_amount: 31024,
            relayer: Address([0x33; 32]),
            relayer_amount: 313,
            payload: b"hello token".to_vec(),
        };

        let json = serde_json::to_string(&settlement).unwrap();
        let restored: Settlement = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settlement);
    }
}
