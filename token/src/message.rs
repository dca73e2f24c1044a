//! Application payload codecs.
//!
//! Two payload families share the relay: free-form hello messages and token
//! transfers. Both are length-prefixed-or-fixed-offset big-endian formats
//! with a leading payload id byte, and both decode strictly: any surplus,
//! shortfall or unknown id is malformed.

use serde::{Deserialize, Serialize};

use relay_core::{byte_utils::ByteUtils, error::CodecError, Address};

/// Free-form message payload.
///
/// ```markdown
/// id 0 (alive ping):   0  u8        payload id
///                      1  [32]u8    emitting program id
/// id 1 (hello):        0  u8        payload id
///                      1  u16       message length
///                      3  []u8      message
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum HelloPayload {
    /// Liveness ping emitted by a program about itself. Decodable so it can
    /// be recognized, never deliverable.
    Alive { program_id: Address },
    /// An actual message for delivery.
    Hello { message: Vec<u8> },
}

impl HelloPayload {
    pub const ALIVE: u8 = 0;
    pub const HELLO: u8 = 1;

    /// Hello messages are capped at 512 bytes.
    pub const MAX_MESSAGE_LEN: usize = 512;

    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            HelloPayload::Alive { program_id } => {
                let mut out = Vec::with_capacity(33);
                out.push(Self::ALIVE);
                out.extend_from_slice(&program_id.0);
                Ok(out)
            }
            HelloPayload::Hello { message } => {
                if message.len() > Self::MAX_MESSAGE_LEN {
                    return Err(CodecError::PayloadTooLarge);
                }
                let mut out = Vec::with_capacity(3 + message.len());
                out.push(Self::HELLO);
                out.extend_from_slice(&(message.len() as u16).to_be_bytes());
                out.extend_from_slice(message);
                Ok(out)
            }
        }
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        if data.is_empty() {
            return Err(CodecError::Malformed);
        }
        match data.get_u8(0) {
            Self::ALIVE => {
                if data.len() != 33 {
                    return Err(CodecError::Malformed);
                }
                Ok(HelloPayload::Alive {
                    program_id: Address(data.get_const_bytes(1)),
                })
            }
            Self::HELLO => {
                if data.len() < 3 {
                    return Err(CodecError::Malformed);
                }
                let length = data.get_u16(1) as usize;
                if length > Self::MAX_MESSAGE_LEN {
                    return Err(CodecError::PayloadTooLarge);
                }
                if data.len() - 3 != length {
                    return Err(CodecError::Malformed);
                }
                Ok(HelloPayload::Hello {
                    message: data[3..].to_vec(),
                })
            }
            _ => Err(CodecError::Malformed),
        }
    }
}

/// A plain token transfer.
///
/// ```markdown
/// 0    u8        payload id (1)
/// 1    u256      amount, normalized to 8 decimals
/// 33   [32]u8    token address
/// 65   u16       token chain
/// 67   [32]u8    recipient
/// 99   u16       recipient chain
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub amount: u128,
    pub token_address: Address,
    pub token_chain: u16,
    pub recipient: Address,
    pub recipient_chain: u16,
}

/// A token transfer carrying an opaque payload for the receiving contract,
/// stamped with the sending contract's identity.
///
/// Same layout as [`Transfer`] with payload id 3, followed by:
///
/// ```markdown
/// 101  [32]u8    sender
/// 133  []u8      payload
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct TransferWithPayload {
    pub amount: u128,
    pub token_address: Address,
    pub token_chain: u16,
    pub recipient: Address,
    pub recipient_chain: u16,
    pub sender: Address,
    pub payload: Vec<u8>,
}

/// Either token transfer variant, as found on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum TransferMessage {
    Transfer(Transfer),
    TransferWithPayload(TransferWithPayload),
}

impl TransferMessage {
    pub const TRANSFER: u8 = 1;
    pub const TRANSFER_WITH_PAYLOAD: u8 = 3;

    pub const AMOUNT_POS: usize = 1;
    pub const TOKEN_ADDRESS_POS: usize = 33;
    pub const TOKEN_CHAIN_POS: usize = 65;
    pub const RECIPIENT_POS: usize = 67;
    pub const RECIPIENT_CHAIN_POS: usize = 99;
    pub const SENDER_POS: usize = 101;
    pub const PAYLOAD_POS: usize = 133;

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        if data.is_empty() {
            return Err(CodecError::Malformed);
        }
        let id = data.get_u8(0);
        let fixed_len = match id {
            Self::TRANSFER => Self::SENDER_POS,
            Self::TRANSFER_WITH_PAYLOAD => Self::PAYLOAD_POS,
            _ => return Err(CodecError::Malformed),
        };
        if data.len() < fixed_len {
            return Err(CodecError::Malformed);
        }

        // amounts above 128 bits are unbridgeable
        let (too_high, amount) = data.get_u256(Self::AMOUNT_POS);
        if too_high != 0 {
            return Err(CodecError::AmountTooHigh);
        }

        let token_address = Address(data.get_const_bytes(Self::TOKEN_ADDRESS_POS));
        let token_chain = data.get_u16(Self::TOKEN_CHAIN_POS);
        let recipient = Address(data.get_const_bytes(Self::RECIPIENT_POS));
        let recipient_chain = data.get_u16(Self::RECIPIENT_CHAIN_POS);

        match id {
            Self::TRANSFER => {
                if data.len() != fixed_len {
                    return Err(CodecError::Malformed);
                }
                Ok(TransferMessage::Transfer(Transfer {
                    amount,
                    token_address,
                    token_chain,
                    recipient,
                    recipient_chain,
                }))
            }
            _ => Ok(TransferMessage::TransferWithPayload(TransferWithPayload {
                amount,
                token_address,
                token_chain,
                recipient,
                recipient_chain,
                sender: Address(data.get_const_bytes(Self::SENDER_POS)),
                payload: data[Self::PAYLOAD_POS..].to_vec(),
            })),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let (id, fixed) = match self {
            TransferMessage::Transfer(_) => (Self::TRANSFER, Self::SENDER_POS),
            TransferMessage::TransferWithPayload(t) => {
                (Self::TRANSFER_WITH_PAYLOAD, Self::PAYLOAD_POS + t.payload.len())
            }
        };
        let mut out = Vec::with_capacity(fixed);
        out.push(id);
        out.extend_from_slice(&[0u8; 16]);
        out.extend_from_slice(&self.amount().to_be_bytes());
        out.extend_from_slice(&self.token_address().0);
        out.extend_from_slice(&self.token_chain().to_be_bytes());
        out.extend_from_slice(&self.recipient().0);
        out.extend_from_slice(&self.recipient_chain().to_be_bytes());
        if let TransferMessage::TransferWithPayload(t) = self {
            out.extend_from_slice(&t.sender.0);
            out.extend_from_slice(&t.payload);
        }
        out
    }

    pub fn amount(&self) -> u128 {
        match self {
            TransferMessage::Transfer(t) => t.amount,
            TransferMessage::TransferWithPayload(t) => t.amount,
        }
    }

    pub fn token_address(&self) -> &Address {
        match self {
            TransferMessage::Transfer(t) => &t.token_address,
            TransferMessage::TransferWithPayload(t) => &t.token_address,
        }
    }

    pub fn token_chain(&self) -> u16 {
        match self {
            TransferMessage::Transfer(t) => t.token_chain,
            TransferMessage::TransferWithPayload(t) => t.token_chain,
        }
    }

    pub fn recipient(&self) -> &Address {
        match self {
            TransferMessage::Transfer(t) => &t.recipient,
            TransferMessage::TransferWithPayload(t) => &t.recipient,
        }
    }

    pub fn recipient_chain(&self) -> u16 {
        match self {
            TransferMessage::Transfer(t) => t.recipient_chain,
            TransferMessage::TransferWithPayload(t) => t.recipient_chain,
        }
    }

    /// Opaque payload for the receiving contract; empty for plain transfers.
    pub fn payload(&self) -> &[u8] {
        match self {
            TransferMessage::Transfer(_) => &[],
            TransferMessage::TransferWithPayload(t) => &t.payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trip() {
        let payload = HelloPayload::Hello {
            message: b"somebody set up us the bomb".to_vec(),
        };
        let bytes = payload.serialize().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..3], &27u16.to_be_bytes());
        assert_eq!(HelloPayload::deserialize(&bytes).unwrap(), payload);
    }

    #[test]
    fn hello_at_limit_is_accepted() {
        let payload = HelloPayload::Hello {
            message: vec![0x42; 512],
        };
        let bytes = payload.serialize().unwrap();
        assert_eq!(HelloPayload::deserialize(&bytes).unwrap(), payload);
    }

    #[test]
    fn hello_over_limit_is_rejected_both_ways() {
        let payload = HelloPayload::Hello {
            message: vec![0x42; 513],
        };
        assert_eq!(payload.serialize(), Err(CodecError::PayloadTooLarge));

        let mut bytes = vec![HelloPayload::HELLO];
        bytes.extend_from_slice(&513u16.to_be_bytes());
        bytes.extend_from_slice(&[0x42; 513]);
        assert_eq!(
            HelloPayload::deserialize(&bytes),
            Err(CodecError::PayloadTooLarge)
        );
    }

    #[test]
    fn hello_length_mismatch_is_malformed() {
        let mut bytes = vec![HelloPayload::HELLO];
        bytes.extend_from_slice(&10u16.to_be_bytes());
        bytes.extend_from_slice(b"short");
        assert_eq!(
            HelloPayload::deserialize(&bytes),
            Err(CodecError::Malformed)
        );
    }

    #[test]
    fn alive_round_trip() {
        let payload = HelloPayload::Alive {
            program_id: Address([0x13; 32]),
        };
        let bytes = payload.serialize().unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(HelloPayload::deserialize(&bytes).unwrap(), payload);
    }

    #[test]
    fn unknown_payload_id_is_malformed() {
        let bytes = [2u8, 0, 1, 0x42];
        assert_eq!(
            HelloPayload::deserialize(&bytes),
            Err(CodecError::Malformed)
        );
    }

    fn sample_transfer() -> Transfer {
        Transfer {
            amount: 31337,
            token_address: Address([0x11; 32]),
            token_chain: 1,
            recipient: Address([0x22; 32]),
            recipient_chain: 2,
        }
    }

    #[test]
    fn transfer_round_trip() {
        let message = TransferMessage::Transfer(sample_transfer());
        let bytes = message.serialize();
        assert_eq!(bytes.len(), TransferMessage::SENDER_POS);
        assert_eq!(TransferMessage::deserialize(&bytes).unwrap(), message);
    }

    #[test]
    fn transfer_with_payload_round_trip() {
        let message = TransferMessage::TransferWithPayload(TransferWithPayload {
            amount: 31337,
            token_address: Address([0x11; 32]),
            token_chain: 1,
            recipient: Address([0x22; 32]),
            recipient_chain: 2,
            sender: Address([0x33; 32]),
            payload: b"hello token".to_vec(),
        });
        let bytes = message.serialize();
        assert_eq!(bytes[0], 3);
        assert_eq!(TransferMessage::deserialize(&bytes).unwrap(), message);
    }

    #[test]
    fn transfer_with_empty_payload_round_trips() {
        let message = TransferMessage::TransferWithPayload(TransferWithPayload {
            sender: Address([0x33; 32]),
            ..TransferWithPayload::default()
        });
        let bytes = message.serialize();
        assert_eq!(bytes.len(), TransferMessage::PAYLOAD_POS);
        assert_eq!(TransferMessage::deserialize(&bytes).unwrap(), message);
    }

    #[test]
    fn short_transfer_is_malformed() {
        let bytes = TransferMessage::Transfer(sample_transfer()).serialize();
        assert_eq!(
            TransferMessage::deserialize(&bytes[..bytes.len() - 1]),
            Err(CodecError::Malformed)
        );
    }

    #[test]
    fn unknown_transfer_id_is_malformed() {
        let mut bytes = TransferMessage::Transfer(sample_transfer()).serialize();
        bytes[0] = 2;
        assert_eq!(
            TransferMessage::deserialize(&bytes),
            Err(CodecError::Malformed)
        );
    }

    #[test]
    fn oversized_amount_is_rejected() {
        let mut bytes = TransferMessage::Transfer(sample_transfer()).serialize();
        bytes[TransferMessage::AMOUNT_POS] = 1;
        assert_eq!(
            TransferMessage::deserialize(&bytes),
            Err(CodecError::AmountTooHigh)
        );
    }
}
