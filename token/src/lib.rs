//! Token transfer and payload delivery layer on top of [`relay_core`].
//!
//! Where `relay-core` answers "did the guardians really sign this", this
//! crate answers "should this program act on it, and what exactly does it
//! release": trusted foreign contracts per chain, application payload
//! codecs, decimal normalization of bridged amounts, the relayer fee split,
//! and the send/redeem orchestration that ties it all together.

pub mod amount;
pub mod error;
pub mod fee;
pub mod message;
pub mod registry;
pub mod relay;

pub use {
    error::Error,
    fee::RelayerConfig,
    message::{HelloPayload, Transfer, TransferMessage, TransferWithPayload},
    registry::{ForeignContract, ForeignRegistry},
    relay::{OutboundTransfer, ReceivedMessage, Relay, RelayConfig, Settlement},
};
