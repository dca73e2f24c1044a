use thiserror::Error;

use relay_core::error::{CodecError, GuardianSetError, ReplayError, VerifyError};

/// Failures raised by the foreign contract registry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the owner
    #[error("OwnerOnly")]
    OwnerOnly,

    /// Chain id unset, equal to this chain, or zero contract address;
    /// also raised when an inbound transfer names an emitter other than
    /// the registered contract for its chain
    #[error("InvalidForeignContract")]
    InvalidForeignContract,

    /// No contract registered for the requested chain
    #[error("UnregisteredChain")]
    UnregisteredChain,

    /// Inbound message emitter does not match the registered contract
    #[error("InvalidForeignEmitter")]
    InvalidForeignEmitter,
}

/// Failures raised by the relayer fee engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeError {
    /// Fee precision of zero, or fee above precision
    #[error("InvalidRelayerFee")]
    InvalidRelayerFee,
}

/// Failures raised while preparing or settling transfers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// Amount normalizes to zero and would bridge nothing
    #[error("ZeroBridgeAmount")]
    ZeroBridgeAmount,

    /// Transfer names the zero address as recipient
    #[error("InvalidRecipient")]
    InvalidRecipient,

    /// Payload is a liveness ping, not a deliverable message
    #[error("InvalidMessage")]
    InvalidMessage,

    /// Transfer is destined for a different chain
    #[error("WrongTargetChain")]
    WrongTargetChain,
}

/// Unified error surface of the relay.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Guardians(#[from] GuardianSetError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
