use thiserror::Error;

/// Failures raised while (de)serializing wire formats.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer too short, declared lengths inconsistent, unsupported version
    /// or an unrecognized payload id
    #[error("Malformed")]
    Malformed,

    /// Variable-length payload exceeds the format's limit
    #[error("PayloadTooLarge")]
    PayloadTooLarge,

    /// Only amounts that fit 128 bits are supported
    #[error("AmountTooHigh")]
    AmountTooHigh,
}

/// Failures raised during guardian signature verification.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Guardian set with this index does not exist
    #[error("SetNotFound")]
    SetNotFound,

    /// Guardian set has been superseded and its grace period is over
    #[error("SetExpired")]
    SetExpired,

    /// Signature does not recover to the guardian it claims to be from
    #[error("InvalidSignature")]
    InvalidSignature,

    /// Guardian indices must be strictly ascending
    #[error("InvalidSignatureOrder")]
    InvalidSignatureOrder,

    /// Not enough signatures for quorum
    #[error("QuorumNotMet")]
    QuorumNotMet,

    /// A signature names a guardian index outside the set
    #[error("TooManySignatures")]
    TooManySignatures,
}

/// Failures raised by the guardian set registry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardianSetError {
    /// No guardian set stored under the requested index
    #[error("UnknownSet")]
    UnknownSet,

    /// Caller is not the registry owner
    #[error("OwnerOnly")]
    OwnerOnly,

    /// Guardian set index must increase in steps of 1
    #[error("GuardianSetIndexIncrease")]
    GuardianSetIndexIncrease,
}

/// Failures raised by the archive of consumed VAAs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayError {
    /// VAA was already redeemed
    #[error("AlreadyRedeemed")]
    AlreadyRedeemed,
}
