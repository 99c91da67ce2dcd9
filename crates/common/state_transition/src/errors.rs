use keel_consensus_beacon::errors::StateError;
use keel_signing::errors::SigningError;
use thiserror::Error;

/// Fatal errors. The transition that returns one leaves the caller's state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// Outcome of an exit initiation that did not set a new exit epoch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExitError {
    /// Recoverable, the validator already has an exit epoch.
    #[error("Validator {index} has already exited at epoch {exit_epoch}")]
    AlreadyExited { index: u64, exit_epoch: u64 },
    #[error(transparent)]
    State(#[from] StateError),
}

/// Why a single deposit was dropped. Never fails the surrounding batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDeposit {
    #[error("Deposit amount is zero")]
    ZeroAmount,
    #[error("Unknown withdrawal credential prefix {0:#04x}")]
    UnknownWithdrawalPrefix(u8),
    #[error("Deposit signature is invalid")]
    InvalidSignature,
    #[error("Deposit of {amount} Gwei is below the activation balance")]
    BelowActivationBalance { amount: u64 },
}
