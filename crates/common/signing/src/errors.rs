use keel_bls::errors::BLSError;
use keel_consensus_beacon::errors::StateError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("Failed to decode message: {0}")]
    Encoding(String),
    #[error("Missing public key")]
    MissingPublicKey,
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(BLSError),
    #[error("Invalid signature: {0}")]
    InvalidSignature(BLSError),
    #[error("Signature did not verify against the signing root")]
    SignatureMismatch,
    #[error("Failed to sign: {0}")]
    Signing(BLSError),
    #[error(transparent)]
    State(#[from] StateError),
}
