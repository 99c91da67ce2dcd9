use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum BLSError {
    #[error("Invalid byte length: expected {expected}, got {actual}")]
    InvalidByteLength { expected: usize, actual: usize },
    #[error("Invalid hex string")]
    InvalidHexString,
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}
