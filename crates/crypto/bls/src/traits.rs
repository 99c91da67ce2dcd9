use crate::{BLSSignature, PublicKey};

pub trait Signable {
    type Error;

    /// Signs `message` under the beacon chain ciphersuite.
    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error>;
}

pub trait Verifiable {
    type Error;

    /// Verifies a BLS signature against a public key and message.
    ///
    /// # Returns
    /// * `Result<bool, Self::Error>` - Ok(true) if the signature is valid, Ok(false) if
    ///   verification fails, or Err if the signature or public key bytes do not decode to a
    ///   valid curve point
    fn verify(&self, public_key: &PublicKey, message: &[u8]) -> Result<bool, Self::Error>;
}
