use alloy_primitives::B256;
use blst::min_pk::SecretKey as BlstSecretKey;

use crate::{
    PrivateKey, PublicKey,
    constants::DST,
    errors::BLSError,
    signature::BLSSignature,
    traits::Signable,
};

impl PrivateKey {
    /// Derives a private key from input keying material (EIP-2333 `KeyGen`). `ikm` must be at
    /// least 32 bytes.
    pub fn from_ikm(ikm: &[u8]) -> Result<Self, BLSError> {
        let private_key = BlstSecretKey::key_gen(ikm, &[])
            .map_err(|err| BLSError::InvalidPrivateKey(format!("{err:?}")))?;
        Ok(Self {
            inner: B256::from(private_key.to_bytes()),
        })
    }

    pub fn public_key(&self) -> Result<PublicKey, BLSError> {
        let public_key = self.to_blst_private_key()?.sk_to_pk();
        PublicKey::try_from_bytes(&public_key.to_bytes())
    }

    fn to_blst_private_key(&self) -> Result<BlstSecretKey, BLSError> {
        BlstSecretKey::from_bytes(self.inner.as_slice())
            .map_err(|err| BLSError::InvalidPrivateKey(format!("{err:?}")))
    }
}

impl Signable for PrivateKey {
    type Error = BLSError;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error> {
        let signature = self.to_blst_private_key()?.sign(message, DST, &[]);
        BLSSignature::try_from_bytes(&signature.to_bytes())
    }
}
