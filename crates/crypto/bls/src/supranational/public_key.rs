use blst::min_pk::PublicKey as BlstPublicKey;

use crate::{errors::BLSError, public_key::PublicKey};

impl PublicKey {
    pub fn to_blst_public_key(&self) -> Result<BlstPublicKey, BLSError> {
        BlstPublicKey::from_bytes(self.to_bytes())
            .map_err(|err| BLSError::InvalidPublicKey(format!("{err:?}")))
    }
}
