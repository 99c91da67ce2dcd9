use alloy_primitives::B256;
use keel_bls::{BLSSignature, PublicKey, errors::BLSError, traits::Verifiable};
use keel_consensus_misc::misc::compute_signing_root;
use ssz::Decode;
use tree_hash::TreeHash;

use crate::errors::SigningError;

/// Verify ``signature`` by ``public_key`` over the signing root of ``container`` in ``domain``.
///
/// Takes raw bytes from the wire. Lengths are checked before anything reaches the BLS backend,
/// and every malformed input is reported as an error.
pub fn verify_signing_root<T: TreeHash>(
    container: &T,
    public_key: &[u8],
    signature: &[u8],
    domain: B256,
) -> Result<(), SigningError> {
    if public_key.is_empty() {
        return Err(SigningError::MissingPublicKey);
    }
    let public_key =
        PublicKey::try_from_bytes(public_key).map_err(SigningError::InvalidPublicKey)?;
    let signature =
        BLSSignature::try_from_bytes(signature).map_err(SigningError::InvalidSignature)?;

    let signing_root = compute_signing_root(container, domain);
    match signature.verify(&public_key, signing_root.as_slice()) {
        Ok(true) => Ok(()),
        Ok(false) => Err(SigningError::SignatureMismatch),
        Err(err @ BLSError::InvalidPublicKey(_)) => Err(SigningError::InvalidPublicKey(err)),
        Err(err) => Err(SigningError::InvalidSignature(err)),
    }
}

/// Decode an untrusted SSZ message and return its signing root in ``domain``.
pub fn decode_and_compute_signing_root<T: Decode + TreeHash>(
    bytes: &[u8],
    domain: B256,
) -> Result<B256, SigningError> {
    let message = T::from_ssz_bytes(bytes)
        .map_err(|err| SigningError::Encoding(format!("{err:?}")))?;
    Ok(compute_signing_root(&message, domain))
}
