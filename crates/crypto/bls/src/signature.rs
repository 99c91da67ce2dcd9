use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U96};
use tree_hash_derive::TreeHash;

use crate::{
    constants::{G2_POINT_AT_INFINITY, SIGNATURE_BYTES_LEN},
    errors::BLSError,
};

#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Eq, Hash)]
pub struct BLSSignature {
    pub inner: FixedVector<u8, U96>,
}

impl Default for BLSSignature {
    fn default() -> Self {
        Self {
            inner: FixedVector::from_elem(0),
        }
    }
}

impl BLSSignature {
    /// The compressed G2 point at infinity, used as a signature placeholder for deposits the
    /// chain creates itself.
    pub fn infinity() -> Self {
        Self {
            inner: FixedVector::from(G2_POINT_AT_INFINITY.to_vec()),
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.to_bytes() == G2_POINT_AT_INFINITY
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, BLSError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(BLSError::InvalidByteLength {
                expected: SIGNATURE_BYTES_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            inner: FixedVector::new(bytes.to_vec()).map_err(|_| BLSError::InvalidByteLength {
                expected: SIGNATURE_BYTES_LEN,
                actual: bytes.len(),
            })?,
        })
    }

    pub fn to_bytes(&self) -> &[u8] {
        self.inner.iter().as_slice()
    }
}

impl Serialize for BLSSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for BLSSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        let clean_str = result.strip_prefix("0x").unwrap_or(&result);
        let bytes = hex::decode(clean_str).map_err(serde::de::Error::custom)?;
        BLSSignature::try_from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}
