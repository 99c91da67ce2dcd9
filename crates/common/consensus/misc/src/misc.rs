use alloy_primitives::{B256, aliases::B32};
use tree_hash::TreeHash;

use crate::{
    constants::{COMPOUNDING_WITHDRAWAL_PREFIX, MAX_SEED_LOOKAHEAD, SLOTS_PER_EPOCH},
    fork_data::ForkData,
    signing_data::SigningData,
};

pub mod checksummed_address {
    use alloy_primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&address.to_checksum(None))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        value.parse::<Address>().map_err(D::Error::custom)
    }
}

pub fn compute_signing_root<SSZObject: TreeHash>(ssz_object: &SSZObject, domain: B256) -> B256 {
    SigningData {
        object_root: ssz_object.tree_hash_root(),
        domain,
    }
    .tree_hash_root()
}

/// Return the epoch number at ``slot``.
pub fn compute_epoch_at_slot(slot: u64) -> u64 {
    slot / SLOTS_PER_EPOCH
}

/// Return the start slot of ``epoch``.
pub fn compute_start_slot_at_epoch(epoch: u64) -> u64 {
    epoch.saturating_mul(SLOTS_PER_EPOCH)
}

/// Return the epoch during which validator activations and exits initiated in ``epoch`` take
/// effect.
pub fn compute_activation_exit_epoch(epoch: u64) -> u64 {
    epoch.saturating_add(1 + MAX_SEED_LOOKAHEAD)
}

/// Return the domain for the ``domain_type`` and ``fork_version``.
///
/// Callers that want the chain defaults resolve them first, see `SigningDomain::compute_domain`.
pub fn compute_domain(
    domain_type: B32,
    fork_version: B32,
    genesis_validators_root: B256,
) -> B256 {
    let fork_data_root = ForkData {
        current_version: fork_version,
        genesis_validators_root,
    }
    .compute_fork_data_root();
    let mut domain = B256::ZERO;
    domain[..4].copy_from_slice(domain_type.as_slice());
    domain[4..].copy_from_slice(&fork_data_root[..28]);
    domain
}

pub fn is_compounding_withdrawal_credential(withdrawal_credentials: B256) -> bool {
    withdrawal_credentials[0] == COMPOUNDING_WITHDRAWAL_PREFIX
}
