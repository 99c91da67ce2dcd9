use alloy_primitives::B256;
use keel_bls::PublicKey;
use keel_consensus_misc::{
    constants::{
        ETH1_ADDRESS_WITHDRAWAL_PREFIX, FAR_FUTURE_EPOCH, MAX_EFFECTIVE_BALANCE_ELECTRA,
        MIN_ACTIVATION_BALANCE,
    },
    misc::is_compounding_withdrawal_credential,
};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,

    /// Commitment to pubkey for withdrawals
    pub withdrawal_credentials: B256,

    /// Balance at stake
    #[serde(with = "serde_utils::quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,

    /// When criteria for activation were met
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub exit_epoch: u64,

    /// When validator can withdraw funds
    #[serde(with = "serde_utils::quoted_u64")]
    pub withdrawable_epoch: u64,

    /// Balance ceiling the bail-out check compares the actual balance against
    #[serde(with = "serde_utils::quoted_u64")]
    pub principal_balance: u64,
}

impl Validator {
    /// Check if ``validator`` has an 0x01 prefixed "eth1" withdrawal credential.
    pub fn has_eth1_withdrawal_credential(&self) -> bool {
        self.withdrawal_credentials[0] == ETH1_ADDRESS_WITHDRAWAL_PREFIX
    }

    /// Check if ``validator`` has an 0x02 prefixed "compounding" withdrawal credential.
    pub fn has_compounding_withdrawal_credential(&self) -> bool {
        is_compounding_withdrawal_credential(self.withdrawal_credentials)
    }

    pub fn is_active_validator(&self, epoch: u64) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }

    /// An exit has been initiated and has not taken effect yet.
    pub fn is_exiting(&self, epoch: u64) -> bool {
        self.exit_epoch != FAR_FUTURE_EPOCH && epoch < self.exit_epoch
    }

    /// Check if ``validator`` is eligible to be placed into the activation queue.
    pub fn is_eligible_for_activation_queue(&self) -> bool {
        self.activation_eligibility_epoch == FAR_FUTURE_EPOCH
            && self.effective_balance >= MIN_ACTIVATION_BALANCE
    }

    /// Check if ``validator`` is eligible for activation.
    pub fn is_eligible_for_activation(&self, finalized_epoch: u64) -> bool {
        // Placement in queue is finalized
        self.activation_eligibility_epoch <= finalized_epoch
            // Has not yet been activated
            && self.activation_epoch == FAR_FUTURE_EPOCH
    }

    /// Get max effective balance for ``validator``.
    pub fn get_max_effective_balance(&self) -> u64 {
        if self.has_compounding_withdrawal_credential() {
            MAX_EFFECTIVE_BALANCE_ELECTRA
        } else {
            MIN_ACTIVATION_BALANCE
        }
    }
}

#[cfg(test)]
mod tests {
    use keel_consensus_misc::constants::COMPOUNDING_WITHDRAWAL_PREFIX;
    use rstest::rstest;

    use super::*;

    fn validator(withdrawal_prefix: u8) -> Validator {
        let mut withdrawal_credentials = B256::ZERO;
        withdrawal_credentials[0] = withdrawal_prefix;
        Validator {
            public_key: PublicKey::default(),
            withdrawal_credentials,
            effective_balance: MIN_ACTIVATION_BALANCE,
            slashed: false,
            activation_eligibility_epoch: FAR_FUTURE_EPOCH,
            activation_epoch: FAR_FUTURE_EPOCH,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
            principal_balance: MIN_ACTIVATION_BALANCE,
        }
    }

    #[rstest]
    #[case(ETH1_ADDRESS_WITHDRAWAL_PREFIX, MIN_ACTIVATION_BALANCE)]
    #[case(COMPOUNDING_WITHDRAWAL_PREFIX, MAX_EFFECTIVE_BALANCE_ELECTRA)]
    fn test_max_effective_balance(#[case] prefix: u8, #[case] expected: u64) {
        assert_eq!(validator(prefix).get_max_effective_balance(), expected);
    }

    #[test]
    fn test_exiting_window() {
        let mut validator = validator(ETH1_ADDRESS_WITHDRAWAL_PREFIX);
        assert!(!validator.is_exiting(5));
        validator.exit_epoch = 10;
        assert!(validator.is_exiting(9));
        assert!(!validator.is_exiting(10));
    }

    #[test]
    fn test_activation_eligibility() {
        let mut validator = validator(ETH1_ADDRESS_WITHDRAWAL_PREFIX);
        assert!(validator.is_eligible_for_activation_queue());
        validator.activation_eligibility_epoch = 4;
        assert!(!validator.is_eligible_for_activation_queue());
        assert!(!validator.is_eligible_for_activation(3));
        assert!(validator.is_eligible_for_activation(4));
        validator.activation_epoch = 9;
        assert!(!validator.is_eligible_for_activation(4));
    }
}
