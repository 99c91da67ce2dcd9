use std::cmp::{max, min};

use keel_consensus_misc::constants::EFFECTIVE_BALANCE_INCREMENT;
use keel_network_spec::networks::BeaconNetworkSpec;

/// Return the churn limit for the current epoch.
pub fn get_balance_churn_limit(total_active_balance: u64, network_spec: &BeaconNetworkSpec) -> u64 {
    let churn = max(
        network_spec.min_per_epoch_churn_limit_electra,
        total_active_balance / network_spec.churn_limit_quotient.max(1),
    );
    churn - churn % EFFECTIVE_BALANCE_INCREMENT
}

/// Return the churn limit for the current epoch dedicated to activations and exits.
pub fn get_activation_exit_churn_limit(
    total_active_balance: u64,
    network_spec: &BeaconNetworkSpec,
) -> u64 {
    min(
        network_spec.max_per_epoch_activation_exit_churn_limit,
        get_balance_churn_limit(total_active_balance, network_spec),
    )
}

#[cfg(test)]
mod tests {
    use keel_network_spec::networks::MAINNET;
    use rstest::rstest;

    use super::*;

    #[rstest]
    // Small networks sit on the floor.
    #[case(1_000_000_000_000, 128_000_000_000, 128_000_000_000)]
    // 10M ETH staked: 152.58 ETH rounded down to the increment.
    #[case(10_000_000_000_000_000, 152_000_000_000, 152_000_000_000)]
    // 34M ETH staked: activations and exits are capped.
    #[case(34_000_000_000_000_000, 518_000_000_000, 256_000_000_000)]
    fn test_mainnet_churn_limits(
        #[case] total_active_balance: u64,
        #[case] balance_churn: u64,
        #[case] activation_exit_churn: u64,
    ) {
        assert_eq!(
            get_balance_churn_limit(total_active_balance, &MAINNET),
            balance_churn
        );
        assert_eq!(
            get_activation_exit_churn_limit(total_active_balance, &MAINNET),
            activation_exit_churn
        );
    }
}
