use std::sync::{Arc, LazyLock};

use alloy_primitives::{aliases::B32, fixed_bytes};
use keel_consensus_misc::fork::Fork;
use serde::Deserialize;

use crate::fork_schedule::ForkSchedule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Dev,
    Custom(String),
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match String::deserialize(deserializer)?.as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "dev" => Ok(Network::Dev),
            custom => Ok(Network::Custom(custom.to_string())),
        }
    }
}

/// Runtime configuration of a beacon network. Passed by reference into every transition.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct BeaconNetworkSpec {
    pub preset_base: String,
    #[serde(rename = "CONFIG_NAME")]
    pub network: Network,

    // Genesis
    #[serde(with = "crate::b32_hex")]
    pub genesis_fork_version: B32,

    // Forking
    #[serde(with = "crate::b32_hex")]
    pub deneb_fork_version: B32,
    pub deneb_fork_epoch: u64,
    #[serde(with = "crate::b32_hex")]
    pub electra_fork_version: B32,
    pub electra_fork_epoch: u64,

    // Time parameters
    pub min_validator_withdrawability_delay: u64,

    // Validator cycle
    pub churn_limit_quotient: u64,

    // Electra
    pub min_per_epoch_churn_limit_electra: u64,
    pub max_per_epoch_activation_exit_churn_limit: u64,

    // Bail-out
    pub inactivity_penalty_rate: u64,
    pub inactivity_penalty_rate_precision: u64,
    pub inactivity_score_bailout_threshold: u64,
}

impl BeaconNetworkSpec {
    pub fn fork_schedule(&self) -> ForkSchedule {
        ForkSchedule::new([
            Fork {
                previous_version: self.genesis_fork_version,
                current_version: self.genesis_fork_version,
                epoch: 0,
            },
            Fork {
                previous_version: self.genesis_fork_version,
                current_version: self.deneb_fork_version,
                epoch: self.deneb_fork_epoch,
            },
            Fork {
                previous_version: self.deneb_fork_version,
                current_version: self.electra_fork_version,
                epoch: self.electra_fork_epoch,
            },
        ])
    }

    pub fn fork_version_at_epoch(&self, epoch: u64) -> B32 {
        self.fork_schedule().fork_at_epoch(epoch).current_version
    }

    pub fn is_electra_active_at_epoch(&self, epoch: u64) -> bool {
        self.electra_fork_epoch != Fork::UNSCHEDULED_EPOCH && epoch >= self.electra_fork_epoch
    }
}

pub static MAINNET: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        preset_base: "mainnet".to_string(),
        network: Network::Mainnet,
        genesis_fork_version: fixed_bytes!("0x00000000"),
        deneb_fork_version: fixed_bytes!("0x04000000"),
        deneb_fork_epoch: 269568,
        electra_fork_version: fixed_bytes!("0x05000000"),
        electra_fork_epoch: 364032,
        min_validator_withdrawability_delay: 256,
        churn_limit_quotient: 65536,
        min_per_epoch_churn_limit_electra: 128000000000,
        max_per_epoch_activation_exit_churn_limit: 256000000000,
        inactivity_penalty_rate: 25,
        inactivity_penalty_rate_precision: 10000,
        inactivity_score_bailout_threshold: 100,
    }
    .into()
});

pub static DEV: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        preset_base: "mainnet".to_string(),
        network: Network::Dev,
        genesis_fork_version: fixed_bytes!("0x00000000"),
        deneb_fork_version: fixed_bytes!("0x04000000"),
        deneb_fork_epoch: 0,
        electra_fork_version: fixed_bytes!("0x05000000"),
        electra_fork_epoch: 1,
        min_validator_withdrawability_delay: 256,
        churn_limit_quotient: 65536,
        min_per_epoch_churn_limit_electra: 128000000000,
        max_per_epoch_activation_exit_churn_limit: 256000000000,
        inactivity_penalty_rate: 25,
        inactivity_penalty_rate_precision: 10000,
        inactivity_score_bailout_threshold: 100,
    }
    .into()
});
