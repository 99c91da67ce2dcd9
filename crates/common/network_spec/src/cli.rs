use std::{fs, sync::Arc};

use anyhow::Context;

use crate::networks::{BeaconNetworkSpec, DEV, MAINNET};

/// Resolve a preset name, or load a network config YAML from the given path.
pub fn beacon_network_parser(network_string: &str) -> anyhow::Result<Arc<BeaconNetworkSpec>> {
    match network_string {
        "mainnet" => Ok(MAINNET.clone()),
        "dev" => Ok(DEV.clone()),
        path => read_network_spec(path),
    }
}

fn read_network_spec(path: &str) -> anyhow::Result<Arc<BeaconNetworkSpec>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let network_spec: BeaconNetworkSpec = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse YAML from: {path}"))?;
    Ok(Arc::new(network_spec))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy_primitives::fixed_bytes;

    use super::*;
    use crate::networks::Network;

    const CUSTOM_CONFIG: &str = r#"
PRESET_BASE: 'mainnet'
CONFIG_NAME: 'kurtosis'
GENESIS_FORK_VERSION: '0x10000038'
DENEB_FORK_VERSION: '0x40000038'
DENEB_FORK_EPOCH: 0
ELECTRA_FORK_VERSION: '0x50000038'
ELECTRA_FORK_EPOCH: 4
MIN_VALIDATOR_WITHDRAWABILITY_DELAY: 256
CHURN_LIMIT_QUOTIENT: 65536
MIN_PER_EPOCH_CHURN_LIMIT_ELECTRA: 128000000000
MAX_PER_EPOCH_ACTIVATION_EXIT_CHURN_LIMIT: 256000000000
INACTIVITY_PENALTY_RATE: 25
INACTIVITY_PENALTY_RATE_PRECISION: 10000
INACTIVITY_SCORE_BAILOUT_THRESHOLD: 100
"#;

    #[test]
    fn test_preset_names() {
        let mainnet = beacon_network_parser("mainnet").expect("mainnet preset");
        assert_eq!(mainnet.network, Network::Mainnet);
        let dev = beacon_network_parser("dev").expect("dev preset");
        assert_eq!(dev.network, Network::Dev);
    }

    #[test]
    fn test_custom_yaml_config() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(CUSTOM_CONFIG.as_bytes()).expect("write config");

        let path = file.path().to_str().expect("utf8 path");
        let network_spec = beacon_network_parser(path).expect("custom config");
        assert_eq!(network_spec.network, Network::Custom("kurtosis".to_string()));
        assert_eq!(
            network_spec.electra_fork_version,
            fixed_bytes!("0x50000038")
        );
        assert_eq!(network_spec.electra_fork_epoch, 4);
        assert_eq!(network_spec.inactivity_score_bailout_threshold, 100);
    }

    #[test]
    fn test_missing_file_is_error() {
        let error = beacon_network_parser("/nonexistent/keel/config.yaml")
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"PRESET_BASE: [unterminated").expect("write config");
        let path = file.path().to_str().expect("utf8 path");
        assert!(beacon_network_parser(path).is_err());
    }
}
