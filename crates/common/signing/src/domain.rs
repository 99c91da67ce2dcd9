use std::sync::Arc;

use alloy_primitives::{B256, aliases::B32};
use keel_bls::{BLSSignature, PrivateKey, traits::Signable};
use keel_consensus_beacon::view::CoreView;
use keel_consensus_misc::{
    constants::DOMAIN_DEPOSIT,
    deposit_message::DepositMessage,
    misc::{self, compute_signing_root},
    pending_deposit::PendingDeposit,
};
use keel_network_spec::networks::BeaconNetworkSpec;
use tracing::debug;
use tree_hash::TreeHash;

use crate::{
    errors::SigningError, fork_digest_cache::ForkDigestCache, verify::verify_signing_root,
};

/// Binds messages to their chain context: fork version, genesis validators root and epoch.
#[derive(Debug, Clone)]
pub struct SigningDomain {
    network_spec: Arc<BeaconNetworkSpec>,
    fork_digests: Arc<ForkDigestCache>,
}

impl SigningDomain {
    pub fn new(network_spec: Arc<BeaconNetworkSpec>) -> Self {
        Self::with_cache(network_spec, Arc::new(ForkDigestCache::new()))
    }

    /// Share one digest cache between several engines, e.g. one per network service.
    pub fn with_cache(
        network_spec: Arc<BeaconNetworkSpec>,
        fork_digests: Arc<ForkDigestCache>,
    ) -> Self {
        Self {
            network_spec,
            fork_digests,
        }
    }

    pub fn network_spec(&self) -> &BeaconNetworkSpec {
        &self.network_spec
    }

    pub fn fork_digest_cache(&self) -> &Arc<ForkDigestCache> {
        &self.fork_digests
    }

    /// Return the domain for the ``domain_type`` and ``fork_version``. Unset inputs default to
    /// the genesis fork version of the network and the zero root.
    pub fn compute_domain(
        &self,
        domain_type: B32,
        fork_version: Option<B32>,
        genesis_validators_root: Option<B256>,
    ) -> B256 {
        misc::compute_domain(
            domain_type,
            fork_version.unwrap_or(self.network_spec.genesis_fork_version),
            genesis_validators_root.unwrap_or_default(),
        )
    }

    /// Return the 4-byte fork digest for the ``current_version`` and
    /// ``genesis_validators_root``.
    pub fn compute_fork_digest(&self, current_version: B32, genesis_validators_root: B256) -> B32 {
        self.fork_digests
            .get_or_compute(current_version, genesis_validators_root)
    }

    /// Return the signature domain (fork version concatenated with domain type) of a message.
    /// The fork is chosen by ``epoch``, the current epoch of ``state`` when unset.
    pub fn get_domain<S: CoreView>(
        &self,
        state: &S,
        domain_type: B32,
        epoch: Option<u64>,
    ) -> Result<B256, SigningError> {
        let epoch = match epoch {
            Some(epoch) => epoch,
            None => state.get_current_epoch()?,
        };
        let fork_version = state.fork()?.version_at_epoch(epoch);
        Ok(self.compute_domain(
            domain_type,
            Some(fork_version),
            Some(state.genesis_validators_root()?),
        ))
    }

    pub fn compute_domain_and_sign<S: CoreView, T: TreeHash>(
        &self,
        state: &S,
        epoch: u64,
        message: &T,
        domain_type: B32,
        private_key: &PrivateKey,
    ) -> Result<BLSSignature, SigningError> {
        let domain = self.get_domain(state, domain_type, Some(epoch))?;
        let signing_root = compute_signing_root(message, domain);
        private_key
            .sign(signing_root.as_slice())
            .map_err(SigningError::Signing)
    }

    /// Proof-of-possession check of a deposit. Deposits are valid across forks, so the domain
    /// uses the genesis fork version and no validators root.
    pub fn is_valid_deposit_signature(&self, deposit: &PendingDeposit) -> bool {
        let deposit_message = DepositMessage {
            public_key: deposit.public_key.clone(),
            withdrawal_credentials: deposit.withdrawal_credentials,
            amount: deposit.amount,
        };
        let domain = self.compute_domain(DOMAIN_DEPOSIT, None, None);
        match verify_signing_root(
            &deposit_message,
            deposit.public_key.to_bytes(),
            deposit.signature.to_bytes(),
            domain,
        ) {
            Ok(()) => true,
            Err(err) => {
                debug!(public_key = ?deposit.public_key, "Deposit signature rejected: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use keel_consensus_beacon::{
        beacon_state::BeaconState, electra::beacon_state::BeaconState as ElectraBeaconState,
    };
    use keel_consensus_misc::{
        checkpoint::Checkpoint,
        constants::{DOMAIN_BEACON_ATTESTER, SLOTS_PER_EPOCH},
        fork::Fork,
    };
    use keel_network_spec::networks::{DEV, MAINNET};

    use super::*;

    fn state_at_fork_boundary() -> BeaconState {
        BeaconState::from(ElectraBeaconState {
            slot: 10 * SLOTS_PER_EPOCH,
            genesis_validators_root: B256::repeat_byte(0x4b),
            fork: Fork {
                previous_version: DEV.deneb_fork_version,
                current_version: DEV.electra_fork_version,
                epoch: 10,
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_compute_domain_defaults() {
        let signing_domain = SigningDomain::new(MAINNET.clone());
        assert_eq!(
            signing_domain.compute_domain(DOMAIN_DEPOSIT, None, None),
            misc::compute_domain(DOMAIN_DEPOSIT, MAINNET.genesis_fork_version, B256::ZERO)
        );
    }

    #[test]
    fn test_get_domain_picks_fork_by_epoch() {
        let signing_domain = SigningDomain::new(DEV.clone());
        let state = state_at_fork_boundary();
        let root = B256::repeat_byte(0x4b);

        let before = signing_domain
            .get_domain(&state, DOMAIN_BEACON_ATTESTER, Some(9))
            .expect("domain");
        let after = signing_domain
            .get_domain(&state, DOMAIN_BEACON_ATTESTER, None)
            .expect("domain");

        assert_eq!(
            before,
            signing_domain.compute_domain(
                DOMAIN_BEACON_ATTESTER,
                Some(DEV.deneb_fork_version),
                Some(root)
            )
        );
        assert_eq!(
            after,
            signing_domain.compute_domain(
                DOMAIN_BEACON_ATTESTER,
                Some(DEV.electra_fork_version),
                Some(root)
            )
        );
    }

    #[test]
    fn test_fork_digest_goes_through_shared_cache() {
        let cache = Arc::new(ForkDigestCache::new());
        let first = SigningDomain::with_cache(DEV.clone(), cache.clone());
        let second = SigningDomain::with_cache(MAINNET.clone(), cache.clone());

        let digest = first.compute_fork_digest(DEV.electra_fork_version, B256::ZERO);
        assert_eq!(
            second.compute_fork_digest(DEV.electra_fork_version, B256::ZERO),
            digest
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sign_and_verify_with_epoch_domain() {
        let signing_domain = SigningDomain::new(DEV.clone());
        let state = state_at_fork_boundary();
        let private_key = PrivateKey::from_ikm(&[9; 32]).expect("valid ikm");
        let public_key = private_key.public_key().expect("public key");
        let message = Checkpoint {
            epoch: 9,
            root: B256::repeat_byte(3),
        };

        let signature = signing_domain
            .compute_domain_and_sign(&state, 9, &message, DOMAIN_BEACON_ATTESTER, &private_key)
            .expect("signed");

        let domain = signing_domain
            .get_domain(&state, DOMAIN_BEACON_ATTESTER, Some(9))
            .expect("domain");
        assert_eq!(
            verify_signing_root(&message, public_key.to_bytes(), signature.to_bytes(), domain),
            Ok(())
        );

        // The same signature is bound to the previous fork only.
        let current_domain = signing_domain
            .get_domain(&state, DOMAIN_BEACON_ATTESTER, Some(10))
            .expect("domain");
        assert_eq!(
            verify_signing_root(
                &message,
                public_key.to_bytes(),
                signature.to_bytes(),
                current_domain
            ),
            Err(SigningError::SignatureMismatch)
        );
    }

    #[test]
    fn test_deposit_signature() {
        let signing_domain = SigningDomain::new(DEV.clone());
        let private_key = PrivateKey::from_ikm(&[1; 32]).expect("valid ikm");
        let public_key = private_key.public_key().expect("public key");
        let deposit_message = DepositMessage {
            public_key: public_key.clone(),
            withdrawal_credentials: B256::repeat_byte(1),
            amount: 32_000_000_000,
        };
        let domain = signing_domain.compute_domain(DOMAIN_DEPOSIT, None, None);
        let signature = private_key
            .sign(compute_signing_root(&deposit_message, domain).as_slice())
            .expect("signed");

        let mut deposit = PendingDeposit {
            public_key,
            withdrawal_credentials: deposit_message.withdrawal_credentials,
            amount: deposit_message.amount,
            signature,
            slot: 0,
        };
        assert!(signing_domain.is_valid_deposit_signature(&deposit));

        deposit.amount += 1;
        assert!(!signing_domain.is_valid_deposit_signature(&deposit));

        deposit.amount -= 1;
        deposit.signature = BLSSignature::infinity();
        assert!(!signing_domain.is_valid_deposit_signature(&deposit));
    }
}
