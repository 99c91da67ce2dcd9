mod tests {
    use alloy_primitives::{B256, b256};
    use keel_bls::{PrivateKey, PublicKey};
    use keel_consensus_beacon::{
        beacon_state::BeaconState,
        deneb::{beacon_state::BeaconState as DenebBeaconState, validator::Validator},
        fork_name::ForkName,
        view::{BalanceView, CoreView, PendingDepositsView, ValidatorView},
    };
    use keel_consensus_misc::{
        checkpoint::Checkpoint,
        constants::{
            COMPOUNDING_WITHDRAWAL_PREFIX, DOMAIN_BEACON_ATTESTER, ETH1_ADDRESS_WITHDRAWAL_PREFIX,
            FAR_FUTURE_EPOCH, MIN_ACTIVATION_BALANCE, SLOTS_PER_EPOCH,
        },
        fork::Fork,
        misc::{compute_activation_exit_epoch, compute_domain},
    };
    use keel_network_spec::networks::DEV;
    use keel_signing::SigningDomain;
    use keel_state_transition::{
        epoch::process_epoch, registry_updates::process_registry_updates,
        upgrade::upgrade_state_if_scheduled,
    };
    use ssz_types::VariableList;

    const GWEI_PER_ETH: u64 = 1_000_000_000;
    const GENESIS_VALIDATORS_ROOT: B256 =
        b256!("0x9143aa7c615a7f7115e2b6aac319c03529df8242ae705fba9df39b79c59fa8b1");

    fn public_key(seed: u8) -> PublicKey {
        PrivateKey::from_ikm(&[seed; 32])
            .and_then(|private_key| private_key.public_key())
            .expect("public key")
    }

    fn validator(seed: u8, prefix: u8, activation_epoch: u64) -> Validator {
        let mut withdrawal_credentials = B256::repeat_byte(0x22);
        withdrawal_credentials[0] = prefix;
        Validator {
            public_key: public_key(seed),
            withdrawal_credentials,
            effective_balance: MIN_ACTIVATION_BALANCE,
            slashed: false,
            activation_eligibility_epoch: 0,
            activation_epoch,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
        }
    }

    /// A Deneb state on the first slot of the DEV Electra fork epoch.
    fn deneb_state_at_fork() -> DenebBeaconState {
        let validators = vec![
            validator(0, ETH1_ADDRESS_WITHDRAWAL_PREFIX, 0),
            validator(1, COMPOUNDING_WITHDRAWAL_PREFIX, 0),
            validator(2, ETH1_ADDRESS_WITHDRAWAL_PREFIX, FAR_FUTURE_EPOCH),
        ];
        let mut state = DenebBeaconState {
            genesis_time: 1_695_902_400,
            genesis_validators_root: GENESIS_VALIDATORS_ROOT,
            slot: DEV.electra_fork_epoch * SLOTS_PER_EPOCH,
            fork: Fork {
                previous_version: DEV.genesis_fork_version,
                current_version: DEV.deneb_fork_version,
                epoch: DEV.deneb_fork_epoch,
            },
            validators: VariableList::new(validators).expect("within limit"),
            balances: VariableList::new(vec![
                33 * GWEI_PER_ETH,
                36 * GWEI_PER_ETH,
                MIN_ACTIVATION_BALANCE,
            ])
            .expect("within limit"),
            previous_epoch_participation: VariableList::new(vec![0b111; 3]).expect("within limit"),
            current_epoch_participation: VariableList::new(vec![0b011; 3]).expect("within limit"),
            inactivity_scores: VariableList::new(vec![4, 0, 9]).expect("within limit"),
            current_justified_checkpoint: Checkpoint {
                epoch: 1,
                root: B256::repeat_byte(0x31),
            },
            ..Default::default()
        };
        state.block_roots[5] = B256::repeat_byte(0x51);
        state.state_roots[5] = B256::repeat_byte(0x52);
        state.randao_mixes[1] = B256::repeat_byte(0x53);
        state
    }

    #[test]
    fn test_upgrade_at_fork_boundary() {
        let pre = deneb_state_at_fork();
        let mut state = BeaconState::from(pre.clone());

        assert_eq!(upgrade_state_if_scheduled(&mut state, &DEV), Ok(true));
        let post = state.as_electra().expect("electra state");

        assert_eq!(post.genesis_time, pre.genesis_time);
        assert_eq!(post.genesis_validators_root, pre.genesis_validators_root);
        assert_eq!(post.slot, pre.slot);
        assert_eq!(post.block_roots, pre.block_roots);
        assert_eq!(post.state_roots, pre.state_roots);
        assert_eq!(post.randao_mixes, pre.randao_mixes);
        assert_eq!(post.current_justified_checkpoint, pre.current_justified_checkpoint);
        assert_eq!(post.finalized_checkpoint, pre.finalized_checkpoint);

        assert_eq!(post.previous_epoch_participation.len(), 3);
        assert_eq!(post.current_epoch_participation.len(), 3);
        assert_eq!(post.inactivity_scores.len(), 3);
        assert!(
            post.previous_epoch_participation
                .iter()
                .chain(post.current_epoch_participation.iter())
                .all(|&flags| flags == 0)
        );
        assert!(post.inactivity_scores.iter().all(|&score| score == 0));

        assert_eq!(post.fork.previous_version, DEV.deneb_fork_version);
        assert_eq!(post.fork.current_version, DEV.electra_fork_version);
        assert_eq!(post.fork.epoch, DEV.electra_fork_epoch);
        assert_eq!(
            post.earliest_exit_epoch,
            compute_activation_exit_epoch(DEV.electra_fork_epoch)
        );
        assert_eq!(post.pending_deposits.len(), 2);
    }

    #[test]
    fn test_queued_balances_drain_in_the_first_epochs() {
        let mut state = BeaconState::from(deneb_state_at_fork());
        upgrade_state_if_scheduled(&mut state, &DEV).expect("upgrade");
        assert_eq!(state.balance_at(1), Ok(MIN_ACTIVATION_BALANCE));
        assert_eq!(state.balance_at(2), Ok(0));

        let signing_domain = SigningDomain::new(DEV.clone());
        let outcome = process_epoch(&mut state, &DEV, &signing_domain).expect("epoch");

        assert_eq!(outcome.pending_deposits.topped_up, vec![2, 1]);
        assert_eq!(state.balance_at(1), Ok(36 * GWEI_PER_ETH));
        assert_eq!(state.balance_at(2), Ok(MIN_ACTIVATION_BALANCE));
        assert_eq!(state.pending_deposits().map(<[_]>::len), Ok(0));
        assert_eq!(
            state.validator_at(2).map(|validator| validator.principal_balance),
            Ok(MIN_ACTIVATION_BALANCE)
        );
    }

    #[test]
    fn test_bail_out_of_exited_validator_is_a_no_op() {
        let mut state = BeaconState::from(deneb_state_at_fork());
        upgrade_state_if_scheduled(&mut state, &DEV).expect("upgrade");

        let mut exited = state.validator_at(0).expect("validator").clone();
        exited.exit_epoch = 300;
        exited.withdrawable_epoch = 556;
        state.update_validator_at(0, exited.clone()).expect("update");
        state.update_balance_at(0, GWEI_PER_ETH).expect("update");

        let updates = process_registry_updates(&mut state, &DEV).expect("registry updates");

        assert_eq!(updates.bailed_out, vec![0]);
        assert_eq!(state.validator_at(0), Ok(&exited));
    }

    #[test]
    fn test_domain_follows_the_fork_of_the_epoch() {
        let mut state = BeaconState::from(deneb_state_at_fork());
        upgrade_state_if_scheduled(&mut state, &DEV).expect("upgrade");
        let signing_domain = SigningDomain::new(DEV.clone());
        let current_epoch = state.get_current_epoch().expect("epoch");

        assert_eq!(
            signing_domain.get_domain(&state, DOMAIN_BEACON_ATTESTER, None),
            Ok(compute_domain(
                DOMAIN_BEACON_ATTESTER,
                DEV.electra_fork_version,
                GENESIS_VALIDATORS_ROOT
            ))
        );
        assert_eq!(
            signing_domain.get_domain(&state, DOMAIN_BEACON_ATTESTER, Some(current_epoch - 1)),
            Ok(compute_domain(
                DOMAIN_BEACON_ATTESTER,
                DEV.deneb_fork_version,
                GENESIS_VALIDATORS_ROOT
            ))
        );

        let digest = signing_domain.compute_fork_digest(
            state.fork().expect("fork").current_version,
            GENESIS_VALIDATORS_ROOT,
        );
        assert_eq!(
            digest,
            signing_domain.compute_fork_digest(DEV.electra_fork_version, GENESIS_VALIDATORS_ROOT)
        );
        assert_ne!(
            digest,
            signing_domain.compute_fork_digest(DEV.deneb_fork_version, GENESIS_VALIDATORS_ROOT)
        );
        assert_eq!(signing_domain.fork_digest_cache().len(), 2);
        assert_eq!(state.fork_name(), ForkName::Electra);
    }
}
