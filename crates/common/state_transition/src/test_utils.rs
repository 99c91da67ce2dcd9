use alloy_primitives::B256;
use keel_bls::{BLSSignature, PrivateKey, PublicKey, traits::Signable};
use keel_consensus_beacon::{
    beacon_state::BeaconState,
    electra::{beacon_state::BeaconState as ElectraBeaconState, validator::Validator},
};
use keel_consensus_misc::{
    checkpoint::Checkpoint,
    constants::{
        DOMAIN_DEPOSIT, ETH1_ADDRESS_WITHDRAWAL_PREFIX, FAR_FUTURE_EPOCH, SLOTS_PER_EPOCH,
        UNSET_DEPOSIT_REQUESTS_START_INDEX,
    },
    deposit_message::DepositMessage,
    misc::compute_signing_root,
    pending_deposit::PendingDeposit,
};
use keel_signing::SigningDomain;
use ssz_types::VariableList;

pub const GWEI_PER_ETH: u64 = 1_000_000_000;

pub fn private_key(seed: u8) -> PrivateKey {
    PrivateKey::from_ikm(&[seed; 32]).expect("valid ikm")
}

pub fn public_key(seed: u8) -> PublicKey {
    private_key(seed).public_key().expect("public key")
}

pub fn withdrawal_credentials(prefix: u8) -> B256 {
    let mut credentials = B256::repeat_byte(0x0a);
    credentials[0] = prefix;
    credentials
}

/// An active validator with an eth1 withdrawal credential and ``eth`` ETH at stake.
pub fn validator(seed: u8, eth: u64) -> Validator {
    Validator {
        public_key: public_key(seed),
        withdrawal_credentials: withdrawal_credentials(ETH1_ADDRESS_WITHDRAWAL_PREFIX),
        effective_balance: eth * GWEI_PER_ETH,
        slashed: false,
        activation_eligibility_epoch: 0,
        activation_epoch: 0,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
        principal_balance: eth * GWEI_PER_ETH,
    }
}

/// An Electra state at the first slot of ``epoch`` holding ``validators`` with balances equal to
/// their effective balances, finalized one epoch ago.
pub fn electra_state(epoch: u64, validators: Vec<Validator>) -> BeaconState {
    let count = validators.len();
    let balances = validators
        .iter()
        .map(|validator| validator.effective_balance)
        .collect::<Vec<_>>();
    BeaconState::from(ElectraBeaconState {
        slot: epoch * SLOTS_PER_EPOCH,
        finalized_checkpoint: Checkpoint {
            epoch: epoch.saturating_sub(1),
            root: B256::ZERO,
        },
        validators: VariableList::new(validators).expect("within limit"),
        balances: VariableList::new(balances).expect("within limit"),
        previous_epoch_participation: VariableList::new(vec![0; count]).expect("within limit"),
        current_epoch_participation: VariableList::new(vec![0; count]).expect("within limit"),
        inactivity_scores: VariableList::new(vec![0; count]).expect("within limit"),
        deposit_requests_start_index: UNSET_DEPOSIT_REQUESTS_START_INDEX,
        ..Default::default()
    })
}

/// A deposit for ``seed`` signed with the deposit domain of ``signing_domain``.
pub fn signed_deposit(signing_domain: &SigningDomain, seed: u8, amount: u64) -> PendingDeposit {
    let deposit_message = DepositMessage {
        public_key: public_key(seed),
        withdrawal_credentials: withdrawal_credentials(ETH1_ADDRESS_WITHDRAWAL_PREFIX),
        amount,
    };
    let domain = signing_domain.compute_domain(DOMAIN_DEPOSIT, None, None);
    let signature = private_key(seed)
        .sign(compute_signing_root(&deposit_message, domain).as_slice())
        .expect("signed");
    PendingDeposit {
        public_key: deposit_message.public_key,
        withdrawal_credentials: deposit_message.withdrawal_credentials,
        amount,
        signature,
        slot: 0,
    }
}

/// A top-up for an existing validator, carrying no real signature.
pub fn top_up(seed: u8, amount: u64) -> PendingDeposit {
    PendingDeposit {
        public_key: public_key(seed),
        withdrawal_credentials: withdrawal_credentials(ETH1_ADDRESS_WITHDRAWAL_PREFIX),
        amount,
        signature: BLSSignature::infinity(),
        slot: 0,
    }
}
