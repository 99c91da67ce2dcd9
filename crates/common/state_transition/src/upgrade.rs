use itertools::Itertools;
use keel_bls::BLSSignature;
use keel_consensus_beacon::{
    beacon_state::BeaconState,
    deneb::{
        beacon_state::BeaconState as DenebBeaconState, validator::Validator as DenebValidator,
    },
    electra::{
        beacon_state::BeaconState as ElectraBeaconState,
        execution_payload_header::ExecutionPayloadHeader, validator::Validator,
    },
    errors::StateError,
};
use keel_consensus_misc::{
    constants::{
        EFFECTIVE_BALANCE_INCREMENT, FAR_FUTURE_EPOCH, GENESIS_SLOT, MIN_ACTIVATION_BALANCE,
        UNSET_DEPOSIT_REQUESTS_START_INDEX,
    },
    fork::Fork,
    misc::{compute_activation_exit_epoch, compute_epoch_at_slot, compute_start_slot_at_epoch},
    pending_deposit::PendingDeposit,
};
use keel_network_spec::networks::BeaconNetworkSpec;
use ssz_types::VariableList;
use tracing::{debug, info};

use crate::{churn::get_activation_exit_churn_limit, errors::TransitionError};

/// Build the Electra state that follows ``pre``. ``pre`` is never modified, so a failed upgrade
/// leaves nothing half done.
pub fn upgrade_to_electra(
    pre: &DenebBeaconState,
    network_spec: &BeaconNetworkSpec,
) -> Result<ElectraBeaconState, TransitionError> {
    let epoch = compute_epoch_at_slot(pre.slot);
    info!(epoch, slot = pre.slot, "Upgrading state to electra");

    let validator_count = pre.validators.len();
    if pre.balances.len() != validator_count {
        return Err(TransitionError::InvalidState(format!(
            "{validator_count} validators but {} balances",
            pre.balances.len()
        )));
    }

    let exit_balance_to_consume =
        get_activation_exit_churn_limit(total_active_balance(pre, epoch), network_spec);

    let mut validators = pre
        .validators
        .iter()
        .zip(pre.balances.iter())
        .map(|(validator, &balance)| electra_validator(validator, balance))
        .collect::<Vec<_>>();
    let mut balances = pre.balances.to_vec();
    let mut pending_deposits = vec![];

    // Add validators that are not yet active to pending balance deposits
    let pre_activation = validators
        .iter()
        .enumerate()
        .filter(|(_, validator)| validator.activation_epoch == FAR_FUTURE_EPOCH)
        .map(|(index, validator)| (validator.activation_eligibility_epoch, index))
        .sorted()
        .collect::<Vec<_>>();
    for (_, index) in pre_activation {
        let validator = &mut validators[index];
        let balance = std::mem::take(&mut balances[index]);
        validator.effective_balance = 0;
        validator.principal_balance = 0;
        validator.activation_eligibility_epoch = FAR_FUTURE_EPOCH;
        pending_deposits.push(queued_balance(validator, balance));
    }

    // Ensure early adopters of compounding credentials go through the activation churn
    for (index, validator) in validators.iter_mut().enumerate() {
        if validator.activation_epoch == FAR_FUTURE_EPOCH
            || !validator.has_compounding_withdrawal_credential()
        {
            continue;
        }
        let balance = balances[index];
        if balance > MIN_ACTIVATION_BALANCE {
            balances[index] = MIN_ACTIVATION_BALANCE;
            validator.effective_balance = validator.effective_balance.min(MIN_ACTIVATION_BALANCE);
            validator.principal_balance = MIN_ACTIVATION_BALANCE;
            pending_deposits.push(queued_balance(validator, balance - MIN_ACTIVATION_BALANCE));
            debug!(index, excess = balance - MIN_ACTIVATION_BALANCE, "Queued excess balance");
        }
    }

    let post = ElectraBeaconState {
        // Versioning
        genesis_time: pre.genesis_time,
        genesis_validators_root: pre.genesis_validators_root,
        slot: pre.slot,
        fork: Fork {
            previous_version: pre.fork.current_version,
            current_version: network_spec.electra_fork_version,
            epoch,
        },

        // History
        latest_block_header: pre.latest_block_header.clone(),
        block_roots: pre.block_roots.clone(),
        state_roots: pre.state_roots.clone(),
        historical_roots: pre.historical_roots.clone(),

        // Eth1
        eth1_data: pre.eth1_data.clone(),
        eth1_data_votes: pre.eth1_data_votes.clone(),
        eth1_deposit_index: pre.eth1_deposit_index,

        // Registry
        validators: into_list("validators", validators)?,
        balances: into_list("balances", balances)?,

        // Randomness
        randao_mixes: pre.randao_mixes.clone(),

        // Slashings
        slashings: pre.slashings.clone(),

        // Participation
        previous_epoch_participation: into_list(
            "previous_epoch_participation",
            vec![0; validator_count],
        )?,
        current_epoch_participation: into_list(
            "current_epoch_participation",
            vec![0; validator_count],
        )?,

        // Finality
        justification_bits: pre.justification_bits.clone(),
        previous_justified_checkpoint: pre.previous_justified_checkpoint,
        current_justified_checkpoint: pre.current_justified_checkpoint,
        finalized_checkpoint: pre.finalized_checkpoint,

        // Inactivity
        inactivity_scores: into_list("inactivity_scores", vec![0; validator_count])?,

        // Execution
        latest_execution_payload_header: ExecutionPayloadHeader::from(
            &pre.latest_execution_payload_header,
        ),

        // Withdrawals
        next_withdrawal_index: 0,
        next_withdrawal_validator_index: 0,

        // Deep history
        historical_summaries: VariableList::default(),

        // Electra
        deposit_requests_start_index: UNSET_DEPOSIT_REQUESTS_START_INDEX,
        deposit_balance_to_consume: 0,
        exit_balance_to_consume,
        earliest_exit_epoch: compute_activation_exit_epoch(epoch),
        pending_deposits: into_list("pending_deposits", pending_deposits)?,
        pending_partial_withdrawals: VariableList::default(),
    };

    info!(
        epoch,
        validators = validator_count,
        queued_deposits = post.pending_deposits.len(),
        exit_balance_to_consume,
        "Upgraded state to electra"
    );
    Ok(post)
}

/// Upgrade ``state`` in place when it is a Deneb state sitting on the first slot of the
/// Electra fork epoch. Returns whether an upgrade happened.
pub fn upgrade_state_if_scheduled(
    state: &mut BeaconState,
    network_spec: &BeaconNetworkSpec,
) -> Result<bool, TransitionError> {
    let BeaconState::Deneb(pre) = state else {
        return Ok(false);
    };
    if network_spec.electra_fork_epoch == Fork::UNSCHEDULED_EPOCH
        || pre.slot != compute_start_slot_at_epoch(network_spec.electra_fork_epoch)
    {
        return Ok(false);
    }

    let post = upgrade_to_electra(pre, network_spec)?;
    *state = BeaconState::from(post);
    debug!(fork = %state.fork_name(), "Replaced state with upgraded state");
    Ok(true)
}

fn electra_validator(validator: &DenebValidator, balance: u64) -> Validator {
    let mut validator = Validator {
        public_key: validator.public_key.clone(),
        withdrawal_credentials: validator.withdrawal_credentials,
        effective_balance: validator.effective_balance,
        slashed: validator.slashed,
        activation_eligibility_epoch: validator.activation_eligibility_epoch,
        activation_epoch: validator.activation_epoch,
        exit_epoch: validator.exit_epoch,
        withdrawable_epoch: validator.withdrawable_epoch,
        principal_balance: 0,
    };
    validator.principal_balance = if validator.has_compounding_withdrawal_credential() {
        balance.min(validator.get_max_effective_balance())
    } else {
        balance.min(MIN_ACTIVATION_BALANCE)
    };
    validator
}

fn queued_balance(validator: &Validator, amount: u64) -> PendingDeposit {
    PendingDeposit {
        public_key: validator.public_key.clone(),
        withdrawal_credentials: validator.withdrawal_credentials,
        amount,
        signature: BLSSignature::infinity(),
        slot: GENESIS_SLOT,
    }
}

fn total_active_balance(pre: &DenebBeaconState, epoch: u64) -> u64 {
    pre.validators
        .iter()
        .filter(|validator| validator.is_active_validator(epoch))
        .fold(0u64, |total, validator| {
            total.saturating_add(validator.effective_balance)
        })
        .max(EFFECTIVE_BALANCE_INCREMENT)
}

fn into_list<T, N: ssz_types::typenum::Unsigned>(
    field: &'static str,
    items: Vec<T>,
) -> Result<VariableList<T, N>, StateError> {
    VariableList::new(items)
        .map_err(|err| StateError::Encoding(format!("{field} exceeds its limit: {err:?}")))
}
