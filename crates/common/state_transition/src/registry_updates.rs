use keel_consensus_beacon::view::BeaconStateAccess;
use keel_consensus_misc::misc::compute_activation_exit_epoch;
use keel_network_spec::networks::BeaconNetworkSpec;
use tracing::{debug, info};

use crate::{
    errors::{ExitError, TransitionError},
    exit::{ExitChurn, initiate_validator_exit},
};

/// Validator indices touched by one registry update, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryUpdates {
    pub queued_for_activation: Vec<u64>,
    pub bailed_out: Vec<u64>,
    pub activated: Vec<u64>,
}

/// Run the registry update on ``state``. On error the state is left as it was.
pub fn process_registry_updates<S: BeaconStateAccess>(
    state: &mut S,
    network_spec: &BeaconNetworkSpec,
) -> Result<RegistryUpdates, TransitionError> {
    let mut next_state = state.copy();
    let updates = apply_registry_updates(&mut next_state, network_spec)?;
    *state = next_state;
    Ok(updates)
}

/// Registry update without the copy. Leaves ``state`` partially updated on error.
pub(crate) fn apply_registry_updates<S: BeaconStateAccess>(
    state: &mut S,
    network_spec: &BeaconNetworkSpec,
) -> Result<RegistryUpdates, TransitionError> {
    if network_spec.inactivity_penalty_rate_precision == 0 {
        return Err(TransitionError::InvalidState(
            "INACTIVITY_PENALTY_RATE_PRECISION must not be zero".to_string(),
        ));
    }

    let current_epoch = state.get_current_epoch()?;
    let updates = collect_registry_updates(state, network_spec, current_epoch)?;

    for &index in &updates.queued_for_activation {
        let mut validator = state.validator_at(index)?.clone();
        validator.activation_eligibility_epoch = current_epoch + 1;
        state.update_validator_at(index, validator)?;
    }

    for &index in &updates.bailed_out {
        match initiate_validator_exit(state, index, ExitChurn::Disabled, network_spec) {
            Ok(exit_epoch) => debug!(index, exit_epoch, "Bailed out validator"),
            Err(ExitError::AlreadyExited { index, exit_epoch }) => {
                debug!(index, exit_epoch, "Skipping bail-out, validator already exited")
            }
            Err(ExitError::State(err)) => return Err(err.into()),
        }
    }

    let activation_epoch = compute_activation_exit_epoch(current_epoch);
    for &index in &updates.activated {
        let mut validator = state.validator_at(index)?.clone();
        validator.activation_epoch = activation_epoch;
        state.update_validator_at(index, validator)?;
    }

    info!(
        epoch = current_epoch,
        queued = updates.queued_for_activation.len(),
        bailed_out = updates.bailed_out.len(),
        activated = updates.activated.len(),
        "Processed registry updates"
    );
    Ok(updates)
}

/// Gwei a validator may lose below its principal before it is bailed out.
fn bailout_buffer(principal_balance: u64, network_spec: &BeaconNetworkSpec) -> u64 {
    (principal_balance as u128 * network_spec.inactivity_penalty_rate as u128
        / network_spec.inactivity_penalty_rate_precision as u128) as u64
}

/// Single read-only pass over the registry. A validator may land in more than one list.
fn collect_registry_updates<S: BeaconStateAccess>(
    state: &S,
    network_spec: &BeaconNetworkSpec,
    current_epoch: u64,
) -> Result<RegistryUpdates, TransitionError> {
    let finalized_epoch = state.finalized_checkpoint_epoch()?;
    let in_inactivity_leak = state.is_in_inactivity_leak()?;

    let mut updates = RegistryUpdates::default();
    state.read_all_validators(|index, validator| {
        if validator.is_eligible_for_activation_queue() {
            updates.queued_for_activation.push(index);
        }

        let below_principal = validator.is_active_validator(current_epoch)
            && state
                .balance_at(index)?
                .saturating_add(bailout_buffer(validator.principal_balance, network_spec))
                < validator.principal_balance;
        // The leak clause is only consulted when the balance clause does not hold.
        if below_principal
            || (in_inactivity_leak
                && state.inactivity_score_at(index)?
                    > network_spec.inactivity_score_bailout_threshold)
        {
            updates.bailed_out.push(index);
        }

        if validator.is_eligible_for_activation(finalized_epoch) {
            updates.activated.push(index);
        }
        Ok(())
    })?;
    Ok(updates)
}
